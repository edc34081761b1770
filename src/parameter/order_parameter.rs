use crate::error::Error;
use serde_json::Value;
use std::fmt;

/// A permutation of a node's `m` output edges, indexed by lexicographic rank.
///
/// The rank maps to the permutation through the factorial-base tail
/// representation (Lehmer code); both directions are supported so a
/// permutation chosen externally can be ranked back into the parameter graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderParameter {
    m: u64,
    rank: u64,
    permutation: Vec<u64>,
    inverse: Vec<u64>,
}

impl OrderParameter {
    /// The `rank`th permutation of `m` outputs.
    pub fn from_rank(m: u64, rank: u64) -> OrderParameter {
        let mut tail_rep = index_to_tail_rep(rank);
        tail_rep.resize(m as usize, 0);
        let permutation = tail_rep_to_perm(&tail_rep);
        OrderParameter::with_rank(rank, permutation)
    }

    /// Wrap an explicit permutation, computing its rank.
    pub fn from_permutation(permutation: Vec<u64>) -> OrderParameter {
        let rank = tail_rep_to_index(&perm_to_tail_rep(&permutation));
        OrderParameter::with_rank(rank, permutation)
    }

    fn with_rank(rank: u64, permutation: Vec<u64>) -> OrderParameter {
        let m = permutation.len() as u64;
        let mut inverse = vec![0; permutation.len()];
        for (i, &p) in permutation.iter().enumerate() {
            inverse[p as usize] = i as u64;
        }
        OrderParameter {
            m,
            rank,
            permutation,
            inverse,
        }
    }

    /// Forward application: the output edge placed at position `i`.
    pub fn apply(&self, i: u64) -> u64 {
        self.permutation[i as usize]
    }

    /// Inverse application: the position holding output edge `i`.
    pub fn inverse(&self, i: u64) -> u64 {
        self.inverse[i as usize]
    }

    pub fn permutation(&self) -> &[u64] {
        &self.permutation
    }

    /// Lexicographic rank of the permutation.
    pub fn rank(&self) -> u64 {
        self.rank
    }

    /// Number of permuted outputs.
    pub fn size(&self) -> u64 {
        self.m
    }

    /// All order parameters one adjacent transposition away.
    pub fn adjacencies(&self) -> Vec<OrderParameter> {
        let mut permutation = self.permutation.clone();
        let mut output = Vec::new();
        for i in 0..permutation.len().saturating_sub(1) {
            permutation.swap(i, i + 1);
            output.push(OrderParameter::from_permutation(permutation.clone()));
            permutation.swap(i, i + 1);
        }
        output
    }

    /// Text form `[p0,p1,...]`.
    pub fn stringify(&self) -> String {
        serde_json::to_string(&self.permutation).expect("permutation serializes")
    }

    /// Parse the [`stringify`](OrderParameter::stringify) text form.
    pub fn parse(text: &str) -> Result<OrderParameter, Error> {
        let value: Value = serde_json::from_str(text)?;
        OrderParameter::from_value(&value)
    }

    pub(crate) fn from_value(value: &Value) -> Result<OrderParameter, Error> {
        let permutation: Vec<u64> = serde_json::from_value(value.clone())?;
        let m = permutation.len() as u64;
        let mut seen = vec![false; permutation.len()];
        for &p in &permutation {
            if p >= m || seen[p as usize] {
                return Err(Error::TextForm {
                    what: "output permutation",
                });
            }
            seen[p as usize] = true;
        }
        Ok(OrderParameter::from_permutation(permutation))
    }
}

impl fmt::Display for OrderParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify())
    }
}

/// Factorial-base digits of `index`, least significant place first.
fn index_to_tail_rep(mut index: u64) -> Vec<u64> {
    let mut tail_rep = Vec::new();
    let mut place = 1u64;
    while index > 0 {
        tail_rep.push(index % place);
        index /= place;
        place += 1;
    }
    tail_rep
}

fn tail_rep_to_perm(tail_rep: &[u64]) -> Vec<u64> {
    // Quadratic, like the original; ranks here are over a node's out-degree,
    // which stays tiny.
    let m = tail_rep.len();
    let mut permutation: Vec<u64> = tail_rep.iter().rev().copied().collect();
    for i in 0..m {
        for j in 0..i {
            if permutation[m - j - 1] >= tail_rep[i] {
                permutation[m - j - 1] += 1;
            }
        }
    }
    permutation
}

fn perm_to_tail_rep(permutation: &[u64]) -> Vec<u64> {
    let m = permutation.len();
    let mut tail_rep = vec![0u64; m];
    for i in (1..m).rev() {
        for j in (0..i).rev() {
            if permutation[m - j - 1] < permutation[m - i - 1] {
                tail_rep[i] += 1;
            }
        }
    }
    tail_rep
}

fn tail_rep_to_index(tail_rep: &[u64]) -> u64 {
    let mut result = 0;
    let mut factorial = 1;
    for (i, &digit) in tail_rep.iter().enumerate().skip(1) {
        factorial *= i as u64;
        result += factorial * digit;
    }
    result
}

use crate::error::Error;
use crate::graph::Digraph;
use std::fmt;

/// A finite partial order derived from a digraph.
///
/// Construction takes the transitive closure of the input, reduces it to the
/// Hasse diagram, and caches both together with their transposes, so that
/// parent/child and ancestor/descendant queries are all slice lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poset {
    transitive_closure: Digraph,
    transitive_reduction: Digraph,
    transpose_closure: Digraph,
    transpose_reduction: Digraph,
}

impl Poset {
    /// Build the poset generated by the reachability relation of `digraph`.
    ///
    /// # Panics
    ///
    /// Panics under the preconditions of [`Digraph::transitive_reduction`]:
    /// the closure of `digraph` must be a topologically ordered DAG with
    /// self-loops at most.
    pub fn new(digraph: &Digraph) -> Poset {
        let transitive_closure = digraph.transitive_closure();
        let transitive_reduction = transitive_closure.transitive_reduction();
        let transpose_closure = transitive_closure.transpose();
        let transpose_reduction = transitive_reduction.transpose();
        Poset {
            transitive_closure,
            transitive_reduction,
            transpose_closure,
            transpose_reduction,
        }
    }

    /// Number of elements.
    pub fn size(&self) -> u64 {
        self.transitive_reduction.size()
    }

    /// Immediate predecessors of `v` in the Hasse diagram.
    pub fn parents(&self, v: u64) -> &[u64] {
        self.transpose_reduction.adjacencies(v)
    }

    /// Immediate successors of `v` in the Hasse diagram.
    pub fn children(&self, v: u64) -> &[u64] {
        self.transitive_reduction.adjacencies(v)
    }

    /// All elements from which `v` is reachable.
    pub fn ancestors(&self, v: u64) -> &[u64] {
        self.transpose_closure.adjacencies(v)
    }

    /// All elements reachable from `v`.
    pub fn descendants(&self, v: u64) -> &[u64] {
        self.transitive_closure.adjacencies(v)
    }

    /// `true` iff `v` is a descendant of `u`.
    pub fn compare(&self, u: u64, v: u64) -> bool {
        self.transitive_closure.adjacencies(u).binary_search(&v).is_ok()
    }

    /// The elements of `elements` that are dominated by no *other* element of
    /// `elements`.
    pub fn maximal(&self, elements: &[u64]) -> Vec<u64> {
        elements
            .iter()
            .copied()
            .filter(|&u| {
                elements
                    .iter()
                    .all(|&v| u == v || !self.compare(u, v))
            })
            .collect()
    }

    /// Relabel element `i` as `permutation[i]`. All cached views are permuted
    /// in place; nothing is recomputed.
    pub fn permute(&self, permutation: &[u64]) -> Poset {
        Poset {
            transitive_closure: self.transitive_closure.permute(permutation),
            transitive_reduction: self.transitive_reduction.permute(permutation),
            transpose_closure: self.transpose_closure.permute(permutation),
            transpose_reduction: self.transpose_reduction.permute(permutation),
        }
    }

    /// Text form of the Hasse diagram, as [`Digraph::stringify`].
    pub fn stringify(&self) -> String {
        self.transitive_reduction.stringify()
    }

    /// Parse an adjacency-list text form and build the generated poset.
    pub fn parse(text: &str) -> Result<Poset, Error> {
        Ok(Poset::new(&Digraph::parse(text)?))
    }

    /// Graphviz text form of the Hasse diagram.
    pub fn graphviz(&self) -> String {
        self.transitive_reduction.graphviz()
    }
}

impl fmt::Display for Poset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.graphviz())
    }
}

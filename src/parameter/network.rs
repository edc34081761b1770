use crate::error::Error;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A gene regulatory network: named nodes, signed edges, and per node a
/// monotone-logic partition of its inputs into ordered factors.
///
/// The body is immutable and `Arc`-shared: a network is read concurrently by
/// every parameter decode and domain graph built from it, so clones are cheap
/// handle copies.
///
/// Parsed from the line-based specification format, one node per line:
///
/// ```text
/// X : X + Y
/// Y : ~X
/// ```
///
/// Everything but node names, `+` and `~` acts as a separator, so
/// `a + ~b c d + e` denotes the factored logic `(a + ~b)(c)(d + e)`. A third
/// `:`-separated field marks the node as essential (`X : ~X : E`).
#[derive(Clone, Debug)]
pub struct Network {
    data: Arc<NetworkData>,
}

#[derive(Debug)]
struct NetworkData {
    specification: String,
    names: Vec<String>,
    index_by_name: HashMap<String, u64>,
    inputs: Vec<Vec<u64>>,
    outputs: Vec<Vec<u64>>,
    logic: Vec<Vec<Vec<u64>>>,
    essential: Vec<bool>,
    edge_type: HashMap<(u64, u64), bool>,
    order: HashMap<(u64, u64), u64>,
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(specification: &str) -> Result<Network, Error> {
        // Accept quoted single-line forms with escaped newlines.
        let specification = specification.replace("\\n", "\n").replace('"', "");

        let mut names = Vec::new();
        let mut logic_strings = Vec::new();
        let mut essential = Vec::new();
        for line in specification.lines() {
            let mut fields = line.splitn(3, ':');
            let name: String = fields
                .next()
                .unwrap_or("")
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            if name.is_empty() || name.starts_with('.') || name.starts_with('@') {
                continue;
            }
            let Some(logic) = fields.next() else {
                return Err(Error::MissingLogic(name));
            };
            match fields.next().map(str::trim) {
                None => essential.push(false),
                Some(flag) if flag.eq_ignore_ascii_case("e") || flag.eq_ignore_ascii_case("essential") => {
                    essential.push(true)
                }
                Some(flag) => {
                    return Err(Error::NetworkSpec(format!(
                        "unrecognized flag `{flag}` on node `{name}`"
                    )));
                }
            }
            names.push(name);
            logic_strings.push(logic.to_string());
        }

        let mut index_by_name = HashMap::new();
        for (i, name) in names.iter().enumerate() {
            if index_by_name.insert(name.clone(), i as u64).is_some() {
                return Err(Error::NetworkSpec(format!("node `{name}` declared twice")));
            }
        }

        let mut logic = Vec::with_capacity(names.len());
        let mut edge_type = HashMap::new();
        for (target, logic_string) in logic_strings.iter().enumerate() {
            let logic_struct = parse_logic(
                logic_string,
                target as u64,
                &names[target],
                &index_by_name,
                &mut edge_type,
            )?;
            logic.push(logic_struct);
        }

        // Derive ordered input/output edge lists from the factored logics.
        let size = names.len();
        let mut inputs = vec![Vec::new(); size];
        let mut outputs: Vec<Vec<u64>> = vec![Vec::new(); size];
        let mut order = HashMap::new();
        for (target, logic_struct) in logic.iter().enumerate() {
            for factor in logic_struct {
                for &source in factor {
                    inputs[target].push(source);
                    outputs[source as usize].push(target as u64);
                    let rank = outputs[source as usize].len() as u64 - 1;
                    order.insert((source, target as u64), rank);
                }
            }
        }

        Ok(Network {
            data: Arc::new(NetworkData {
                specification,
                names,
                index_by_name,
                inputs,
                outputs,
                logic,
                essential,
                edge_type,
                order,
            }),
        })
    }
}

/// Tokenize one logic field into the canonical factor partition, recording
/// edge parities on the way.
fn parse_logic(
    logic_string: &str,
    target: u64,
    target_name: &str,
    index_by_name: &HashMap<String, u64>,
    edge_type: &mut HashMap<(u64, u64), bool>,
) -> Result<Vec<Vec<u64>>, Error> {
    let mut logic_struct: Vec<Vec<u64>> = Vec::new();
    let mut factor: Vec<u64> = Vec::new();
    let mut token = String::new();
    let mut parity = true;
    let mut appending = true;

    fn flush_factor(factor: &mut Vec<u64>, logic_struct: &mut Vec<Vec<u64>>) {
        if factor.is_empty() {
            return;
        }
        factor.sort_unstable();
        logic_struct.push(std::mem::take(factor));
    }

    let mut flush_token = |token: &mut String,
                           factor: &mut Vec<u64>,
                           logic_struct: &mut Vec<Vec<u64>>,
                           parity: &mut bool,
                           appending: &mut bool|
     -> Result<(), Error> {
        if token.is_empty() {
            return Ok(());
        }
        if !*appending {
            flush_factor(factor, logic_struct);
        }
        let Some(&source) = index_by_name.get(token.as_str()) else {
            return Err(Error::NetworkSpec(format!("unknown input variable `{token}`")));
        };
        factor.push(source);
        edge_type.insert((source, target), *parity);
        token.clear();
        *appending = false;
        *parity = true;
        Ok(())
    };

    for c in logic_string.chars() {
        if matches!(c, '\t' | ' ' | '(' | ')' | '+' | '~') {
            flush_token(&mut token, &mut factor, &mut logic_struct, &mut parity, &mut appending)?;
        } else {
            token.push(c);
        }
        if c == '+' {
            appending = true;
        }
        if c == '~' {
            parity = false;
        }
    }
    flush_token(&mut token, &mut factor, &mut logic_struct, &mut parity, &mut appending)?;
    flush_factor(&mut factor, &mut logic_struct);

    let mut seen = HashSet::new();
    for factor in &logic_struct {
        for &input in factor {
            if !seen.insert(input) {
                return Err(Error::RepeatedInput(target_name.to_string()));
            }
        }
    }
    // Canonical partition order: by factor size, then by largest member.
    logic_struct.sort_by_key(|factor| (factor.len(), *factor.last().expect("factor is nonempty")));
    Ok(logic_struct)
}

impl Network {
    /// Number of nodes.
    pub fn size(&self) -> u64 {
        self.data.names.len() as u64
    }

    /// The index of a node name, if present.
    pub fn index(&self, name: &str) -> Option<u64> {
        self.data.index_by_name.get(name).copied()
    }

    /// The name of node `index`.
    pub fn name(&self, index: u64) -> &str {
        &self.data.names[index as usize]
    }

    /// Ordered input edge list of node `index`.
    pub fn inputs(&self, index: u64) -> &[u64] {
        &self.data.inputs[index as usize]
    }

    /// Ordered output edge list of node `index`.
    pub fn outputs(&self, index: u64) -> &[u64] {
        &self.data.outputs[index as usize]
    }

    /// The monotone-logic partition of the inputs of node `index` into
    /// ordered factors.
    pub fn logic(&self, index: u64) -> &[Vec<u64>] {
        &self.data.logic[index as usize]
    }

    /// `true` iff node `index` is marked essential.
    pub fn essential(&self, index: u64) -> bool {
        self.data.essential[index as usize]
    }

    /// `true` iff the edge `source -> target` is activating.
    ///
    /// # Panics
    ///
    /// Panics if the network has no such edge.
    pub fn interaction(&self, source: u64, target: u64) -> bool {
        self.data.edge_type[&(source, target)]
    }

    /// The position of the edge `source -> target` in `source`'s ordered
    /// output list.
    ///
    /// # Panics
    ///
    /// Panics if the network has no such edge.
    pub fn order(&self, source: u64, target: u64) -> u64 {
        self.data.order[&(source, target)]
    }

    /// Domain limits of the phase space: `outdegree(d) + 1` per node.
    pub fn domains(&self) -> Vec<u64> {
        self.data
            .outputs
            .iter()
            .map(|outputs| outputs.len() as u64 + 1)
            .collect()
    }

    /// The normalized specification text the network was parsed from.
    pub fn specification(&self) -> &str {
        &self.data.specification
    }

    /// Graphviz text form; repressing edges get tee arrowheads.
    pub fn graphviz(&self) -> String {
        let mut out = String::from("digraph {\n");
        for name in &self.data.names {
            out.push_str(&format!("{name};\n"));
        }
        for target in 0..self.size() {
            for &source in self.inputs(target) {
                let head = if self.interaction(source, target) {
                    "normal"
                } else {
                    "tee"
                };
                out.push_str(&format!(
                    "{} -> {} [arrowhead=\"{head}\"];\n",
                    self.name(source),
                    self.name(target)
                ));
            }
        }
        out.push_str("}\n");
        out
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.graphviz())
    }
}

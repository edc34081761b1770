use crate::dynamics::Annotation;
use crate::graph::{Digraph, DigraphBuilder};
use crate::parameter::Parameter;
use log::debug;
use std::collections::HashMap;
use std::fmt;

/// The state-transition graph over phase-space domains induced by one decoded
/// parameter.
///
/// Vertices are all domain indices; a directed edge runs toward a neighbor
/// whenever the shared wall is absorbing on the source side and not on the
/// target side, so mutual outflow pairs (a spurious bidirectional-flow
/// artifact of the discretization) cancel instead of surviving in both
/// directions. A domain with no absorbing wall is attracting and gets a
/// self-loop.
#[derive(Clone, Debug)]
pub struct DomainGraph {
    dimension: u64,
    digraph: Digraph,
    parameter: Parameter,
    labelling: Vec<u64>,
    direction: HashMap<u64, u64>,
}

impl DomainGraph {
    /// Build the domain graph of `parameter`.
    pub fn new(parameter: Parameter) -> DomainGraph {
        let dimension = parameter.network().size();
        let limits = parameter.network().domains();
        let mut jump = vec![0u64; dimension as usize];
        let mut size = 1u64;
        let mut direction = HashMap::new();
        for d in 0..dimension as usize {
            jump[d] = size;
            size *= limits[d];
            direction.insert(jump[d], d as u64);
        }
        let labelling = parameter.labelling();
        let mut builder = DigraphBuilder::with_vertices(size);
        for i in 0..size {
            if labelling[i as usize] == 0 {
                builder.add_edge(i, i);
            }
            for d in 0..dimension as usize {
                let left_bit = 1u64 << d;
                let right_bit = 1u64 << (dimension as usize + d);
                if labelling[i as usize] & right_bit != 0 {
                    let j = i + jump[d];
                    if labelling[j as usize] & left_bit == 0 {
                        builder.add_edge(i, j);
                    }
                }
                if labelling[i as usize] & left_bit != 0 {
                    let j = i - jump[d];
                    if labelling[j as usize] & right_bit == 0 {
                        builder.add_edge(i, j);
                    }
                }
            }
        }
        let digraph = builder.finalize();
        debug!("domain graph over {size} domains in dimension {dimension}");
        DomainGraph {
            dimension,
            digraph,
            parameter,
            labelling,
            direction,
        }
    }

    pub fn parameter(&self) -> &Parameter {
        &self.parameter
    }

    pub fn digraph(&self) -> &Digraph {
        &self.digraph
    }

    /// Dimension of the phase space.
    pub fn dimension(&self) -> u64 {
        self.dimension
    }

    /// Coordinates of a domain: how many thresholds it sits above, per
    /// dimension.
    pub fn coordinates(&self, domain: u64) -> Vec<u64> {
        let limits = self.parameter.network().domains();
        let mut rest = domain;
        limits
            .iter()
            .map(|&limit| {
                let coordinate = rest % limit;
                rest /= limit;
                coordinate
            })
            .collect()
    }

    /// The wall labelling of a domain; bit `d` marks the left wall in
    /// dimension `d` absorbing, bit `d + D` the right wall.
    pub fn label(&self, domain: u64) -> u64 {
        self.labelling[domain as usize]
    }

    /// The dimension in which two adjacent domains differ; `dimension()` for
    /// identical arguments. Meaningless for non-adjacent domains.
    pub fn direction(&self, source: u64, target: u64) -> u64 {
        if source == target {
            return self.dimension;
        }
        self.direction[&source.abs_diff(target)]
    }

    /// The network node regulated across the threshold between two adjacent
    /// domains; `dimension()` for identical arguments.
    pub fn regulator(&self, source: u64, target: u64) -> u64 {
        if source == target {
            return self.dimension;
        }
        let limits = self.parameter.network().domains();
        let variable = self.direction(source, target);
        let mut domain = source.min(target);
        for limit in limits.iter().take(variable as usize) {
            domain /= limit;
        }
        let threshold = domain % limits[variable as usize];
        self.parameter.regulator(variable, threshold)
    }

    /// Classify a set of domains by its coordinate spread: a single cell in
    /// every dimension is a fixed point ("FP", plus " ON" when every
    /// coordinate sits above its lowest bin and " OFF" when every coordinate
    /// sits in it), full spread in every dimension is a full cycle ("FC"),
    /// anything else names the varying dimensions ("XC {...}").
    pub fn annotate(&self, vertices: &[u64]) -> Annotation {
        let network = self.parameter.network();
        let dimension = self.dimension as usize;
        let limits = network.domains();
        let mut indices = vertices.to_vec();
        let mut min_position = limits.clone();
        let mut max_position = vec![0u64; dimension];
        for d in 0..dimension {
            for index in indices.iter_mut() {
                let position = *index % limits[d];
                *index /= limits[d];
                min_position[d] = min_position[d].min(position);
                max_position[d] = max_position[d].max(position);
            }
        }
        let signature: Vec<u64> = (0..dimension as u64)
            .filter(|&d| min_position[d as usize] != max_position[d as usize])
            .collect();
        let label = if signature.is_empty() {
            let mut label = String::from("FP");
            let all_on = min_position.iter().all(|&p| p != 0);
            let all_off = min_position.iter().all(|&p| p == 0);
            if all_on {
                label.push_str(" ON");
            }
            if all_off {
                label.push_str(" OFF");
            }
            label
        } else if signature.len() == dimension {
            String::from("FC")
        } else {
            let names: Vec<&str> = signature.iter().map(|&d| network.name(d)).collect();
            format!("XC {{{}}}", names.join(", "))
        };
        let mut annotation = Annotation::new();
        annotation.append(label);
        annotation
    }

    /// Graphviz text form of the underlying digraph.
    pub fn graphviz(&self) -> String {
        self.digraph.graphviz()
    }
}

impl fmt::Display for DomainGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.graphviz())
    }
}

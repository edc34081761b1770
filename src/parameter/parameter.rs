use crate::error::Error;
use crate::parameter::{LogicParameter, Network, OrderParameter};
use crate::phase::Domain;
use serde_json::{Value, json};
use std::fmt;

/// One concrete choice of monotone logic and output order per network node.
///
/// A parameter is a cheap value decoded on demand from a
/// [`ParameterGraph`](crate::parameter::ParameterGraph) index; everything
/// needed to build the domain graph (wall labelling, regulators) is derived
/// from it.
#[derive(Clone, Debug)]
pub struct Parameter {
    logic: Vec<LogicParameter>,
    order: Vec<OrderParameter>,
    network: Network,
}

/// Equality compares the per-node choices; the network is shared context.
impl PartialEq for Parameter {
    fn eq(&self, other: &Parameter) -> bool {
        self.logic == other.logic && self.order == other.order
    }
}

impl Eq for Parameter {}

impl Parameter {
    /// Assemble a parameter from per-node choices.
    ///
    /// # Panics
    ///
    /// Panics unless there is exactly one logic and one order choice per
    /// network node, with shapes matching the node's in/out degrees.
    pub fn new(
        logic: Vec<LogicParameter>,
        order: Vec<OrderParameter>,
        network: Network,
    ) -> Parameter {
        assert_eq!(logic.len() as u64, network.size(), "one logic choice per node");
        assert_eq!(order.len() as u64, network.size(), "one order choice per node");
        for d in 0..network.size() {
            let i = d as usize;
            assert_eq!(logic[i].num_inputs(), network.inputs(d).len() as u64);
            assert_eq!(logic[i].num_outputs(), network.outputs(d).len() as u64);
            assert_eq!(order[i].size(), network.outputs(d).len() as u64);
        }
        Parameter {
            logic,
            order,
            network,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn logic(&self) -> &[LogicParameter] {
        &self.logic
    }

    pub fn order(&self) -> &[OrderParameter] {
        &self.order
    }

    /// Whether the wall of `domain` in dimension `collapse_dim` toward
    /// `direction` (`-1` left, `1` right) is absorbing: the flow rule pushes
    /// trajectories outward through it.
    ///
    /// # Panics
    ///
    /// The wall must exist: asking about the left wall of a minimal domain or
    /// the right wall of a maximal one panics.
    pub fn absorbing(&self, domain: &Domain, collapse_dim: u64, direction: i64) -> bool {
        let mut threshold = domain.coordinate(collapse_dim) as i64;
        if direction == -1 {
            threshold -= 1;
        }
        assert!(threshold >= 0, "no wall in that direction");
        assert!(
            (threshold as u64) < self.order[collapse_dim as usize].size(),
            "no wall in that direction"
        );
        let mut input_combination = Vec::new();
        for &source in self.network.inputs(collapse_dim) {
            let activating = self.network.interaction(source, collapse_dim);
            let in_edge = self.network.order(source, collapse_dim);
            let source_threshold = self.order[source as usize].inverse(in_edge);
            let above = domain.coordinate(source) > source_threshold;
            input_combination.push(!above ^ activating);
        }
        let flow_right = self.logic[collapse_dim as usize]
            .evaluate(&input_combination, threshold as u64);
        if direction == -1 { !flow_right } else { flow_right }
    }

    /// `true` iff no non-boundary wall of `domain` is absorbing.
    pub fn attracting(&self, domain: &Domain) -> bool {
        for d in 0..self.network.size() {
            if !domain.is_min(d) && self.absorbing(domain, d, -1) {
                return false;
            }
            if !domain.is_max(d) && self.absorbing(domain, d, 1) {
                return false;
            }
        }
        true
    }

    /// The node regulated at the `threshold`th threshold of `variable`,
    /// counting thresholds from lowest to highest.
    pub fn regulator(&self, variable: u64, threshold: u64) -> u64 {
        let out_edge = self.order[variable as usize].apply(threshold);
        self.network.outputs(variable)[out_edge as usize]
    }

    /// The wall labelling of the whole phase space, indexed by domain index.
    ///
    /// Bit `d` of entry `i` marks the left wall of domain `i` in dimension
    /// `d` absorbing, bit `d + D` the right wall. Walls on the phase-space
    /// boundary are never absorbing. Sweeps zones of constant input
    /// combination instead of evaluating every wall of every domain
    /// separately.
    ///
    /// # Panics
    ///
    /// Panics for networks with more than 32 nodes (the labelling packs
    /// `2 * D` wall bits into a `u64`).
    pub fn labelling(&self) -> Vec<u64> {
        let network = &self.network;
        let dimension = network.size() as usize;
        assert!(dimension <= 32, "wall labelling supports at most 32 nodes");
        let limits = network.domains();
        let mut jump = vec![0u64; dimension];
        let mut total = 1u64;
        for d in 0..dimension {
            jump[d] = total;
            total *= limits[d];
        }
        let mut result = vec![0u64; total as usize];

        let mut lower_limits = vec![0u64; dimension];
        let mut upper_limits = vec![0u64; dimension];
        for d in 0..dimension {
            let inputs = network.inputs(d as u64);
            for combination in 0..(1u64 << inputs.len()) {
                let bin = self.logic[d].bin(combination);
                // Which domains carry this input combination for node d?
                lower_limits.fill(0);
                upper_limits.copy_from_slice(&limits);
                for (in_order, &source) in inputs.iter().enumerate() {
                    let activating = network.interaction(source, d as u64);
                    let out_order = network.order(source, d as u64);
                    let side = combination & (1 << in_order) != 0;
                    let threshold = self.order[source as usize].inverse(out_order) + 1;
                    if activating ^ side {
                        lower_limits[source as usize] = 0;
                        upper_limits[source as usize] = threshold;
                    } else {
                        lower_limits[source as usize] = threshold;
                        upper_limits[source as usize] = limits[source as usize];
                    }
                }
                let left = lower_limits[d];
                let right = upper_limits[d];
                // Zone left of the bin flows right; zone right of it flows
                // left; domains inside the bin get no mark from this
                // combination.
                if bin > left {
                    lower_limits[d] = left;
                    upper_limits[d] = bin;
                    apply_mask(&mut result, &lower_limits, &upper_limits, &jump, 1 << (dimension + d));
                }
                if bin + 1 < right {
                    lower_limits[d] = bin + 1;
                    upper_limits[d] = right;
                    apply_mask(&mut result, &lower_limits, &upper_limits, &jump, 1 << d);
                }
            }
        }
        result
    }

    /// Text form: one entry per node, `[name,[n,m,"hex"],[permutation...]]`.
    pub fn stringify(&self) -> String {
        let entries: Vec<Value> = (0..self.network.size())
            .map(|d| {
                let logic = &self.logic[d as usize];
                json!([
                    self.network.name(d),
                    [logic.num_inputs(), logic.num_outputs(), logic.hex()],
                    self.order[d as usize].permutation()
                ])
            })
            .collect();
        Value::Array(entries).to_string()
    }

    /// Parse the [`stringify`](Parameter::stringify) text form against a
    /// network.
    pub fn parse(text: &str, network: &Network) -> Result<Parameter, Error> {
        let value: Value = serde_json::from_str(text)?;
        let entries = value.as_array().ok_or(Error::TextForm {
            what: "parameter entry array",
        })?;
        if entries.len() as u64 != network.size() {
            return Err(Error::TextForm {
                what: "parameter entry count",
            });
        }
        let mut logic = Vec::with_capacity(entries.len());
        let mut order = Vec::with_capacity(entries.len());
        for entry in entries {
            let entry = entry.as_array().filter(|e| e.len() == 3).ok_or(Error::TextForm {
                what: "parameter node entry",
            })?;
            logic.push(LogicParameter::from_value(&entry[1])?);
            order.push(OrderParameter::from_value(&entry[2])?);
        }
        Ok(Parameter::new(logic, order, network.clone()))
    }
}

/// Mark every domain in the box `[lower, upper)` with `mask`.
fn apply_mask(result: &mut [u64], lower: &[u64], upper: &[u64], jump: &[u64], mask: u64) {
    let dimension = lower.len();
    let mut domain = lower.to_vec();
    let mut width = vec![0u64; dimension];
    let mut index = 0u64;
    for d in 0..dimension {
        width[d] = upper[d] - lower[d];
        index += jump[d] * lower[d];
        if width[d] == 0 {
            return;
        }
    }
    loop {
        result[index as usize] |= mask;
        for d in 0..dimension {
            domain[d] += 1;
            index += jump[d];
            if domain[d] < upper[d] {
                break;
            }
            domain[d] = lower[d];
            index -= width[d] * jump[d];
        }
        if domain.iter().zip(lower).all(|(a, b)| a == b) {
            break;
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify())
    }
}

use crate::error::Error;
use crate::parameter::{LogicParameter, Network, OrderParameter, Parameter};
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// The bijection between 64-bit indices and [`Parameter`]s of a network.
///
/// Built once per network from precomputed per-node factor tables: plain text
/// files named `<n>_<m>_<factor-sizes>[_E].dat` under a caller-supplied
/// directory, one valid hex encoding per line, in table order. Indices split
/// into two mixed-radix numeral systems over the nodes: logic digits (base =
/// factor-table length) and order digits (base = out-degree factorial).
#[derive(Clone, Debug)]
pub struct ParameterGraph {
    network: Network,
    factors: Vec<Vec<String>>,
    factors_inv: Vec<HashMap<String, u64>>,
    logic_place_bases: Vec<u64>,
    order_place_bases: Vec<u64>,
    logic_place_values: Vec<u64>,
    order_place_values: Vec<u64>,
    fixed_order_size: u64,
    reorderings: u64,
    size: u64,
}

impl ParameterGraph {
    /// Load the factor tables for every node shape of `network` from
    /// `path` and assemble the numeral systems.
    ///
    /// A missing or malformed factor file is a fatal configuration error for
    /// that network shape.
    pub fn new(network: Network, path: &Path) -> Result<ParameterGraph, Error> {
        let dimension = network.size();
        let mut factors = Vec::with_capacity(dimension as usize);
        let mut factors_inv = Vec::with_capacity(dimension as usize);
        let mut logic_place_bases = Vec::with_capacity(dimension as usize);
        let mut order_place_bases = Vec::with_capacity(dimension as usize);
        let mut fixed_order_size = 1u64;
        let mut reorderings = 1u64;
        for d in 0..dimension {
            let m = network.outputs(d).len() as u64;
            order_place_bases.push(factorial(m));
            reorderings *= factorial(m);

            let file = factor_file(&network, d, path);
            let hex_codes = read_factor_table(&file)?;
            debug!(
                "loaded {} encodings for node {} from {}",
                hex_codes.len(),
                network.name(d),
                file.display()
            );
            let inverse: HashMap<String, u64> = hex_codes
                .iter()
                .enumerate()
                .map(|(i, hex)| (hex.clone(), i as u64))
                .collect();
            logic_place_bases.push(hex_codes.len() as u64);
            fixed_order_size *= hex_codes.len() as u64;
            factors.push(hex_codes);
            factors_inv.push(inverse);
        }
        let size = fixed_order_size * reorderings;

        let mut logic_place_values = vec![1u64; dimension as usize];
        let mut order_place_values = vec![1u64; dimension as usize];
        for i in 1..dimension as usize {
            logic_place_values[i] = logic_place_bases[i - 1] * logic_place_values[i - 1];
            order_place_values[i] = order_place_bases[i - 1] * order_place_values[i - 1];
        }

        Ok(ParameterGraph {
            network,
            factors,
            factors_inv,
            logic_place_bases,
            order_place_bases,
            logic_place_values,
            order_place_values,
            fixed_order_size,
            reorderings,
            size,
        })
    }

    /// Total number of parameters.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of parameters with all output orders fixed: the product of the
    /// per-node factor-table lengths.
    pub fn fixed_order_size(&self) -> u64 {
        self.fixed_order_size
    }

    /// Number of output-order choices: the product of the per-node
    /// out-degree factorials.
    pub fn reorderings(&self) -> u64 {
        self.reorderings
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Decode `index` into a full parameter.
    ///
    /// Fails with [`Error::IndexOutOfRange`] for `index >= size()`; indices
    /// are never clamped or wrapped.
    pub fn parameter(&self, index: u64) -> Result<Parameter, Error> {
        if index >= self.size {
            return Err(Error::IndexOutOfRange {
                index,
                size: self.size,
            });
        }
        let mut logic_index = index % self.fixed_order_size;
        let mut order_index = index / self.fixed_order_size;

        let dimension = self.network.size();
        let mut logic = Vec::with_capacity(dimension as usize);
        let mut order = Vec::with_capacity(dimension as usize);
        for d in 0..dimension as usize {
            let logic_digit = logic_index % self.logic_place_bases[d];
            logic_index /= self.logic_place_bases[d];
            let order_digit = order_index % self.order_place_bases[d];
            order_index /= self.order_place_bases[d];

            let n = self.network.inputs(d as u64).len() as u64;
            let m = self.network.outputs(d as u64).len() as u64;
            logic.push(LogicParameter::new(n, m, &self.factors[d][logic_digit as usize]));
            order.push(OrderParameter::from_rank(m, order_digit));
        }
        Ok(Parameter::new(logic, order, self.network.clone()))
    }

    /// The index of `parameter`, or `None` if any of its logic encodings is
    /// not listed in the corresponding factor table. Never guesses.
    pub fn index(&self, parameter: &Parameter) -> Option<u64> {
        let dimension = self.network.size() as usize;
        let mut logic_index = 0u64;
        let mut order_index = 0u64;
        for d in 0..dimension {
            let digit = self.factors_inv[d].get(parameter.logic()[d].hex())?;
            logic_index += self.logic_place_values[d] * digit;
            order_index += self.order_place_values[d] * parameter.order()[d].rank();
        }
        let index = order_index * self.fixed_order_size + logic_index;
        (index < self.size).then_some(index)
    }

    /// Indices of all parameters one minimal perturbation away from `index`:
    /// a single bit flip of one node's logic encoding or one adjacent
    /// transposition of one node's output order, filtered to perturbations
    /// landing on another listed encoding. Sorted ascending.
    pub fn adjacencies(&self, index: u64) -> Result<Vec<u64>, Error> {
        let parameter = self.parameter(index)?;
        let mut logic = parameter.logic().to_vec();
        let mut order = parameter.order().to_vec();
        let dimension = self.network.size() as usize;
        let mut output = Vec::new();

        for d in 0..dimension {
            for adjacent in order[d].adjacencies() {
                let saved = std::mem::replace(&mut order[d], adjacent);
                let candidate = Parameter::new(logic.clone(), order.clone(), self.network.clone());
                if let Some(adjacent_index) = self.index(&candidate) {
                    output.push(adjacent_index);
                }
                order[d] = saved;
            }
        }
        for d in 0..dimension {
            for adjacent in logic[d].adjacencies() {
                if !self.factors_inv[d].contains_key(adjacent.hex()) {
                    continue;
                }
                let saved = std::mem::replace(&mut logic[d], adjacent);
                let candidate = Parameter::new(logic.clone(), order.clone(), self.network.clone());
                if let Some(adjacent_index) = self.index(&candidate) {
                    output.push(adjacent_index);
                }
                logic[d] = saved;
            }
        }
        output.sort_unstable();
        Ok(output)
    }
}

/// Factor-table path for one node shape.
fn factor_file(network: &Network, d: u64, path: &Path) -> PathBuf {
    let n = network.inputs(d).len();
    let m = network.outputs(d).len();
    let mut name = format!("{n}_{m}");
    for factor in network.logic(d) {
        name.push_str(&format!("_{}", factor.len()));
    }
    if network.essential(d) {
        name.push_str("_E");
    }
    name.push_str(".dat");
    path.join(name)
}

fn read_factor_table(file: &Path) -> Result<Vec<String>, Error> {
    let contents = fs::read_to_string(file).map_err(|source| Error::MissingLogicResource {
        path: file.to_path_buf(),
        source,
    })?;
    let mut hex_codes = Vec::new();
    for (number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !line.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)) {
            return Err(Error::MalformedLogicResource {
                path: file.to_path_buf(),
                line: number + 1,
            });
        }
        hex_codes.push(line.to_string());
    }
    Ok(hex_codes)
}

fn factorial(m: u64) -> u64 {
    (2..=m).product()
}

impl fmt::Display for ParameterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(ParameterGraph: {} parameters, {} nodes)",
            self.size,
            self.network.size()
        )
    }
}

pub mod dynamics;
pub mod error;
pub mod graph;
pub mod parameter;
pub mod phase;

#[cfg(test)]
mod test_utils;

pub use error::Error;

use crate::dynamics::{MorseDecomposition, MorseGraph};
use crate::parameter::Parameter;
use crate::phase::DomainGraph;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Compute the Morse graph of a single decoded parameter.
///
/// This is the `Parameter → DomainGraph → MorseDecomposition → MorseGraph`
/// pipeline in one call; use the individual types when the intermediate
/// values are needed.
pub fn morse_graph(parameter: Parameter) -> MorseGraph {
    let domain_graph = DomainGraph::new(parameter);
    let decomposition = MorseDecomposition::new(domain_graph.digraph());
    MorseGraph::new(&domain_graph, &decomposition)
}

//! The discretized phase space: domains and the domain graph.

mod domain;
mod domain_graph;

#[cfg(test)]
mod tests;

pub use domain::Domain;
pub use domain_graph::DomainGraph;

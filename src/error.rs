use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by this crate.
///
/// All failures surface synchronously at the point of detection; no
/// partially-built network, parameter or graph value is ever returned.
#[derive(Debug, Error)]
pub enum Error {
    /// A factor table required by a node shape is not present in the logic
    /// resource directory. This is a fatal configuration error for that shape.
    #[error("could not find logic resource {path}")]
    MissingLogicResource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A factor table file exists but contains a line that is not a hex
    /// encoding.
    #[error("malformed logic resource {path}: line {line} is not a hex encoding")]
    MalformedLogicResource { path: PathBuf, line: usize },
    /// A network node line has no logic field.
    #[error("network node `{0}` is missing a logic field")]
    MissingLogic(String),
    /// An input occurs twice within the monotone-logic partition of one node.
    #[error("repeated input in the logic of network node `{0}`")]
    RepeatedInput(String),
    /// Any other malformed network specification.
    #[error("invalid network specification: {0}")]
    NetworkSpec(String),
    /// `ParameterGraph::parameter` was called with an index past the end of
    /// the parameter graph.
    #[error("parameter index {index} out of range (parameter graph size {size})")]
    IndexOutOfRange { index: u64, size: u64 },
    /// A text form was not valid JSON.
    #[error("malformed text representation: {0}")]
    Json(#[from] serde_json::Error),
    /// A text form was valid JSON of the wrong shape.
    #[error("unexpected {what} in text representation")]
    TextForm { what: &'static str },
}

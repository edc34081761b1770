use crate::parameter::{Network, ParameterGraph};
use std::path::PathBuf;

/// Initialize env_logger for tests. Safe to call multiple times.
pub fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// The factor tables shipped with the crate.
pub fn logic_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources/logic")
}

/// The two-node example used throughout the tests: positive feedback on `X`
/// repressed into `Y`.
pub fn example_network() -> Network {
    "X : X + Y\nY : ~X".parse().expect("example network parses")
}

pub fn example_parameter_graph() -> ParameterGraph {
    ParameterGraph::new(example_network(), &logic_dir()).expect("factor tables are shipped")
}

/// The classic bistable toggle switch.
pub fn toggle_switch() -> Network {
    "X : ~Y\nY : ~X".parse().expect("toggle switch parses")
}

//! End-to-end command generation from raw inputs.

mod runner;

pub use runner::{
    compose_spec, example_config, generate_command, CommandConfig, GroupCommand,
};

//! External process execution.

pub mod command_builder;

pub use command_builder::{CommandOutput, ToolCommand};

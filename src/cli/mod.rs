mod args;
pub mod commands;
pub mod render;

pub use args::{CliArgs, Command};
pub use commands::{Report, execute};

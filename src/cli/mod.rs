/// CLI argument parsing and command handling - Gateway
mod args;
mod commands;

pub use args::{ChildArgs, ChildrenCommands, Cli, Commands};
pub use commands::handle_command;

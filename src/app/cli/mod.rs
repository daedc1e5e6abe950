//! CLI module containing argument parsing and subcommand execution

pub mod args;
pub mod commands;

pub use args::{Cli, Command, ConsumeArgs, GlobalArgs};
pub use commands::{run, OutputOptions};

#[cfg(test)]
mod tests;

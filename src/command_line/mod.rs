//! Argument parsing and the command handlers behind each subcommand.

pub mod cli;

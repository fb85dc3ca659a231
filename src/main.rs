//! # Component Tree CLI
//!
//! This is the binary entry point for the `component-tree` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging with `env_logger`.
//! - Executing the selected inspection command.
//!
//! The resolution logic lives in the library crate; the binary only wires it
//! to the local filesystem and prints the results.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}

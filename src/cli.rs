//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Component Tree - Inspect metadata components resolved from source files
#[derive(Parser, Debug)]
#[command(name = "component-tree")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Display a component and its children as a tree of full names
    Tree(commands::tree::TreeArgs),

    /// List a component's files next to their packaged paths
    Paths(commands::paths::PathsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .init();

        match self.command {
            Commands::Tree(args) => commands::tree::execute(args),
            Commands::Paths(args) => commands::paths::execute(args),
        }
    }
}

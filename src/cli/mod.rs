//! Command-line interface for primeshard
//!
//! This module provides the main CLI structure and command handling. It uses
//! clap for argument parsing and routes each subcommand to its own module.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commands;
mod output;

pub use output::Output;

/// Primeshard - parallel range-partitioned prime search
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Execute a prime search run
    Run(commands::run::RunArgs),
    /// Show the partition plan without dispatching any work
    Plan(commands::plan::PlanArgs),
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Show version information
    Version,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the merged configuration
    Show,
    /// Write a commented primeshard.toml scaffold
    Init {
        /// Overwrite an existing primeshard.toml
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);

        match self.command {
            Commands::Run(args) => commands::run::execute(args, self.config.as_deref(), &output),
            Commands::Plan(args) => commands::plan::execute(args, self.config.as_deref(), &output),
            Commands::Config(cmd) => {
                commands::config::execute(cmd, self.config.as_deref(), &output)
            }
            Commands::Version => commands::version::execute(&output),
        }
    }
}

/// Map the verbosity flags onto a tracing filter. `RUST_LOG` wins when set.
fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

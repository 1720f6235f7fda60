use anyhow::Result;
use clap::Parser;

use primeshard::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}

//! Configuration command implementations

use std::path::Path;

use anyhow::Result;

use crate::cli::{ConfigCommands, Output};
use crate::config::{PrimeshardConfig, DEFAULT_CONFIG};

/// Execute configuration commands
pub fn execute(cmd: ConfigCommands, config_path: Option<&str>, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(config_path, output),
        ConfigCommands::Init { force } => init(force, output),
    }
}

/// Print the fully merged configuration
fn show(config_path: Option<&str>, output: &Output) -> Result<()> {
    let config = PrimeshardConfig::load_with_custom_config(config_path)?;
    output.header("⚙ Configuration");
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

/// Write the commented default config as a starting point
fn init(force: bool, output: &Output) -> Result<()> {
    let path = Path::new("primeshard.toml");
    if path.exists() && !force {
        anyhow::bail!("primeshard.toml already exists (use --force to overwrite)");
    }
    std::fs::write(path, DEFAULT_CONFIG)?;
    output.success("Wrote primeshard.toml");
    Ok(())
}

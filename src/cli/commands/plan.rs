//! Plan command: preview the partition split
//!
//! Computes the same partitions a run would use and prints them as a table,
//! without touching the worker pool or the filesystem.

use anyhow::Result;
use clap::Args;

use crate::cli::Output;
use crate::config::PrimeshardConfig;
use crate::coordinator;
use crate::search::{partition, SearchSpace};

#[derive(Args)]
pub struct PlanArgs {
    /// Exclusive upper bound of the search space
    #[arg(long)]
    pub upper: Option<u64>,

    /// Inclusive lower bound of the search space
    #[arg(long)]
    pub lower: Option<u64>,

    /// Compute workers (defaults to one per available core)
    #[arg(short, long)]
    pub workers: Option<usize>,
}

/// Execute the plan command
pub fn execute(args: PlanArgs, config_path: Option<&str>, output: &Output) -> Result<()> {
    let config = PrimeshardConfig::load_with_custom_config(config_path)?;

    let space = SearchSpace::new(
        args.lower.unwrap_or(config.search.lower),
        args.upper.unwrap_or(config.search.upper),
    );
    if space.upper < space.lower {
        anyhow::bail!(
            "upper bound {} is below lower bound {}",
            space.upper,
            space.lower
        );
    }

    let requested = args.workers.or(match config.workers.count {
        0 => None,
        n => Some(n),
    });
    let workers = coordinator::resolve_workers(requested)?;
    let partitions = partition(space, workers)?;

    output.header("🗺  Partition Plan");
    output.key_value("Space:", &format!("[{}, {})", space.lower, space.upper));
    output.key_value("Workers:", &workers.to_string());
    output.blank_line();
    for part in &partitions {
        output.table_row(
            &format!("partition {}", part.id),
            &format!("[{}, {}) -> {}", part.start, part.end, part.output_key),
        );
    }

    Ok(())
}

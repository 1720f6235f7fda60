//! Run command: execute a full prime search
//!
//! Merges CLI flags over the loaded configuration, wires up the console
//! observer, executes the run, and renders the report in the requested
//! format. Exits nonzero when any partition failed.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use indicatif::ProgressBar;
use serde::Serialize;

use crate::cli::Output;
use crate::config::PrimeshardConfig;
use crate::coordinator::{
    self, NullObserver, RunObserver, RunReport, RunSettings, TaskOutcome, TaskState, TaskStatus,
};
use crate::search::SearchSpace;

#[derive(Args, Serialize)]
pub struct RunArgs {
    /// Exclusive upper bound of the search space
    #[arg(long)]
    pub upper: Option<u64>,

    /// Inclusive lower bound of the search space
    #[arg(long)]
    pub lower: Option<u64>,

    /// Compute workers (defaults to one per available core)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Writer threads in the persistence pool
    #[arg(long)]
    pub io_threads: Option<usize>,

    /// Directory receiving one output file per partition
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum, Serialize)]
pub enum OutputFormat {
    /// Styled per-partition summary
    Text,
    /// Serialized run report for machine processing
    Json,
}

impl RunArgs {
    /// CLI flags win over config values; a config worker count of 0 means
    /// "auto", expressed as `None` toward the coordinator.
    fn to_settings(&self, config: &PrimeshardConfig) -> RunSettings {
        let workers = self.workers.or(match config.workers.count {
            0 => None,
            n => Some(n),
        });
        RunSettings {
            space: SearchSpace::new(
                self.lower.unwrap_or(config.search.lower),
                self.upper.unwrap_or(config.search.upper),
            ),
            workers,
            io_threads: self.io_threads.unwrap_or(config.workers.io_threads),
            output_dir: self
                .output_dir
                .clone()
                .unwrap_or_else(|| config.output.dir.clone()),
        }
    }
}

/// Execute the run command
pub fn execute(args: RunArgs, config_path: Option<&str>, output: &Output) -> Result<()> {
    if let Some(path) = config_path {
        if !Path::new(path).exists() {
            output.warning(&format!("Config file not found: {path}"));
        }
    }
    let config = PrimeshardConfig::load_with_custom_config(config_path)?;
    let settings = args.to_settings(&config);

    if settings.space.upper < settings.space.lower {
        anyhow::bail!(
            "upper bound {} is below lower bound {}",
            settings.space.upper,
            settings.space.lower
        );
    }

    let workers = coordinator::resolve_workers(settings.workers)?;
    let text = matches!(args.format, OutputFormat::Text);

    if text {
        output.header("🔢 Prime Search");
        output.key_value(
            "Space:",
            &format!("[{}, {})", settings.space.lower, settings.space.upper),
        );
        output.key_value("Workers:", &workers.to_string());
        output.key_value("Output:", &settings.output_dir.display().to_string());
        output.blank_line();
    }

    // The bar and verbose state lines fight over the terminal; verbose wins.
    let progress = if text
        && !output.is_quiet()
        && !output.is_verbose()
        && atty::is(atty::Stream::Stdout)
    {
        Some(output.progress_bar(workers as u64, "partitions"))
    } else {
        None
    };

    let console = ConsoleObserver { output, progress };
    let silent = NullObserver;
    let observer: &dyn RunObserver = if text { &console } else { &silent };

    let report = coordinator::run(&settings, observer)?;

    if let Some(bar) = &console.progress {
        bar.finish_and_clear();
    }

    match args.format {
        OutputFormat::Text => render_text(&report, output),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if report.interrupted {
        output.warning("Collection was interrupted; one or more partitions have no outcome");
    }
    if !report.all_succeeded() {
        anyhow::bail!(
            "{} of {} partitions failed",
            report.failed_count(),
            report.outcomes.len()
        );
    }
    Ok(())
}

/// Console observer: verbose state transitions plus a progress bar when
/// stdout is a terminal.
struct ConsoleObserver<'a> {
    output: &'a Output,
    progress: Option<ProgressBar>,
}

impl RunObserver for ConsoleObserver<'_> {
    fn task_state(&self, partition_id: usize, state: TaskState) {
        self.output
            .verbose(&format!("partition {partition_id}: {state:?}"));
    }

    fn partition_finished(&self, _outcome: &TaskOutcome) {
        if let Some(bar) = &self.progress {
            bar.inc(1);
        }
    }
}

fn render_text(report: &RunReport, output: &Output) {
    output.blank_line();
    for outcome in &report.outcomes {
        match &outcome.status {
            TaskStatus::Completed => output.success(&format!(
                "partition {} finished ({} primes found)",
                outcome.partition_id, outcome.count
            )),
            TaskStatus::Failed(failure) => output.error(&format!(
                "partition {} failed: {}",
                outcome.partition_id, failure
            )),
        }
        if output.is_verbose() {
            output.verbose(&format!(
                "  compute {} ms, persist {} ms, file {}",
                outcome.compute_ms, outcome.persist_ms, outcome.output_key
            ));
        }
    }
    output.blank_line();
    output.key_value("Total primes found:", &report.total_primes.to_string());
    output.info(&format!(
        "Completed in {:.2} seconds ({} workers)",
        report.wall_clock_secs, report.workers
    ));
}

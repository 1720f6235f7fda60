//! # Primeshard - Parallel Range-Partitioned Prime Search
//!
//! Primeshard splits a bounded integer search space into contiguous
//! partitions, runs a trial-division sweep over each partition on a
//! fixed-size worker pool, and persists every partition's primes to its own
//! file through a bounded writer pool.
//!
//! ## Features
//!
//! - **Deterministic partitioning**: reproducible split for a fixed space and
//!   worker count, gap-free and overlap-free
//! - **Failure isolation**: one partition's write failure never affects its
//!   siblings or aborts the run
//! - **Ordered reporting**: outcomes are collected and reported in submission
//!   order regardless of completion order
//! - **Bounded I/O**: persistence goes through a fixed writer pool, not one
//!   thread per file
//!
//! ## Quick Start
//!
//! ```bash
//! # Install primeshard
//! cargo install primeshard
//!
//! # Search the default space with one worker per core
//! primeshard run
//!
//! # Preview the partition plan
//! primeshard plan --upper 1000000 --workers 4
//! ```

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod persist;
pub mod search;

pub use cli::{Cli, Output};
pub use config::PrimeshardConfig;

/// Result type alias for primeshard operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

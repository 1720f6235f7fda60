//! Command implementations for the primeshard CLI
//!
//! Each subcommand lives in its own module and receives the shared
//! [`Output`](crate::cli::Output) handler from the top-level dispatcher.

pub mod config;
pub mod plan;
pub mod run;
pub mod version;

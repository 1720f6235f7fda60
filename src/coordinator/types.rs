//! Result and status types for a search run

use std::path::PathBuf;

use serde::Serialize;

/// Pre-dispatch failure. Nothing has been submitted when one of these is
/// raised, and the whole run aborts.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("worker count must be at least 1 (got {0})")]
    InvalidWorkerCount(usize),
    #[error("cannot prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Lifecycle of one partition's task.
///
/// `Completed` and `Failed` are terminal; there is no cancellation
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Created,
    Submitted,
    Computing,
    Persisting,
    Completed,
    Failed,
}

/// Why a task failed. Always scoped to that task; siblings are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum TaskFailure {
    /// The partition's output file could not be written.
    #[error("persistence failed: {0}")]
    Io(String),
    /// The collection wait ended without an outcome from the worker.
    #[error("collection interrupted: {0}")]
    Disconnected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Completed,
    Failed(TaskFailure),
}

/// Final record for one partition, owned and aggregated by the coordinator.
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutcome {
    pub partition_id: usize,
    pub output_key: String,
    /// Primes found in the partition. For a task that disconnected before
    /// reporting, the count is unknown and recorded as zero.
    pub count: usize,
    pub status: TaskStatus,
    pub compute_ms: u64,
    pub persist_ms: u64,
}

impl TaskOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Placeholder outcome for a task whose worker vanished mid-run.
    pub fn disconnected(partition_id: usize, output_key: String) -> Self {
        Self {
            partition_id,
            output_key,
            count: 0,
            status: TaskStatus::Failed(TaskFailure::Disconnected(
                "worker disconnected before reporting an outcome".to_string(),
            )),
            compute_ms: 0,
            persist_ms: 0,
        }
    }
}

/// Aggregated result of one run. Built once, rendered, then discarded.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Sum of prime counts over completed partitions, i.e. primes that are
    /// actually present in output files.
    pub total_primes: usize,
    /// One outcome per partition, in submission order.
    pub outcomes: Vec<TaskOutcome>,
    pub wall_clock_secs: f64,
    pub workers: usize,
    /// True when any worker disconnected during collection. Surfaced here so
    /// callers see the interruption even though the run completed.
    pub interrupted: bool,
}

impl RunReport {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(TaskOutcome::succeeded)
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_outcome_is_failed() {
        let outcome = TaskOutcome::disconnected(3, "primes_30_40.txt".to_string());
        assert!(!outcome.succeeded());
        assert_eq!(outcome.partition_id, 3);
        assert!(matches!(
            outcome.status,
            TaskStatus::Failed(TaskFailure::Disconnected(_))
        ));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = RunReport {
            total_primes: 4,
            outcomes: vec![TaskOutcome {
                partition_id: 0,
                output_key: "primes_0_10.txt".to_string(),
                count: 4,
                status: TaskStatus::Completed,
                compute_ms: 1,
                persist_ms: 0,
            }],
            wall_clock_secs: 0.01,
            workers: 1,
            interrupted: false,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_primes"], 4);
        assert_eq!(json["outcomes"][0]["status"], "completed");
    }
}

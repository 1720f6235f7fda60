//! Injected observability sink for run progress
//!
//! The coordinator never writes to the console itself; it reports through a
//! [`RunObserver`] supplied by the caller. The CLI installs a console
//! observer, tests install a recording one, and callers that want silence use
//! [`NullObserver`].

use super::types::{TaskOutcome, TaskState};

/// Receives run progress events.
///
/// `task_state` is called from worker threads, so implementations must be
/// `Sync` and should not block.
pub trait RunObserver: Sync {
    /// A task moved to a new lifecycle state.
    fn task_state(&self, _partition_id: usize, _state: TaskState) {}

    /// A partition's outcome was collected. Called from the coordinating
    /// thread, in submission order.
    fn partition_finished(&self, _outcome: &TaskOutcome) {}
}

/// Observer that ignores every event.
pub struct NullObserver;

impl RunObserver for NullObserver {}

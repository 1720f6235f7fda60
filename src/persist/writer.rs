//! Bounded writer pool for partition results
//!
//! Persistence runs on a small fixed set of I/O threads fed by a bounded
//! channel, so thread count never scales with partition count. A task submits
//! its result set and gets a [`WriteTicket`] back; waiting on the ticket
//! blocks until that specific file has been written and flushed. A task must
//! not report success before its ticket resolves.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use crossbeam::channel::{bounded, Receiver, Sender};

/// Failure of a single persistence job. Isolated to the submitting task.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("writer pool shut down before {path} was written")]
    PoolClosed { path: PathBuf },
}

struct WriteJob {
    path: PathBuf,
    primes: Vec<u64>,
    done: Sender<Result<(), PersistError>>,
}

/// Completion handle for one submitted write job.
pub struct WriteTicket {
    path: PathBuf,
    done: Receiver<Result<(), PersistError>>,
}

impl WriteTicket {
    /// Block until the submitted write has finished, returning its outcome.
    pub fn wait(self) -> Result<(), PersistError> {
        match self.done.recv() {
            Ok(result) => result,
            // Writer thread went away without answering.
            Err(_) => Err(PersistError::PoolClosed { path: self.path }),
        }
    }
}

/// Fixed-size pool of writer threads behind a bounded job channel.
pub struct WriterPool {
    jobs: Sender<WriteJob>,
    handles: Vec<JoinHandle<()>>,
}

impl WriterPool {
    /// Start `io_threads` writer threads (at least one).
    pub fn start(io_threads: usize) -> Self {
        let threads = io_threads.max(1);
        let (jobs, job_rx) = bounded::<WriteJob>(threads * 2);

        let mut handles = Vec::with_capacity(threads);
        for id in 0..threads {
            let job_rx = job_rx.clone();
            let handle = std::thread::Builder::new()
                .name(format!("primeshard-io-{id}"))
                .spawn(move || writer_loop(id, job_rx))
                .expect("failed to spawn writer thread");
            handles.push(handle);
        }

        Self { jobs, handles }
    }

    /// Submit one result set for persistence.
    ///
    /// Blocks while the job channel is full (backpressure against the
    /// compute workers). The returned ticket resolves once the file is
    /// written; if the pool is already gone the ticket resolves to
    /// [`PersistError::PoolClosed`].
    pub fn submit(&self, path: PathBuf, primes: Vec<u64>) -> WriteTicket {
        let (done_tx, done_rx) = bounded(1);
        let ticket = WriteTicket {
            path: path.clone(),
            done: done_rx,
        };
        let _ = self.jobs.send(WriteJob {
            path,
            primes,
            done: done_tx,
        });
        ticket
    }

    /// Close the job channel and join every writer thread.
    pub fn shutdown(self) {
        drop(self.jobs);
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}

fn writer_loop(worker_id: usize, jobs: Receiver<WriteJob>) {
    while let Ok(job) = jobs.recv() {
        tracing::debug!(
            "writer {} persisting {} primes to {}",
            worker_id,
            job.primes.len(),
            job.path.display()
        );
        let result = write_primes(&job.path, &job.primes).map_err(|source| PersistError::Io {
            path: job.path.clone(),
            source,
        });
        // Submitter may have vanished; nothing left to notify then.
        let _ = job.done.send(result);
    }
}

/// Write primes one per line, ascending, truncating any previous content.
///
/// Rewriting the same results to the same path is byte-identical, which makes
/// re-runs idempotent.
pub fn write_primes(path: &Path, primes: &[u64]) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    for p in primes {
        writeln!(out, "{p}")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_primes_one_per_line_with_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("primes_0_10.txt");
        write_primes(&path, &[2, 3, 5, 7]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "2\n3\n5\n7\n");
    }

    #[test]
    fn test_write_primes_truncates_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("primes_0_10.txt");
        fs::write(&path, "stale data that is much longer than the new content").unwrap();
        write_primes(&path, &[2, 3]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "2\n3\n");
    }

    #[test]
    fn test_pool_writes_and_ticket_blocks_until_done() {
        let dir = TempDir::new().unwrap();
        let pool = WriterPool::start(2);

        let path = dir.path().join("primes_0_30.txt");
        let ticket = pool.submit(path.clone(), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        ticket.wait().unwrap();
        // Once the ticket resolves the file must already be on disk.
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "2\n3\n5\n7\n11\n13\n17\n19\n23\n29\n"
        );

        pool.shutdown();
    }

    #[test]
    fn test_unwritable_destination_reports_io_error() {
        let dir = TempDir::new().unwrap();
        // A directory standing where the file should go makes create() fail.
        let path = dir.path().join("primes_0_10.txt");
        fs::create_dir(&path).unwrap();

        let pool = WriterPool::start(1);
        let err = pool.submit(path, vec![2, 3]).wait().unwrap_err();
        assert!(matches!(err, PersistError::Io { .. }));
        pool.shutdown();
    }

    #[test]
    fn test_many_jobs_through_few_threads() {
        let dir = TempDir::new().unwrap();
        let pool = WriterPool::start(2);

        let tickets: Vec<_> = (0..16)
            .map(|i| {
                let path = dir.path().join(format!("primes_{}_{}.txt", i * 10, (i + 1) * 10));
                pool.submit(path, vec![i])
            })
            .collect();
        for ticket in tickets {
            ticket.wait().unwrap();
        }
        pool.shutdown();

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 16);
    }
}

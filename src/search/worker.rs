//! Per-partition compute sweep

use super::primality::is_prime;
use super::space::Partition;

/// Sweep one partition sequentially and return its primes in ascending order.
///
/// This is the CPU-bound half of a task. It runs on exactly one worker thread
/// and never touches I/O; persistence happens afterwards through the writer
/// pool.
pub fn collect_primes(partition: &Partition) -> Vec<u64> {
    (partition.start..partition.end)
        .filter(|&n| is_prime(n))
        .collect()
}

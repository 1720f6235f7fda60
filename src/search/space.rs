//! Search space partitioning
//!
//! A bounded search space is split into contiguous, non-overlapping
//! partitions, one per worker. The split is pure and deterministic, so the
//! partition assignment for a fixed space and worker count is reproducible
//! across runs.

use serde::Serialize;

use crate::coordinator::SetupError;

/// A half-open integer range `[lower, upper)` to sweep for primes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchSpace {
    pub lower: u64,
    pub upper: u64,
}

impl SearchSpace {
    pub fn new(lower: u64, upper: u64) -> Self {
        Self { lower, upper }
    }

    /// Number of integers in the space. Inverted bounds count as empty.
    pub fn size(&self) -> u64 {
        self.upper.saturating_sub(self.lower)
    }
}

/// One contiguous sub-range `[start, end)` assigned to exactly one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub id: usize,
    pub start: u64,
    pub end: u64,
    /// File name the partition's results are written under. Derived from the
    /// bounds, so it is unique per partition and stable across runs.
    pub output_key: String,
}

impl Partition {
    pub fn new(id: usize, start: u64, end: u64) -> Self {
        let output_key = format!("primes_{start}_{end}.txt");
        Self {
            id,
            start,
            end,
            output_key,
        }
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Split `space` into `workers` contiguous partitions.
///
/// Every partition spans `chunk = size / workers` integers except the last,
/// which runs to the upper bound and absorbs the division remainder. The
/// partitions cover the space exactly once: no gaps, no overlaps.
pub fn partition(space: SearchSpace, workers: usize) -> Result<Vec<Partition>, SetupError> {
    if workers == 0 {
        return Err(SetupError::InvalidWorkerCount(0));
    }

    let chunk = space.size() / workers as u64;
    let mut partitions = Vec::with_capacity(workers);
    for i in 0..workers {
        let start = space.lower + i as u64 * chunk;
        let end = if i == workers - 1 {
            space.upper
        } else {
            space.lower + (i as u64 + 1) * chunk
        };
        partitions.push(Partition::new(i, start, end));
    }
    Ok(partitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(space: SearchSpace, partitions: &[Partition]) {
        let mut cursor = space.lower;
        for part in partitions {
            assert_eq!(part.start, cursor, "gap or overlap before partition {}", part.id);
            assert!(part.end >= part.start);
            cursor = part.end;
        }
        assert_eq!(cursor, space.upper.max(space.lower));
    }

    #[test]
    fn test_even_split() {
        let space = SearchSpace::new(0, 30);
        let parts = partition(space, 3).unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!((parts[0].start, parts[0].end), (0, 10));
        assert_eq!((parts[1].start, parts[1].end), (10, 20));
        assert_eq!((parts[2].start, parts[2].end), (20, 30));
        assert_covers(space, &parts);
    }

    #[test]
    fn test_remainder_goes_to_last_partition() {
        let space = SearchSpace::new(0, 100);
        let parts = partition(space, 3).unwrap();
        assert_eq!((parts[0].start, parts[0].end), (0, 33));
        assert_eq!((parts[1].start, parts[1].end), (33, 66));
        assert_eq!((parts[2].start, parts[2].end), (66, 100));
        assert_covers(space, &parts);
    }

    #[test]
    fn test_nonzero_lower_bound() {
        let space = SearchSpace::new(17, 92);
        let parts = partition(space, 4).unwrap();
        assert_covers(space, &parts);
        assert_eq!(parts[0].start, 17);
        assert_eq!(parts[3].end, 92);
    }

    #[test]
    fn test_single_worker_takes_everything() {
        let space = SearchSpace::new(5, 500);
        let parts = partition(space, 1).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!((parts[0].start, parts[0].end), (5, 500));
    }

    #[test]
    fn test_more_workers_than_integers() {
        let space = SearchSpace::new(0, 3);
        let parts = partition(space, 8).unwrap();
        assert_eq!(parts.len(), 8);
        assert_covers(space, &parts);
        // chunk is 0, so everything lands in the final partition
        assert_eq!((parts[7].start, parts[7].end), (0, 3));
    }

    #[test]
    fn test_empty_space() {
        let space = SearchSpace::new(10, 10);
        let parts = partition(space, 4).unwrap();
        assert_eq!(parts.len(), 4);
        assert!(parts.iter().all(|p| p.is_empty()));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let space = SearchSpace::new(0, 100);
        let err = partition(space, 0).unwrap_err();
        assert!(matches!(err, SetupError::InvalidWorkerCount(0)));
    }

    #[test]
    fn test_output_keys_unique_and_deterministic() {
        let space = SearchSpace::new(0, 1000);
        let parts = partition(space, 7).unwrap();
        let again = partition(space, 7).unwrap();
        assert_eq!(parts, again);
        assert_eq!(parts[0].output_key, "primes_0_142.txt");
        let mut keys: Vec<_> = parts.iter().map(|p| p.output_key.clone()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), parts.len());
    }
}

//! Multi-threaded age reductions.
//!
//! Workers only ever read the age column. Each one produces a single partial
//! sum and the caller adds the partials once every worker has finished.

use crossbeam_channel::{bounded, unbounded};
use rayon::prelude::*;
use std::ops::Range;
use std::thread;
use tracing::debug;

use crate::kernels::{sum_ages, sum_unrolled};

/// Chunk size handed to rayon by `sum_rayon_chunks`.
pub const RAYON_CHUNK: usize = 1024 * 1024;

/// Splits `0..len` into at most `workers` contiguous ranges.
///
/// The chunk size is `len / workers` floored at 1, and the last range absorbs
/// whatever integer division left over. Returns no ranges for `len == 0`.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, len);
    let chunk = (len / workers).max(1);
    (0..workers)
        .map(|k| {
            let start = k * chunk;
            let end = if k + 1 == workers { len } else { start + chunk };
            start..end
        })
        .collect()
}

/// Fixed-size chunks of `len / workers` (at least 1) for the work queue.
/// The last chunk may be short.
pub fn queue_chunks(len: usize, workers: usize) -> Vec<Range<usize>> {
    let chunk = (len / workers.max(1)).max(1);
    (0..len)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(len))
        .collect()
}

/// One scoped thread per range from `partition`, joined before returning.
fn fan_out(ages: &[u8], workers: usize, kernel: fn(&[u8]) -> u64) -> u64 {
    let ranges = partition(ages.len(), workers);
    debug!(len = ages.len(), workers = ranges.len(), "fan_out");

    thread::scope(|s| {
        let handles: Vec<_> = ranges
            .into_iter()
            .map(|range| {
                let chunk = &ages[range];
                s.spawn(move || kernel(chunk))
            })
            .collect();

        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(partial) => partial,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .sum::<u64>()
    })
}

/// Static partition, plain scalar loop per worker.
pub fn sum_fixed_partition(ages: &[u8], workers: usize) -> u64 {
    fan_out(ages, workers, sum_ages)
}

/// Static partition, 8-way unrolled loop per worker.
pub fn sum_fixed_partition_unrolled(ages: &[u8], workers: usize) -> u64 {
    fan_out(ages, workers, sum_unrolled)
}

/// A pool of `workers` threads pulls chunks from a bounded queue.
///
/// The calling thread is the producer: it enqueues every chunk and then drops
/// the sender, which ends each worker's receive loop. Every worker sends
/// exactly one partial sum on the report channel, including workers that
/// never received a chunk.
pub fn sum_work_queue(ages: &[u8], workers: usize) -> u64 {
    if ages.is_empty() {
        return 0;
    }
    let workers = workers.max(1);
    let chunks = queue_chunks(ages.len(), workers);
    debug!(len = ages.len(), workers, chunks = chunks.len(), "work_queue");

    let (work_tx, work_rx) = bounded::<&[u8]>(workers);
    let (report_tx, report_rx) = unbounded::<u64>();

    thread::scope(|s| {
        for _ in 0..workers {
            let work_rx = work_rx.clone();
            let report_tx = report_tx.clone();
            s.spawn(move || {
                let mut local = 0u64;
                for chunk in work_rx.iter() {
                    local += sum_ages(chunk);
                }
                let _ = report_tx.send(local);
            });
        }
        drop(work_rx);
        drop(report_tx);

        for range in chunks {
            if work_tx.send(&ages[range]).is_err() {
                break;
            }
        }
        drop(work_tx);

        report_rx.iter().sum::<u64>()
    })
}

/// Rayon work stealing over `RAYON_CHUNK`-sized pieces.
pub fn sum_rayon_chunks(ages: &[u8]) -> u64 {
    ages.par_chunks(RAYON_CHUNK).map(sum_unrolled).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(ranges: &[Range<usize>], len: usize) {
        let mut next = 0;
        for r in ranges {
            assert_eq!(r.start, next, "gap or overlap at {:?}", r);
            assert!(r.end > r.start, "empty range {:?}", r);
            next = r.end;
        }
        assert_eq!(next, len);
    }

    #[test]
    fn test_partition_empty() {
        assert!(partition(0, 8).is_empty());
        assert!(queue_chunks(0, 8).is_empty());
    }

    #[test]
    fn test_partition_fewer_items_than_workers() {
        let ranges = partition(3, 16);
        assert_eq!(ranges, vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_partition_remainder_goes_to_last() {
        let ranges = partition(10, 4);
        assert_eq!(ranges, vec![0..2, 2..4, 4..6, 6..10]);
    }

    #[test]
    fn test_partition_zero_workers() {
        assert_eq!(partition(5, 0), vec![0..5]);
    }

    #[test]
    fn test_partition_properties() {
        for len in 0..70 {
            for workers in 1..12 {
                let ranges = partition(len, workers);
                assert!(ranges.len() <= workers.min(len));
                if len > 0 {
                    assert!(!ranges.is_empty());
                }
                assert_covers(&ranges, len);

                let chunks = queue_chunks(len, workers);
                assert_covers(&chunks, len);
            }
        }
    }

    #[test]
    fn test_queue_chunks_short_tail() {
        assert_eq!(queue_chunks(10, 4), vec![0..2, 2..4, 4..6, 6..8, 8..10]);
        assert_eq!(queue_chunks(11, 2), vec![0..5, 5..10, 10..11]);
    }

    #[test]
    fn test_parallel_sums_match_serial() {
        let ages: Vec<u8> = (0..1_237usize).map(|i| (i % 100) as u8).collect();
        let expected = sum_ages(&ages);
        for workers in [1, 2, 3, 7, 8, 64, 300] {
            assert_eq!(sum_fixed_partition(&ages, workers), expected, "workers {}", workers);
            assert_eq!(sum_fixed_partition_unrolled(&ages, workers), expected, "workers {}", workers);
            assert_eq!(sum_work_queue(&ages, workers), expected, "workers {}", workers);
        }
        assert_eq!(sum_rayon_chunks(&ages), expected);
    }

    #[test]
    fn test_parallel_empty() {
        assert_eq!(sum_fixed_partition(&[], 4), 0);
        assert_eq!(sum_fixed_partition_unrolled(&[], 4), 0);
        assert_eq!(sum_work_queue(&[], 4), 0);
        assert_eq!(sum_rayon_chunks(&[]), 0);
    }

    #[test]
    fn test_rayon_spans_multiple_chunks() {
        let ages = vec![3u8; RAYON_CHUNK * 2 + 5];
        assert_eq!(sum_rayon_chunks(&ages), 3 * ages.len() as u64);
    }
}

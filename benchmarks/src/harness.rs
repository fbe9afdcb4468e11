use soa_types::Dataset;
use std::hint::black_box;
use std::time::Instant;
use tracing::debug;

use crate::kernels;
use crate::parallel;

/// One timed strategy run.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub name: String,
    pub elapsed_ms: f64,
    pub result: u64,
}

/// Runs `f` once to warm up, then once more under the clock.
///
/// Only the second call's result and wall-clock time end up in the `Outcome`.
pub fn bench(name: &str, mut f: impl FnMut() -> u64) -> Outcome {
    black_box(f());

    let start = Instant::now();
    let result = black_box(f());
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    debug!(name, elapsed_ms, result, "bench");
    Outcome {
        name: name.to_string(),
        elapsed_ms,
        result,
    }
}

/// Times every strategy against `data`, one after another.
pub fn run_all(data: &Dataset, workers: usize) -> Vec<Outcome> {
    let rows = &data.rows;
    let columns = &data.columns;
    let ages = columns.ages();

    vec![
        bench("AoS Basic", || kernels::sum_rows(rows)),
        bench("SoA Basic", || kernels::sum_columns(columns)),
        bench("Unrolled", || kernels::sum_unrolled(ages)),
        bench("Raw Pointer", || kernels::sum_raw_pointer(ages)),
        bench("Threads", || parallel::sum_fixed_partition(ages, workers)),
        bench("Threads Unrolled", || {
            parallel::sum_fixed_partition_unrolled(ages, workers)
        }),
        bench("Channels", || parallel::sum_work_queue(ages, workers)),
        bench("Word Packed", || kernels::sum_word_packed(ages)),
        bench("Rayon Chunks", || parallel::sum_rayon_chunks(ages)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_calls_twice_and_keeps_second() {
        let mut calls = 0u64;
        let outcome = bench("counter", || {
            calls += 1;
            calls * 10
        });
        assert_eq!(calls, 2);
        assert_eq!(outcome.name, "counter");
        assert_eq!(outcome.result, 20);
        assert!(outcome.elapsed_ms >= 0.0);
    }

    #[test]
    fn test_run_all_names_are_unique() {
        let outcomes = run_all(&soa_types::generate(10), 2);
        assert_eq!(outcomes.len(), 9);
        let mut names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 9);
    }
}

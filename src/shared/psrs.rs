//! Parallel Sort by Regular Sampling over a fixed worker team.
//!
//! Every worker sorts a chunk, samples it at regular strides, and one owner
//! turns the pooled samples into team-wide pivots. A single permutation pass
//! then hands each worker one destination partition to finish locally.
//! Regular sampling bounds, but does not equalize, the partition sizes.

use crate::chunk;
use crate::kernel::exchange::ExchangeTable;
use crate::kernel::{partition, permute};
use crate::record::{self, Record};
use crate::serial;
use crate::shared::pool;

pub fn sort(v: &mut [Record]) {
    sort_by(v, record::key_ge);
}

pub fn sort_by<F>(v: &mut [Record], is_ge: F)
where
    F: Fn(f64, f64) -> bool + Sync,
{
    sort_by_with(v, rayon::current_num_threads(), is_ge);
}

/// Sorts with an explicit team size, fixed for the whole call.
pub fn sort_by_with<F>(v: &mut [Record], workers: usize, is_ge: F)
where
    F: Fn(f64, f64) -> bool + Sync,
{
    let n = v.len();

    // Regular sampling needs at least one full sample stride per worker.
    if workers < 2 || n < workers * workers {
        serial::quicksort(v, &is_ge);
        return;
    }
    let is_ge = &is_ge;

    // Every worker sorts its chunk, then samples `workers` evenly-spaced
    // keys from it into its row of the sample table.
    let sample_rows = pool::run(pool::split_mut(v, workers), |_, chunk| {
        serial::quicksort(chunk, is_ge);

        let stride = chunk.len() / workers;
        (0..workers)
            .map(|i| {
                let at = i * stride;
                assert!(
                    at < chunk.len(),
                    "sample index {at} outside chunk of {}",
                    chunk.len()
                );
                chunk[at].key
            })
            .collect::<Vec<f64>>()
    });

    // Single owner: sort all samples and keep every workers-th one as a
    // pivot, starting one stride in.
    let mut samples: Vec<f64> = sample_rows.into_iter().flatten().collect();
    samples.sort_unstable_by(f64::total_cmp);
    let pivots: Vec<f64> = (1..workers).map(|i| samples[i * workers]).collect();

    // Every worker splits its sorted chunk against the shared pivots. The
    // bounds double as the worker's own prefix sums over its row.
    let bounds = pool::run(pool::split_mut(v, workers), |_, chunk| {
        partition::multi_pivot(chunk, &pivots, is_ge)
    });

    let chunks = chunk::split_all(0, n, workers);
    let mut table = ExchangeTable::new(workers);
    for (src, row) in table.rows_mut().enumerate() {
        let bounds = &bounds[src];
        for dst in 0..workers - 1 {
            row[dst] = bounds[dst + 1] - bounds[dst];
        }
        row[workers - 1] = chunks[src].size - bounds[workers - 1];
    }

    // Single owner: global destination offsets and per-source write
    // offsets within each destination.
    let dest_offsets = table.destination_offsets();
    let before = table.source_offsets();
    debug_assert_eq!(dest_offsets[workers], n);

    // Every worker writes its chunk's destinations into the shared index.
    let mut index = vec![0usize; n];
    pool::run(pool::split_mut(&mut index, workers), |src, slots| {
        let bounds = &bounds[src];
        for dst in 0..workers {
            let lo = bounds[dst];
            let hi = if dst + 1 < workers {
                bounds[dst + 1]
            } else {
                slots.len()
            };
            let base = dest_offsets[dst] + before[src * workers + dst];
            for i in lo..hi {
                slots[i] = base + (i - lo);
            }
        }
    });

    // Single owner applies the permutation, then every worker finishes the
    // destination partition it now owns. Partition sizes differ, so the
    // final slices follow the destination offsets, not the chunk split.
    permute::apply(v, &mut index);
    drop(index);

    let sizes: Vec<usize> = (0..workers)
        .map(|dst| dest_offsets[dst + 1] - dest_offsets[dst])
        .collect();
    pool::run(pool::split_by_sizes(v, &sizes), |_, part| {
        serial::quicksort(part, is_ge);
    });
}

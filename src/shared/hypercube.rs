//! Hypercube flavor of the bisection sort: chunks are sorted up front, the
//! designated worker's pivot is therefore a true chunk median, and the
//! partition boundary comes from a binary search instead of a swap pass.

use crate::chunk;
use crate::kernel::partition;
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
    level(v, workers, 0, &is_ge);
}

fn level<F>(v: &mut [Record], workers: usize, depth: usize, is_ge: &F)
where
    F: Fn(f64, f64) -> bool + Sync,
{
    let n = v.len();
    if workers < 2 || n < workers || (1usize << depth) >= workers {
        serial::quicksort(v, is_ge);
        return;
    }

    // Every worker sorts its chunk before any pivoting happens.
    pool::run(pool::split_mut(v, workers), |_, chunk| {
        serial::quicksort(chunk, is_ge);
    });

    let lead = chunk::split(0, n, workers, 0);
    let pivot = v[lead.start + (lead.size - 1) / 2].key;

    let mids = pool::run(pool::split_mut(v, workers), |_, chunk| {
        let mid = partition::lower_bound(chunk, pivot, is_ge);
        assert!(
            mid <= chunk.len(),
            "partition boundary {mid} outside chunk of {}",
            chunk.len()
        );
        mid
    });

    let total_low = pool::repartition(v, &mids);

    let (low, high) = v.split_at_mut(total_low);
    rayon::join(
        || level(low, workers, depth + 1, is_ge),
        || level(high, workers, depth + 1, is_ge),
    );
}

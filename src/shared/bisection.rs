//! Recursive-doubling quicksort over a fixed worker team.
//!
//! Each level: the designated worker derives a pivot from its own chunk (a
//! local approximation, never a global median), every worker
//! threshold-partitions its chunk, and one shared permutation moves all low
//! elements in front of all high ones. The two sub-ranges then recurse
//! concurrently until the structured depth cap, where the serial baseline
//! takes over.

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

    // The designated worker's chunk supplies the team pivot before any
    // chunk is touched.
    let lead = chunk::split(0, n, workers, 0);
    let pivot = v[lead.start + (lead.size - 1) / 2].key;

    let mids = pool::run(pool::split_mut(v, workers), |_, chunk| {
        let mid = partition::threshold(chunk, pivot, is_ge);
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

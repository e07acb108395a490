//! Worker-team plumbing shared by the bisection and sampling sorts.
//!
//! A team phase is one parallel pass over disjoint chunk slices; the collect
//! at the end of the pass is the phase barrier. Worker ordinals are the
//! slice positions, handed out at spawn time.

use rayon::prelude::*;

use crate::chunk;
use crate::kernel::permute;

/// Splits `v` into `parts` disjoint mutable slices along the equitable
/// chunk boundaries.
pub(crate) fn split_mut<T>(v: &mut [T], parts: usize) -> Vec<&mut [T]> {
    let len = v.len();
    let sizes: Vec<usize> = (0..parts).map(|id| chunk::split(0, len, parts, id).size).collect();
    split_by_sizes(v, &sizes)
}

/// Splits `v` into disjoint mutable slices of the given sizes, which must
/// sum to the full length.
pub(crate) fn split_by_sizes<'a, T>(v: &'a mut [T], sizes: &[usize]) -> Vec<&'a mut [T]> {
    let mut slices = Vec::with_capacity(sizes.len());
    let mut rest = v;
    for &size in sizes {
        let (head, tail) = rest.split_at_mut(size);
        slices.push(head);
        rest = tail;
    }
    debug_assert!(rest.is_empty());
    slices
}

/// Runs one team phase: `f(ordinal, slice)` for every worker slice in
/// parallel, returning the per-worker results in ordinal order.
pub(crate) fn run<T, R, F>(slices: Vec<&mut [T]>, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(usize, &mut [T]) -> R + Sync,
{
    slices
        .into_par_iter()
        .enumerate()
        .map(|(id, slice)| f(id, slice))
        .collect()
}

/// Rebuilds the range around the per-worker low counts: prefix sums, a
/// contention-free index fill, then one permutation pass. Returns the size
/// of the low side.
pub(crate) fn repartition<T: Send>(v: &mut [T], mids: &[usize]) -> usize {
    let workers = mids.len();
    let n = v.len();

    // Single owner: prefix sums over the per-worker counts, slot 0 stays 0.
    let mut low_sum = vec![0; workers + 1];
    let mut high_sum = vec![0; workers + 1];
    for id in 0..workers {
        let size = chunk::split(0, n, workers, id).size;
        low_sum[id + 1] = low_sum[id] + mids[id];
        high_sum[id + 1] = high_sum[id] + (size - mids[id]);
    }
    let total_low = low_sum[workers];

    // Every worker writes the destinations of its own chunk into its slice
    // of the shared index; the offsets make the writes contention-free.
    let mut index = vec![0usize; n];
    run(split_mut(&mut index, workers), |id, slots| {
        let mid = mids[id];
        for i in 0..mid {
            slots[i] = low_sum[id] + i;
        }
        for i in mid..slots.len() {
            slots[i] = total_low + high_sum[id] + (i - mid);
        }
    });

    // Single owner applies the permutation; the index buffer dies with this
    // frame.
    permute::apply(v, &mut index);

    total_low
}

//! Distributed Parallel Sort by Regular Sampling: one flat redistribution
//! round over the whole group, no recursive splitting, any group size.

use crate::dist::Communicator;
use crate::kernel::partition;
use crate::record::{self, Record};
use crate::shared::fork_join;

pub fn sort<C: Communicator>(local: &mut Vec<Record>, group: &C) {
    sort_by(local, group, record::key_ge);
}

pub fn sort_by<C, F>(local: &mut Vec<Record>, group: &C, is_ge: F)
where
    C: Communicator,
    F: Fn(f64, f64) -> bool + Sync,
{
    let is_ge = &is_ge;
    let size = group.size();
    let rank = group.rank();

    fork_join::sort_by(local, |a, b| is_ge(a, b));
    if size == 1 {
        return;
    }

    // Regular sample: `size` evenly-spaced keys from the sorted buffer.
    // Tiny buffers degrade to repeated keys, which skews balance but never
    // correctness.
    let stride = local.len() / size;
    let samples: Vec<f64> = (0..size)
        .map(|i| {
            if local.is_empty() {
                0.0
            } else {
                local[(i * stride).min(local.len() - 1)].key
            }
        })
        .collect();

    let gathered = group.gather(0, samples);

    let pivots: Vec<f64> = if rank == 0 {
        let mut all = gathered.expect("the root holds the gathered samples");
        all.sort_unstable_by(f64::total_cmp);
        (1..size).map(|i| all[i * size]).collect()
    } else {
        Vec::new()
    };
    let pivots = group.broadcast(0, pivots);

    let bounds = partition::multi_pivot(local, &pivots, is_ge);

    let mut send_counts = vec![0usize; size];
    for dst in 0..size - 1 {
        send_counts[dst] = bounds[dst + 1] - bounds[dst];
    }
    send_counts[size - 1] = local.len() - bounds[size - 1];

    // Counts travel first; the second exchange is keyed by them.
    let recv_counts = group.all_to_all(send_counts.clone());
    let incoming = group.all_to_allv(local, &send_counts, &recv_counts);
    *local = incoming;

    fork_join::sort_by(local, |a, b| is_ge(a, b));
}

//! Distributed bisection quicksort over a recursively-halving process
//! group.
//!
//! Each level pairs the low and high halves of the group, exchanges the
//! wrong-side partitions (sizes first, contents second) and recurses within
//! the split sub-groups, re-deriving the pivot locally. The post-exchange
//! concatenation is deliberately unordered; deeper levels and the leaf sort
//! finish the job.

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
    bisect(local, group, &is_ge);
}

fn bisect<C, F>(local: &mut Vec<Record>, group: &C, is_ge: &F)
where
    C: Communicator,
    F: Fn(f64, f64) -> bool + Sync,
{
    let size = group.size();
    if size == 1 {
        // A group of one owns its whole range; the worker pool finishes it.
        fork_join::sort_by(local, |a, b| is_ge(a, b));
        return;
    }

    // The pairwise halving below cannot work on an odd group.
    assert!(
        size % 2 == 0,
        "bisection sort needs an even process group, got {size}"
    );

    let rank = group.rank();

    let pivot = if rank == 0 {
        local_pivot(local, is_ge)
    } else {
        0.0
    };
    let pivot = group.broadcast(0, vec![pivot])[0];

    let mid = partition::threshold(local, pivot, is_ge);

    let half = size / 2;
    let low_side = rank < half;
    let partner = if low_side { rank + half } else { rank - half };

    // Sizes travel first, then the contents; a mismatch between the two
    // means the pairing logic is broken.
    let outgoing: Vec<Record> = if low_side {
        local.split_off(mid)
    } else {
        local.drain(..mid).collect()
    };
    let announced = group.send_recv(partner, vec![outgoing.len()])[0];
    let incoming = group.send_recv(partner, outgoing);
    assert_eq!(
        incoming.len(),
        announced,
        "partner sent a different partition size than announced"
    );

    if low_side {
        local.extend(incoming);
    } else {
        let mut merged = incoming;
        merged.append(local);
        *local = merged;
    }

    let sub = group.split(usize::from(!low_side));
    bisect(local, &sub, is_ge);
}

/// Median of the first, middle and last key of the local chunk. The
/// group's pivot is only ever this local approximation.
fn local_pivot<F>(local: &[Record], is_ge: &F) -> f64
where
    F: Fn(f64, f64) -> bool,
{
    if local.is_empty() {
        return 0.0;
    }

    let a = local[0].key;
    let b = local[local.len() / 2].key;
    let c = local[local.len() - 1].key;

    if !is_ge(a, b) {
        if !is_ge(b, c) {
            b
        } else if !is_ge(a, c) {
            c
        } else {
            a
        }
    } else if !is_ge(a, c) {
        a
    } else if !is_ge(b, c) {
        c
    } else {
        b
    }
}

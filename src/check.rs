//! Debug-only diagnostics. These never drive control flow: the sorts call
//! them behind `debug_assertions` and log on failure.

use crate::record::Record;

/// Scans the range for non-decreasing key order.
pub fn sorted<F>(v: &[Record], is_ge: &F) -> bool
where
    F: Fn(f64, f64) -> bool,
{
    v.windows(2).all(|w| is_ge(w[1].key, w[0].key))
}

/// Partition postcondition around `mid`: everything left must compare less
/// than `v[mid]`, everything right greater-or-equal.
pub fn partitioned<F>(v: &[Record], mid: usize, is_ge: &F) -> bool
where
    F: Fn(f64, f64) -> bool,
{
    let pivot = v[mid].key;

    v[..mid].iter().all(|r| !is_ge(r.key, pivot))
        && v[mid + 1..].iter().all(|r| is_ge(r.key, pivot))
}

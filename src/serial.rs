//! Sequential quicksort, the leaf and fallback of every parallel variant.

use crate::check;
use crate::kernel::partition;
use crate::record::{self, Record};

pub fn sort(v: &mut [Record]) {
    sort_by(v, record::key_ge);
}

pub fn sort_by<F>(v: &mut [Record], is_ge: F)
where
    F: Fn(f64, f64) -> bool,
{
    quicksort(v, &is_ge);
}

pub(crate) fn quicksort<F>(v: &mut [Record], is_ge: &F)
where
    F: Fn(f64, f64) -> bool,
{
    if v.len() > 2 {
        let mid = partition::median_of_three(v, is_ge);

        if cfg!(debug_assertions) && !check::partitioned(v, mid, is_ge) {
            eprintln!(
                "partitioning is wrong: len {} mid {} pivot {}",
                v.len(),
                mid,
                v[mid].key
            );
        }

        let (low, high) = v.split_at_mut(mid);
        quicksort(low, is_ge);
        quicksort(&mut high[1..], is_ge);
    } else if v.len() == 2 && is_ge(v[0].key, v[1].key) {
        v.swap(0, 1);
    }
}

//! Task-parallel quicksort: one task per partition half, recursion until
//! the range bottoms out. No depth cap; fan-out and load balance are the
//! scheduler's problem.

use crate::check;
use crate::kernel::partition;
use crate::record::{self, Record};

pub fn sort(v: &mut [Record]) {
    sort_by(v, record::key_ge);
}

pub fn sort_by<F>(v: &mut [Record], is_ge: F)
where
    F: Fn(f64, f64) -> bool + Sync,
{
    task_sort(v, &is_ge);
}

fn task_sort<F>(v: &mut [Record], is_ge: &F)
where
    F: Fn(f64, f64) -> bool + Sync,
{
    if v.len() > 2 {
        let mid = partition::median_of_three(v, is_ge);

        if cfg!(debug_assertions) && !check::partitioned(v, mid, is_ge) {
            eprintln!("partitioning is wrong: len {} mid {}", v.len(), mid);
        }

        let (low, high) = v.split_at_mut(mid);
        rayon::join(
            || task_sort(low, is_ge),
            || task_sort(&mut high[1..], is_ge),
        );
    } else if v.len() == 2 && is_ge(v[0].key, v[1].key) {
        v.swap(0, 1);
    }
}

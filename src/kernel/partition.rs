use crate::record::Record;

/// Sequential median-of-three partition.
///
/// Arranges first/middle/last so their median ends up in the last slot,
/// takes that as pivot and runs one in-place exchange pass. Returns the
/// pivot's final position: keys left of it compare less, keys at/right of
/// it compare greater-or-equal. Callers only invoke this for ranges longer
/// than 2.
pub fn median_of_three<F>(v: &mut [Record], is_ge: &F) -> usize
where
    F: Fn(f64, f64) -> bool,
{
    debug_assert!(v.len() > 2);

    let end = v.len() - 1;
    let mid = end / 2;

    // Park the median of v[0], v[mid], v[end] in the end slot. Guards the
    // sorted and reverse-sorted worst cases.
    if is_ge(v[0].key, v[mid].key) {
        v.swap(0, mid);
    }
    if is_ge(v[0].key, v[end].key) {
        v.swap(0, end);
    }
    if is_ge(v[end].key, v[mid].key) {
        v.swap(mid, end);
    }

    let mut pointbreak = end - 1;
    let mut i = 0;
    while i <= pointbreak {
        if is_ge(v[i].key, v[end].key) {
            // Walk back to the last element still below the pivot.
            while pointbreak > i && is_ge(v[pointbreak].key, v[end].key) {
                pointbreak -= 1;
            }
            if pointbreak > i {
                v.swap(i, pointbreak);
                pointbreak -= 1;
            }
        }
        i += 1;
    }

    pointbreak += usize::from(!is_ge(v[pointbreak].key, v[end].key));
    v.swap(pointbreak, end);

    pointbreak
}

/// Externally-pivoted partition: a two-pointer scan from both ends, swapping
/// out-of-place pairs until the pointers cross.
///
/// Returns the first index whose key compares greater-or-equal to `pivot`;
/// everything left of it compares less. Used whenever the pivot was not
/// derived from this range.
pub fn threshold<F>(v: &mut [Record], pivot: f64, is_ge: &F) -> usize
where
    F: Fn(f64, f64) -> bool,
{
    let mut low = 0;
    let mut high = v.len();

    loop {
        while low < high && !is_ge(v[low].key, pivot) {
            low += 1;
        }
        while high > low && is_ge(v[high - 1].key, pivot) {
            high -= 1;
        }
        if low >= high {
            return low;
        }
        high -= 1;
        v.swap(low, high);
        low += 1;
    }
}

/// First index in sorted `v` whose key compares greater-or-equal to `pivot`.
pub fn lower_bound<F>(v: &[Record], pivot: f64, is_ge: &F) -> usize
where
    F: Fn(f64, f64) -> bool,
{
    v.partition_point(|r| !is_ge(r.key, pivot))
}

/// Boundaries of a sorted range against `pivots.len()` ascending pivots:
/// `pivots.len() + 1` monotonic indices, the first always 0. O(p log n).
pub fn multi_pivot<F>(v: &[Record], pivots: &[f64], is_ge: &F) -> Vec<usize>
where
    F: Fn(f64, f64) -> bool,
{
    let mut bounds = Vec::with_capacity(pivots.len() + 1);
    bounds.push(0);
    for &pivot in pivots {
        bounds.push(lower_bound(v, pivot, is_ge));
    }

    debug_assert!(bounds.windows(2).all(|w| w[0] <= w[1]));

    bounds
}

pub use parsort_comp::Record;

/// One sorting strategy under test.
pub trait Sort {
    fn name() -> String;

    fn sort(arr: &mut [Record]);

    fn sort_by<F>(arr: &mut [Record], is_ge: F)
    where
        F: Fn(f64, f64) -> bool + Sync;
}

pub mod patterns;

//! In-place sorting over fixed-size records, in three execution regimes:
//! the sequential baseline, shared-memory worker teams and distributed
//! process groups. All variants share the partition kernels and the
//! permutation primitive, so their orderings agree and only their scaling
//! behavior differs.

pub mod check;
pub mod chunk;
pub mod dist;
pub mod kernel;
pub mod record;
pub mod serial;
pub mod shared;

pub use record::Record;

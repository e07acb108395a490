//! The primitives every sort variant funnels through: partition kernels,
//! in-place permutation application and the repartition exchange table.

pub mod exchange;
pub mod partition;
pub mod permute;

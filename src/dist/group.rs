//! The seam between the distributed sorts and whatever carries their
//! traffic.

use crate::record::Record;

/// Element types that may cross process boundaries, standing in for the
/// record-exchange type descriptor of the distributed entry points.
pub trait Exchange: Clone + Send + 'static {}

impl Exchange for f64 {}
impl Exchange for usize {}
impl Exchange for Record {}

/// A named set of cooperating processes plus their communication channel.
///
/// Every operation blocks until its counterparts arrive. There is no
/// partial failure and no retry: a member that aborts takes the whole
/// group with it.
pub trait Communicator: Sized {
    /// This process's rank within the group.
    fn rank(&self) -> usize;

    /// Number of processes in the group.
    fn size(&self) -> usize;

    /// Collectively splits the group into disjoint sub-groups, one per
    /// color; members keep their relative rank order.
    fn split(&self, color: usize) -> Self;

    fn send<T: Exchange>(&self, dst: usize, data: Vec<T>);

    fn recv<T: Exchange>(&self, src: usize) -> Vec<T>;

    /// Symmetric paired exchange with `partner`: both sides send, both
    /// sides receive.
    fn send_recv<T: Exchange>(&self, partner: usize, data: Vec<T>) -> Vec<T>;

    /// Every member returns the root's buffer.
    fn broadcast<T: Exchange>(&self, root: usize, data: Vec<T>) -> Vec<T>;

    /// Concatenates every member's buffer at the root, in rank order.
    fn gather<T: Exchange>(&self, root: usize, data: Vec<T>) -> Option<Vec<T>>;

    /// One element per destination in, one element per source out.
    fn all_to_all<T: Exchange>(&self, data: Vec<T>) -> Vec<T>;

    /// Variable-size all-to-all. `data` holds `send_counts[dst]` elements
    /// per destination, contiguous in rank order; the result holds
    /// `recv_counts[src]` elements per source, likewise contiguous. The
    /// received lengths must match the announced counts.
    fn all_to_allv<T: Exchange>(
        &self,
        data: &[T],
        send_counts: &[usize],
        recv_counts: &[usize],
    ) -> Vec<T>;
}

//! Distributed variants: processes share no memory and coordinate only
//! through blocking point-to-point and collective operations over a
//! splittable process group.

pub mod bisection;
pub mod group;
pub mod local;
pub mod psrs;

pub use group::{Communicator, Exchange};
pub use local::{LocalGroup, Universe};

use crate::chunk;
use crate::record::Record;

/// Rank 0 deals equitable chunks of its buffer to the group, keeping its
/// own. Every other member passes `None` and receives its chunk.
pub fn distribute<C: Communicator>(data: Option<Vec<Record>>, group: &C) -> Vec<Record> {
    if group.size() == 1 {
        return data.expect("the root must provide the data");
    }

    if group.rank() == 0 {
        let data = data.expect("the root must provide the data");
        let n = data.len();
        for dst in 1..group.size() {
            let part = chunk::split(0, n, group.size(), dst);
            group.send(dst, data[part.start..part.end].to_vec());
        }
        let own = chunk::split(0, n, group.size(), 0);
        data[own.start..own.end].to_vec()
    } else {
        group.recv(0)
    }
}

/// Gathers every member's (variable-size) buffer back to rank 0 in rank
/// order.
pub fn collect<C: Communicator>(local: Vec<Record>, group: &C) -> Option<Vec<Record>> {
    group.gather(0, local)
}

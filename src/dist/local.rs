//! In-process process group: one OS thread per member, channel mailboxes,
//! blocking collectives built from point-to-point posts.
//!
//! Group handles form a tree. Splitting a parent yields child handles that
//! carry the child's participant set, a bumped generation and a context tag
//! derived from the parent's, so sibling groups and recursion levels never
//! see each other's traffic. Handles are passed down the recursion and
//! nothing about a group lives in global state.

use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::Arc;

use crossbeam::channel::{unbounded, Receiver, Sender};

use super::group::{Communicator, Exchange};

const TAG_P2P: u32 = 0;
const TAG_SENDRECV: u32 = 1;
const TAG_BCAST: u32 = 2;
const TAG_GATHER: u32 = 3;
const TAG_ALLTOALL: u32 = 4;
const TAG_ALLTOALLV: u32 = 5;
const TAG_SPLIT: u32 = 6;
const TAG_POISON: u32 = u32::MAX;

struct Packet {
    src: usize,
    context: u64,
    tag: u32,
    body: Box<dyn Any + Send>,
}

struct Mailbox {
    rx: Receiver<Packet>,
    pending: Vec<Packet>,
}

impl Mailbox {
    /// Blocks until a packet from `src` with the given context and tag
    /// arrives. Unrelated packets are parked; per-sender order within one
    /// (context, tag) stream is preserved.
    fn take(&mut self, src: usize, context: u64, tag: u32) -> Box<dyn Any + Send> {
        if let Some(at) = self
            .pending
            .iter()
            .position(|p| p.src == src && p.context == context && p.tag == tag)
        {
            return self.pending.remove(at).body;
        }

        loop {
            let packet = self
                .rx
                .recv()
                .expect("process group torn down while waiting for a message");
            if packet.tag == TAG_POISON {
                panic!("process {} aborted, tearing down the group", packet.src);
            }
            if packet.src == src && packet.context == context && packet.tag == tag {
                return packet.body;
            }
            self.pending.push(packet);
        }
    }
}

/// One membership in the process-group tree: the participant set, this
/// process's place in it, and the context that keeps the group's traffic
/// apart from its parent's and siblings'.
pub struct LocalGroup {
    members: Vec<usize>,
    group_rank: usize,
    world_rank: usize,
    context: u64,
    generation: u32,
    peers: Arc<Vec<Sender<Packet>>>,
    mailbox: Rc<RefCell<Mailbox>>,
}

impl LocalGroup {
    /// Recursion depth of this handle below the world group.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    fn post(&self, dst: usize, tag: u32, body: Box<dyn Any + Send>) {
        // A closed channel means the receiving member is already gone.
        self.peers[self.members[dst]]
            .send(Packet {
                src: self.world_rank,
                context: self.context,
                tag,
                body,
            })
            .expect("process group member vanished");
    }

    fn fetch<T: Exchange>(&self, src: usize, tag: u32) -> Vec<T> {
        let body = self
            .mailbox
            .borrow_mut()
            .take(self.members[src], self.context, tag);
        *body
            .downcast::<Vec<T>>()
            .expect("record exchange type mismatch")
    }
}

impl Communicator for LocalGroup {
    fn rank(&self) -> usize {
        self.group_rank
    }

    fn size(&self) -> usize {
        self.members.len()
    }

    fn split(&self, color: usize) -> LocalGroup {
        assert!(color < 15, "at most 15 colors per split");

        // Everyone learns everyone's color; membership and the new rank
        // order follow from the old one.
        for dst in 0..self.size() {
            if dst != self.group_rank {
                self.post(dst, TAG_SPLIT, Box::new(vec![color]));
            }
        }

        let mut members = Vec::new();
        let mut group_rank = 0;
        for src in 0..self.size() {
            let src_color = if src == self.group_rank {
                color
            } else {
                self.fetch::<usize>(src, TAG_SPLIT)[0]
            };
            if src_color == color {
                if src == self.group_rank {
                    group_rank = members.len();
                }
                members.push(self.members[src]);
            }
        }

        LocalGroup {
            members,
            group_rank,
            world_rank: self.world_rank,
            context: self.context * 16 + color as u64 + 1,
            generation: self.generation + 1,
            peers: Arc::clone(&self.peers),
            mailbox: Rc::clone(&self.mailbox),
        }
    }

    fn send<T: Exchange>(&self, dst: usize, data: Vec<T>) {
        self.post(dst, TAG_P2P, Box::new(data));
    }

    fn recv<T: Exchange>(&self, src: usize) -> Vec<T> {
        self.fetch(src, TAG_P2P)
    }

    fn send_recv<T: Exchange>(&self, partner: usize, data: Vec<T>) -> Vec<T> {
        self.post(partner, TAG_SENDRECV, Box::new(data));
        self.fetch(partner, TAG_SENDRECV)
    }

    fn broadcast<T: Exchange>(&self, root: usize, data: Vec<T>) -> Vec<T> {
        if self.group_rank == root {
            for dst in 0..self.size() {
                if dst != root {
                    self.post(dst, TAG_BCAST, Box::new(data.clone()));
                }
            }
            data
        } else {
            self.fetch(root, TAG_BCAST)
        }
    }

    fn gather<T: Exchange>(&self, root: usize, data: Vec<T>) -> Option<Vec<T>> {
        if self.group_rank == root {
            let mut all = Vec::new();
            for src in 0..self.size() {
                if src == root {
                    all.extend(data.iter().cloned());
                } else {
                    all.extend(self.fetch::<T>(src, TAG_GATHER));
                }
            }
            Some(all)
        } else {
            self.post(root, TAG_GATHER, Box::new(data));
            None
        }
    }

    fn all_to_all<T: Exchange>(&self, data: Vec<T>) -> Vec<T> {
        assert_eq!(data.len(), self.size(), "one element per destination");

        for (dst, item) in data.iter().enumerate() {
            if dst != self.group_rank {
                self.post(dst, TAG_ALLTOALL, Box::new(vec![item.clone()]));
            }
        }

        (0..self.size())
            .map(|src| {
                if src == self.group_rank {
                    data[src].clone()
                } else {
                    let mut got = self.fetch::<T>(src, TAG_ALLTOALL);
                    assert_eq!(got.len(), 1, "exchange count mismatch");
                    got.remove(0)
                }
            })
            .collect()
    }

    fn all_to_allv<T: Exchange>(
        &self,
        data: &[T],
        send_counts: &[usize],
        recv_counts: &[usize],
    ) -> Vec<T> {
        assert_eq!(send_counts.len(), self.size());
        assert_eq!(recv_counts.len(), self.size());
        assert_eq!(send_counts.iter().sum::<usize>(), data.len());

        let mut own: Vec<T> = Vec::new();
        let mut offset = 0;
        for dst in 0..self.size() {
            let part = data[offset..offset + send_counts[dst]].to_vec();
            offset += send_counts[dst];
            if dst == self.group_rank {
                own = part;
            } else {
                self.post(dst, TAG_ALLTOALLV, Box::new(part));
            }
        }

        let mut out = Vec::with_capacity(recv_counts.iter().sum());
        for src in 0..self.size() {
            let part = if src == self.group_rank {
                std::mem::take(&mut own)
            } else {
                self.fetch::<T>(src, TAG_ALLTOALLV)
            };
            assert_eq!(
                part.len(),
                recv_counts[src],
                "announced and received partition sizes disagree"
            );
            out.extend(part);
        }
        out
    }
}

/// Fixed-size group of in-process "processes".
pub struct Universe;

impl Universe {
    /// Runs `f` once per member on its own thread and returns every
    /// member's result in rank order. Blocks until the whole group is done;
    /// if any member panics, the panic is propagated after the group is
    /// torn down.
    pub fn run<R, F>(processes: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(LocalGroup) -> R + Sync,
    {
        assert!(processes > 0, "a process group needs at least one member");

        let (txs, rxs): (Vec<_>, Vec<_>) = (0..processes).map(|_| unbounded::<Packet>()).unzip();
        let peers = Arc::new(txs);

        crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = rxs
                .into_iter()
                .enumerate()
                .map(|(rank, rx)| {
                    let peers = Arc::clone(&peers);
                    let f = &f;
                    scope.spawn(move |_| {
                        let group = LocalGroup {
                            members: (0..processes).collect(),
                            group_rank: rank,
                            world_rank: rank,
                            context: 0,
                            generation: 0,
                            peers: Arc::clone(&peers),
                            mailbox: Rc::new(RefCell::new(Mailbox {
                                rx,
                                pending: Vec::new(),
                            })),
                        };

                        match panic::catch_unwind(AssertUnwindSafe(|| f(group))) {
                            Ok(value) => value,
                            Err(cause) => {
                                // Poison the peers so nobody blocks forever
                                // on a member that is already gone.
                                for (dst, tx) in peers.iter().enumerate() {
                                    if dst != rank {
                                        let _ = tx.send(Packet {
                                            src: rank,
                                            context: 0,
                                            tag: TAG_POISON,
                                            body: Box::new(()),
                                        });
                                    }
                                }
                                panic::resume_unwind(cause);
                            }
                        }
                    })
                })
                .collect();

            let mut results = Vec::with_capacity(processes);
            let mut first_panic = None;
            for handle in handles {
                match handle.join() {
                    Ok(value) => results.push(value),
                    Err(cause) => {
                        if first_panic.is_none() {
                            first_panic = Some(cause);
                        }
                    }
                }
            }
            if let Some(cause) = first_panic {
                panic::resume_unwind(cause);
            }
            results
        })
        .expect("process group scope")
    }
}

//! Outbound propagation queue.
//!
//! One FIFO per target chain. A flush takes at most `batch_size` frames from
//! each chain; frames whose delivery failed are put back at the front, in
//! their original order, until they have been tried `max_attempts` times.
//! Delivery is at-least-once.

use dagshield_types::ChainId;
use std::collections::{BTreeMap, VecDeque};

/// An encoded message waiting for delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingFrame {
    pub bytes: Vec<u8>,
    pub attempts: u32,
}

/// What happened to a frame handed back after a failed delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Retry {
    Requeued,
    Dropped { attempts: u32 },
}

pub struct DispatchQueue {
    queues: BTreeMap<ChainId, VecDeque<PendingFrame>>,
    batch_size: usize,
    max_attempts: u32,
}

impl DispatchQueue {
    pub fn new(batch_size: usize, max_attempts: u32) -> Self {
        Self {
            queues: BTreeMap::new(),
            batch_size: batch_size.max(1),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn enqueue(&mut self, chain: ChainId, bytes: Vec<u8>) {
        self.queues
            .entry(chain)
            .or_default()
            .push_back(PendingFrame { bytes, attempts: 0 });
    }

    /// Up to `batch_size` frames per chain, in ascending chain order.
    pub fn take_batches(&mut self) -> Vec<(ChainId, Vec<PendingFrame>)> {
        let mut batches = Vec::new();
        for (chain, queue) in self.queues.iter_mut() {
            let n = queue.len().min(self.batch_size);
            if n > 0 {
                batches.push((*chain, queue.drain(..n).collect()));
            }
        }
        self.queues.retain(|_, q| !q.is_empty());
        batches
    }

    /// Hand back the frames of one chain whose delivery failed, oldest first.
    ///
    /// Survivors go back ahead of everything still queued, keeping their
    /// relative order. Returns one outcome per frame, in input order.
    pub fn retry(&mut self, chain: ChainId, frames: Vec<PendingFrame>) -> Vec<Retry> {
        let mut outcomes = Vec::with_capacity(frames.len());
        let mut survivors = Vec::new();
        for mut frame in frames {
            frame.attempts += 1;
            if frame.attempts >= self.max_attempts {
                outcomes.push(Retry::Dropped {
                    attempts: frame.attempts,
                });
            } else {
                outcomes.push(Retry::Requeued);
                survivors.push(frame);
            }
        }
        if !survivors.is_empty() {
            let queue = self.queues.entry(chain).or_default();
            for frame in survivors.into_iter().rev() {
                queue.push_front(frame);
            }
        }
        outcomes
    }

    pub fn depth(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    pub fn depth_for(&self, chain: ChainId) -> usize {
        self.queues.get(&chain).map_or(0, VecDeque::len)
    }
}

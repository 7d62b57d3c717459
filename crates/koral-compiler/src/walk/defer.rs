//! FIFO queue of relations waiting for forward references.

use std::collections::VecDeque;

use koral_ir::NodeId;

use crate::tree::ParseId;

/// A parse node whose handling was postponed, with the reference ids it
/// was waiting for and the container that was open when it was set
/// aside. The retry reopens that container so the node still lands in
/// its original place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredEntry {
    pub node: ParseId,
    pub refs: Vec<String>,
    pub container: Option<NodeId>,
}

#[derive(Debug, Default)]
pub struct DeferralQueue {
    queue: VecDeque<DeferredEntry>,
}

impl DeferralQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offer(&mut self, node: ParseId, refs: Vec<String>, container: Option<NodeId>) {
        self.queue.push_back(DeferredEntry {
            node,
            refs,
            container,
        });
    }

    pub fn head(&self) -> Option<&DeferredEntry> {
        self.queue.front()
    }

    pub fn pop(&mut self) -> Option<DeferredEntry> {
        self.queue.pop_front()
    }

    /// Remove and return all queued entries, leaving the queue empty for
    /// re-offers made while they are retried.
    pub fn take_all(&mut self) -> Vec<DeferredEntry> {
        self.queue.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

//! Pending operand wrappers keyed by parse node.
//!
//! A frontend that knows, while handling a parent, that one particular
//! child must land inside an extra container (usually a class group)
//! registers the container here. The walker opens it right before
//! dispatching that child and closes it when the child's frames unwind.

use std::collections::HashMap;

use koral_ir::NodeId;

use crate::tree::ParseId;

#[derive(Debug, Default)]
pub struct WrapTable {
    containers: HashMap<ParseId, NodeId>,
}

impl WrapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `container` for `child`. Returns false when the child
    /// already has a pending container.
    pub fn register(&mut self, child: ParseId, container: NodeId) -> bool {
        use std::collections::hash_map::Entry;
        match self.containers.entry(child) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(container);
                true
            }
        }
    }

    /// Remove and return the pending container for `child`, if any.
    pub fn take(&mut self, child: ParseId) -> Option<NodeId> {
        self.containers.remove(&child)
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

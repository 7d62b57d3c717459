//! Declared-node registry with lazy class promotion.
//!
//! Node declarations register an unplaced IR node under a reference id.
//! The node stays owned by the registry until its first use; how that
//! first use hands it out depends on how often the whole query refers to
//! it. A node referenced once is yielded as-is. A node referenced more
//! than once is promoted into a class wrapper on first use, and every
//! later use yields a fresh focus reference to that class. Promotion is
//! idempotent: a node gets at most one class id for its lifetime.

use indexmap::IndexMap;

use koral_ir::{NodeId, QueryGraph, ReferenceOp};

/// First class id available to the compiler itself. Ids 1..=128 belong
/// to classes the user wrote in the query.
pub const SYSTEM_CLASS_BASE: u16 = 129;

#[derive(Debug)]
struct ClassEntry {
    node: Option<NodeId>,
    class_id: Option<u16>,
    total_refs: u32,
    processed_refs: u32,
}

impl ClassEntry {
    fn new() -> Self {
        Self {
            node: None,
            class_id: None,
            total_refs: 0,
            processed_refs: 0,
        }
    }
}

/// How a use of a registered reference was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefUse {
    /// Sole use in the query; the caller receives the node itself.
    Owned(NodeId),
    /// First of several uses; the caller receives the class wrapper
    /// that now owns the node.
    Promoted { class: NodeId, class_id: u16 },
    /// Later use of an already consumed node; the caller receives a
    /// fresh focus reference onto its class.
    Pointer { node: NodeId, class_id: u16 },
}

impl RefUse {
    /// The node the caller should place as an operand.
    pub fn operand(&self) -> NodeId {
        match *self {
            RefUse::Owned(node) => node,
            RefUse::Promoted { class, .. } => class,
            RefUse::Pointer { node, .. } => node,
        }
    }
}

/// Registry mapping reference ids to declared nodes, in declaration order.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    entries: IndexMap<String, ClassEntry>,
    next_system_class: u16,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one expected use of `ref_id` (reference-counting pre-pass).
    pub fn note_reference(&mut self, ref_id: &str) {
        self.entries
            .entry(ref_id.to_string())
            .or_insert_with(ClassEntry::new)
            .total_refs += 1;
    }

    /// Bind `ref_id` to an IR node. Returns false on duplicate declaration.
    pub fn register(&mut self, ref_id: &str, node: NodeId) -> bool {
        let entry = self
            .entries
            .entry(ref_id.to_string())
            .or_insert_with(ClassEntry::new);
        if entry.node.is_some() {
            return false;
        }
        entry.node = Some(node);
        true
    }

    /// How many uses the pre-pass counted for `ref_id`.
    pub fn expected_uses(&self, ref_id: &str) -> u32 {
        self.entries.get(ref_id).map_or(0, |e| e.total_refs)
    }

    pub fn is_registered(&self, ref_id: &str) -> bool {
        self.entries
            .get(ref_id)
            .is_some_and(|e| e.node.is_some())
    }

    /// Whether `ref_id` has been consumed at least once.
    pub fn is_processed(&self, ref_id: &str) -> bool {
        self.entries
            .get(ref_id)
            .is_some_and(|e| e.processed_refs > 0)
    }

    /// Class id assigned to `ref_id`, if it was promoted.
    pub fn class_id(&self, ref_id: &str) -> Option<u16> {
        self.entries.get(ref_id).and_then(|e| e.class_id)
    }

    /// Allocate a system class id outside the registry (for frontends
    /// that class nodes structurally, not by reference).
    pub fn alloc_system_class(&mut self) -> u16 {
        let id = SYSTEM_CLASS_BASE + self.next_system_class;
        self.next_system_class += 1;
        id
    }

    /// Registered entries that were never consumed, in declaration order.
    pub fn unused(&self) -> Vec<(&str, NodeId)> {
        self.entries
            .iter()
            .filter(|(_, e)| e.processed_refs == 0)
            .filter_map(|(id, e)| e.node.map(|n| (id.as_str(), n)))
            .collect()
    }

    /// Consume one use of `ref_id`, allocating into `graph` as needed.
    ///
    /// Returns `None` when the reference was never bound to a node.
    pub fn use_ref(&mut self, ref_id: &str, graph: &mut QueryGraph) -> Option<RefUse> {
        let needs_promotion;
        let node;
        {
            let entry = self.entries.get(ref_id)?;
            node = entry.node?;
            if entry.processed_refs > 0 {
                // A missing class id here means the pre-pass undercounted
                // the uses of this reference.
                debug_assert!(entry.class_id.is_some());
                let class_id = entry.class_id?;
                let pointer = graph.reference(ReferenceOp::Focus, vec![class_id]);
                let entry = self.entries.get_mut(ref_id)?;
                entry.processed_refs += 1;
                return Some(RefUse::Pointer {
                    node: pointer,
                    class_id,
                });
            }
            needs_promotion = entry.total_refs > 1;
        }

        if needs_promotion {
            let class_id = self.alloc_system_class();
            let class = graph.wrap_in_class(node, class_id);
            let entry = self.entries.get_mut(ref_id)?;
            entry.class_id = Some(class_id);
            entry.processed_refs += 1;
            Some(RefUse::Promoted { class, class_id })
        } else {
            let entry = self.entries.get_mut(ref_id)?;
            entry.processed_refs += 1;
            Some(RefUse::Owned(node))
        }
    }
}

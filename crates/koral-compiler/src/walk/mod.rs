//! Depth-first traversal engine shared by all language frontends.
//!
//! The walker keeps traversal honest so strategies cannot corrupt the
//! result: every frame a dispatch opens is closed when that node's
//! subtree unwinds, nodes are dispatched at most once, and relations
//! whose references are not resolvable yet are parked on a deferral
//! queue instead of failing.

mod defer;
mod registry;
mod wrap;


use std::collections::HashSet;

use koral_ir::{NodeId, QueryGraph};

use crate::diagnostics::{DiagnosticBuilder, DiagnosticKind, Diagnostics};
use crate::strategy::{LanguageStrategy, Outcome};
use crate::tree::{ParseId, ParseTree};
use crate::{Error, Result};

pub use defer::{DeferralQueue, DeferredEntry};
pub use registry::{ClassRegistry, RefUse, SYSTEM_CLASS_BASE};
pub use wrap::WrapTable;

/// Traversal depth limit applied when the caller does not set one.
pub const DEFAULT_RECURSION_FUEL: u32 = 4096;

/// Dispatch budget applied when the caller does not set one.
pub const DEFAULT_EXEC_FUEL: u64 = 1 << 20;

/// Everything one traversal produced.
#[derive(Debug)]
pub struct WalkResult {
    pub graph: QueryGraph,
    pub root: Option<NodeId>,
    pub diagnostics: Diagnostics,
}

/// One traversal over one parse tree.
///
/// All state is per-walker; nothing leaks between compilations.
pub struct Walker<'t> {
    tree: &'t ParseTree,
    graph: QueryGraph,
    root: Option<NodeId>,
    stack: Vec<NodeId>,
    visited: HashSet<ParseId>,
    registry: ClassRegistry,
    deferred: DeferralQueue,
    wraps: WrapTable,
    diagnostics: Diagnostics,
    recursion_fuel: u32,
    exec_fuel: u64,
    depth: u32,
    relations_processed: u32,
    draining: bool,
}

impl<'t> Walker<'t> {
    pub fn new(tree: &'t ParseTree) -> Self {
        Self {
            tree,
            graph: QueryGraph::new(),
            root: None,
            stack: Vec::new(),
            visited: HashSet::new(),
            registry: ClassRegistry::new(),
            deferred: DeferralQueue::new(),
            wraps: WrapTable::new(),
            diagnostics: Diagnostics::new(),
            recursion_fuel: DEFAULT_RECURSION_FUEL,
            exec_fuel: DEFAULT_EXEC_FUEL,
            depth: 0,
            relations_processed: 0,
            draining: false,
        }
    }

    pub fn with_recursion_fuel(mut self, fuel: u32) -> Self {
        self.recursion_fuel = fuel;
        self
    }

    pub fn with_exec_fuel(mut self, fuel: u64) -> Self {
        self.exec_fuel = fuel;
        self
    }

    /// Run the full traversal: prepare, walk, drain deferrals, finish.
    pub fn run<S: LanguageStrategy>(mut self, strategy: &mut S) -> Result<WalkResult> {
        match self.tree.root() {
            None => {
                self.diagnostics
                    .report(DiagnosticKind::MalformedQuery, None)
                    .message("empty parse tree")
                    .emit();
            }
            Some(root) => {
                strategy.prepare(self.tree, &mut self);
                self.walk(strategy, root)?;
                self.drain(strategy)?;
                strategy.finish(&mut self);
            }
        }
        debug_assert!(self.stack.is_empty(), "unbalanced traversal frames");
        Ok(WalkResult {
            graph: self.graph,
            root: self.root,
            diagnostics: self.diagnostics,
        })
    }

    fn walk<S: LanguageStrategy>(&mut self, strategy: &mut S, id: ParseId) -> Result<()> {
        if self.visited.contains(&id) {
            return Ok(());
        }
        self.visited.insert(id);

        // Before a relation is handled, give the oldest parked relation a
        // chance to resolve against everything processed so far.
        if strategy.is_relation(self.tree, id) {
            self.retry_deferred_head(strategy)?;
        }

        if self.depth >= self.recursion_fuel {
            return Err(Error::RecursionLimitExceeded {
                limit: self.recursion_fuel,
            });
        }
        if self.exec_fuel == 0 {
            return Err(Error::ExecFuelExhausted);
        }
        self.exec_fuel -= 1;
        self.depth += 1;

        let frames_before = self.stack.len();

        // Containers are opened before dispatch; frontends that defer
        // relations do not register wraps for them.
        if let Some(container) = self.wraps.take(id) {
            self.open(container);
        }

        match strategy.dispatch(self, id) {
            Outcome::Deferred(refs) => {
                self.unwind_to(frames_before);
                self.visited.remove(&id);
                let container = self.stack.last().copied();
                self.deferred.offer(id, refs, container);
            }
            Outcome::Skip => {
                self.unwind_to(frames_before);
                if strategy.is_relation(self.tree, id) {
                    self.relations_processed += 1;
                }
            }
            Outcome::Continue => {
                let tree = self.tree;
                for &child in tree.children(id) {
                    self.walk(strategy, child)?;
                }
                self.unwind_to(frames_before);
                if strategy.is_relation(self.tree, id) {
                    self.relations_processed += 1;
                }
            }
        }

        self.depth -= 1;
        Ok(())
    }

    fn retry_deferred_head(&mut self, strategy: &mut impl LanguageStrategy) -> Result<()> {
        let head_resolvable = self
            .deferred
            .head()
            .is_some_and(|entry| entry.refs.iter().any(|r| self.registry.is_processed(r)));
        if head_resolvable
            && let Some(entry) = self.deferred.pop()
        {
            self.replay(strategy, entry)?;
        }
        Ok(())
    }

    /// Re-dispatch a deferred node inside its remembered container.
    fn replay(
        &mut self,
        strategy: &mut impl LanguageStrategy,
        entry: DeferredEntry,
    ) -> Result<()> {
        let depth = self.stack.len();
        if let Some(container) = entry.container {
            self.open_detached(container);
        }
        self.walk(strategy, entry.node)?;
        self.unwind_to(depth);
        Ok(())
    }

    /// Retry every parked relation once at end of traversal. Anything
    /// still unresolvable afterwards kills the query.
    fn drain(&mut self, strategy: &mut impl LanguageStrategy) -> Result<()> {
        self.draining = true;
        for entry in self.deferred.take_all() {
            self.replay(strategy, entry)?;
        }
        self.draining = false;

        if !self.deferred.is_empty() {
            self.diagnostics
                .report(DiagnosticKind::UnboundRelation, None)
                .emit();
            // The query is dead; reset everything that points into the
            // graph so late phases cannot resurrect parts of it.
            self.graph.clear();
            self.root = None;
            self.stack.clear();
            self.registry = ClassRegistry::new();
        }
        Ok(())
    }

    fn unwind_to(&mut self, depth: usize) {
        debug_assert!(self.stack.len() >= depth);
        self.stack.truncate(depth);
    }

    // ---- accessors for strategies -------------------------------------

    pub fn tree(&self) -> &'t ParseTree {
        self.tree
    }

    pub fn graph(&self) -> &QueryGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut QueryGraph {
        &mut self.graph
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether the walker is in the final deferral-draining phase.
    pub fn is_draining(&self) -> bool {
        self.draining
    }

    /// Report a diagnostic positioned at `node`.
    pub fn report(&mut self, kind: DiagnosticKind, node: ParseId) -> DiagnosticBuilder<'_> {
        let offset = self.tree.offset(node);
        self.diagnostics.report(kind, offset)
    }

    /// Mark a parse node as consumed so the walker skips it later.
    pub fn mark_visited(&mut self, id: ParseId) {
        self.visited.insert(id);
    }

    // ---- placement ----------------------------------------------------

    /// Place `id` as an operand of the innermost open container, or as
    /// the query root when no container is open.
    ///
    /// A second root-level placement has nowhere to go; it is reported
    /// rather than dropped so frontend bugs cannot shrink a query
    /// silently.
    pub fn place(&mut self, id: NodeId) {
        match self.stack.last() {
            Some(&top) => {
                self.graph.push_operand(top, id);
            }
            None => {
                if self.root.is_none() {
                    self.root = Some(id);
                } else {
                    self.diagnostics
                        .report(DiagnosticKind::MalformedQuery, None)
                        .message("more than one root-level object")
                        .emit();
                }
            }
        }
    }

    /// Place `id` and open it as a container for subsequent placements.
    /// The walker closes it when the opening node's subtree unwinds.
    pub fn open(&mut self, id: NodeId) {
        self.place(id);
        self.stack.push(id);
    }

    /// Open `id` as a container without placing it; for nodes that are
    /// already linked into the graph (e.g. inside a wrapper built by the
    /// same handler).
    pub fn open_detached(&mut self, id: NodeId) {
        self.stack.push(id);
    }

    // ---- reference registry -------------------------------------------

    /// Record one expected use of `ref_id` (called from `prepare`).
    pub fn note_reference(&mut self, ref_id: &str) {
        self.registry.note_reference(ref_id);
    }

    /// Bind `ref_id` to an unplaced IR node. Returns false on duplicate.
    pub fn register_node(&mut self, ref_id: &str, node: NodeId) -> bool {
        self.registry.register(ref_id, node)
    }

    pub fn is_registered(&self, ref_id: &str) -> bool {
        self.registry.is_registered(ref_id)
    }

    /// How many uses the pre-pass counted for `ref_id`.
    pub fn expected_uses(&self, ref_id: &str) -> u32 {
        self.registry.expected_uses(ref_id)
    }

    pub fn is_processed(&self, ref_id: &str) -> bool {
        self.registry.is_processed(ref_id)
    }

    /// Allocate a class id for structural (non-reference) class wrapping.
    pub fn alloc_system_class(&mut self) -> u16 {
        self.registry.alloc_system_class()
    }

    /// Registered declarations that were never consumed.
    pub fn unused_refs(&self) -> Vec<(String, NodeId)> {
        self.registry
            .unused()
            .into_iter()
            .map(|(id, node)| (id.to_string(), node))
            .collect()
    }

    /// Whether a relation over `refs` can be handled right now.
    ///
    /// The first relation of a query always proceeds: its declarations
    /// were made before any reference was consumed. Later relations need
    /// at least one of their references consumed already, which anchors
    /// them to the growing query. While draining, having every reference
    /// declared is enough.
    pub fn can_resolve(&self, refs: &[String]) -> bool {
        if refs.is_empty() {
            return true;
        }
        if self.relations_processed == 0 && !self.draining {
            return true;
        }
        if refs.iter().any(|r| self.registry.is_processed(r)) {
            return true;
        }
        self.draining && refs.iter().all(|r| self.registry.is_registered(r))
    }

    /// Consume one use of `ref_id` and return the operand to place.
    ///
    /// Reports `InvalidClassReference` and returns `None` when the id
    /// was never declared.
    pub fn use_ref(&mut self, ref_id: &str, at: ParseId) -> Option<NodeId> {
        match self.registry.use_ref(ref_id, &mut self.graph) {
            Some(used) => Some(used.operand()),
            None => {
                self.report(DiagnosticKind::InvalidClassReference, at)
                    .message(ref_id)
                    .emit();
                None
            }
        }
    }

    // ---- operand wrapping ---------------------------------------------

    /// Request that `child` be compiled inside `container`. Returns
    /// false when the child already has a pending container.
    pub fn register_wrap(&mut self, child: ParseId, container: NodeId) -> bool {
        self.wraps.register(child, container)
    }
}

//! The per-language dispatch seam.
//!
//! The walker owns traversal order, frame accounting, deferral and the
//! class registry; a [`LanguageStrategy`] owns everything specific to
//! one query language: which parse categories exist, how they map onto
//! IR nodes, and which of them participate in forward-reference
//! deferral.

use crate::tree::{ParseId, ParseTree};
use crate::walk::Walker;

/// What a strategy did with one parse node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Descend into the node's children.
    Continue,
    /// The handler consumed the whole subtree; do not descend.
    Skip,
    /// The node needs references that are not resolvable yet; retry it
    /// later. Carries the reference ids it is waiting for.
    Deferred(Vec<String>),
}

pub trait LanguageStrategy {
    /// Language tag used in logs and the serialized envelope.
    fn name(&self) -> &'static str;

    /// Reference-counting pre-pass, run once before traversal.
    ///
    /// Strategies that support references count every use site here so
    /// the registry can tell sole uses from shared ones.
    fn prepare(&mut self, _tree: &ParseTree, _walker: &mut Walker<'_>) {}

    /// Handle one parse node.
    fn dispatch(&mut self, walker: &mut Walker<'_>, node: ParseId) -> Outcome;

    /// Whether this node is a relation, i.e. may be deferred and counts
    /// toward the processed-relation tally.
    fn is_relation(&self, _tree: &ParseTree, _node: ParseId) -> bool {
        false
    }

    /// Called once after traversal and deferral draining finished.
    fn finish(&mut self, _walker: &mut Walker<'_>) {}
}

/// The query languages this compiler accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryLanguage {
    Annis,
    Cosmas2,
    Cql,
    Cqp,
    FcsQl,
    PoliqarpPlus,
}

impl QueryLanguage {
    pub fn name(&self) -> &'static str {
        match self {
            QueryLanguage::Annis => "annis",
            QueryLanguage::Cosmas2 => "cosmas2",
            QueryLanguage::Cql => "cql",
            QueryLanguage::Cqp => "cqp",
            QueryLanguage::FcsQl => "fcsql",
            QueryLanguage::PoliqarpPlus => "poliqarp",
        }
    }

    /// Parse a language tag as it appears in API requests.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "annis" => Some(QueryLanguage::Annis),
            "cosmas2" | "cosmasii" => Some(QueryLanguage::Cosmas2),
            "cql" => Some(QueryLanguage::Cql),
            "cqp" => Some(QueryLanguage::Cqp),
            "fcsql" | "fcs-ql" => Some(QueryLanguage::FcsQl),
            "poliqarp" | "poliqarpplus" => Some(QueryLanguage::PoliqarpPlus),
            _ => None,
        }
    }
}

impl std::fmt::Display for QueryLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

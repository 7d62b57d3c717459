#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Compiler from corpus-query parse trees to the KoralQuery IR.
//!
//! Six query languages share one traversal engine: a [`Walker`] walks
//! the parse tree depth first while a per-language
//! [`LanguageStrategy`](strategy::LanguageStrategy) maps parse
//! categories onto IR nodes. The [`Compiler`](compile::Compiler) facade
//! ties language selection, traversal and envelope serialization
//! together:
//!
//! ```
//! use koral_compiler::{Compiler, QueryLanguage, TreeBuilder};
//!
//! let mut b = TreeBuilder::new();
//! let attr = b.leaf("attr", "base=drzewo");
//! let seg = b.node("segment", vec![attr]);
//! let root = b.node("query", vec![seg]);
//! let tree = b.build(root);
//!
//! let compilation = Compiler::new(QueryLanguage::PoliqarpPlus)
//!     .compile(&tree)
//!     .unwrap();
//! assert!(compilation.is_valid());
//! ```

pub mod compile;
pub mod diagnostics;
pub mod languages;
pub mod strategy;
pub mod tree;
pub mod walk;

#[cfg(test)]
mod test_utils;

pub use compile::{Compilation, Compiler, KORAL_CONTEXT};
pub use diagnostics::{DiagnosticKind, DiagnosticMessage, Diagnostics, Severity};
pub use strategy::{LanguageStrategy, Outcome, QueryLanguage};
pub use tree::{ParseId, ParseTree, TreeBuilder};
pub use walk::{WalkResult, Walker};

/// Hard failures that abort a compilation outright.
///
/// Semantic problems in the query never end up here; they are collected
/// as [`Diagnostics`] on the result instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("recursion limit of {limit} exceeded")]
    RecursionLimitExceeded { limit: u32 },
    #[error("execution fuel exhausted")]
    ExecFuelExhausted,
}

pub type Result<T> = std::result::Result<T, Error>;

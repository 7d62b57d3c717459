#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! KoralQuery intermediate representation.
//!
//! Data structures shared by every query-language frontend:
//! - `node` - the closed `QueryNode` sum type and its wire enums
//! - `graph` - arena-backed `QueryGraph` with the builder constructors
//! - `boundary` - quantifier ranges (`{m,n}`, `*`, `+`, `?`)
//! - `dump` - textual dump printer for inspection and snapshot tests
//! - `serialize` - JSON-LD rendering of IR nodes

pub mod boundary;
pub mod dump;
pub mod graph;
pub mod node;
pub mod serialize;

#[cfg(test)]
mod boundary_tests;
#[cfg(test)]
mod graph_tests;

pub use boundary::Boundary;
pub use dump::IrPrinter;
pub use graph::{NodeId, QueryGraph};
pub use node::{
    GroupOperation, MatchOp, PositionFrame, QueryNode, ReferenceOp, Term, TermRelation,
};
pub use serialize::to_value;

//! Per-language frontends.
//!
//! Each frontend implements [`LanguageStrategy`](crate::strategy::LanguageStrategy)
//! for the parse-tree shape its parser adapter emits. The walker owns
//! traversal; the frontends only map categories onto IR nodes.

pub mod annis;
pub mod cosmas2;
pub mod cql;
pub mod cqp;
pub mod fcsql;
pub mod poliqarp;

#[cfg(test)]
mod cosmas2_tests;
#[cfg(test)]
mod cqp_tests;
#[cfg(test)]
mod fcsql_tests;
#[cfg(test)]
mod poliqarp_tests;

pub use annis::AnnisStrategy;
pub use cosmas2::Cosmas2Strategy;
pub use cql::CqlStrategy;
pub use cqp::CqpStrategy;
pub use fcsql::FcsQlStrategy;
pub use poliqarp::PoliqarpStrategy;

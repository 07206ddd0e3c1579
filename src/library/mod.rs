//! Library aggregation.
//!
//! Instance documents are classified by path and folded into a [`Library`]
//! that the report builder later reads.

pub mod aggregator;
pub mod route;

pub use aggregator::*;

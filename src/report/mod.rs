//! Documentation rendering.
//!
//! This module turns a completed library into reStructuredText documents.

pub mod builder;
pub mod links;
pub mod rst;

pub use builder::{BuildOptions, DocBuilder};

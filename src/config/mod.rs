//! Configuration parsing and validation
//!
//! This module handles parsing of build.yml files, validation of their
//! structure and conversion into a [`crate::graph::Graph`].

pub mod convert;
pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use convert::*;
pub use parse::*;
pub use schema::*;
pub use types::*;

//! Task execution engine
//!
//! This module handles running a finalized plan: the execution context,
//! shell commands, variable interpolation and the executor itself.

pub mod command;
pub mod context;
pub mod executor;
pub mod interpolate;

// Re-export main types
pub use command::*;
pub use context::*;
pub use executor::*;
pub use interpolate::*;

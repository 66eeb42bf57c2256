//! Buildgraph - a build-task graph engine
//!
//! Tasks are registered with their dependencies, filtered by name-pattern
//! override rules in two passes (after configuration and once the execution
//! graph is ready), then executed in dependency order.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod runner;
pub mod ui;

// Re-export commonly used types
pub use error::{BuildError, Result};
pub use graph::{ExecutionPlan, Graph, OverrideRule, Predicate, RuleSet, Task};
pub use runner::{Context, Executor, RunReport};

/// Current version of buildgraph
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Error types for buildgraph

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for buildgraph operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Main error type for buildgraph
#[derive(Error, Debug)]
pub enum BuildError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task registration errors
    #[error("Registration error: {0}")]
    Registry(#[from] RegistryError),

    /// Graph resolution errors
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Task execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl BuildError {
    /// Process exit code for this error
    ///
    /// A dependency cycle exits with 2; every other failure exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::Graph(GraphError::CycleDetected(_)) => 2,
            _ => 1,
        }
    }
}

/// Build file parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find build file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid pattern '{pattern}': {error}")]
    InvalidPattern { pattern: String, error: String },

    #[error("Override rule must set exactly one matcher (found {0})")]
    AmbiguousRule(usize),

    #[error("Failed to load env file '{path}': {error}")]
    EnvFile { path: PathBuf, error: String },
}

/// Task registration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Task '{0}' is already registered")]
    DuplicateTask(String),

    #[error("Task identifier must not be empty")]
    EmptyIdentifier,
}

/// Execution graph resolution errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    #[error("Circular dependency detected: {}", .0.join(" -> "))]
    CycleDetected(Vec<String>),

    #[error("Task '{task}' (required by '{required_by}') is not defined")]
    UnknownTask { task: String, required_by: String },

    #[error("Task '{0}' is not defined")]
    UnknownTarget(String),

    #[error("Task rule '{prefix}' cannot build '{task}': {error}")]
    RuleTemplate {
        prefix: String,
        task: String,
        error: String,
    },
}

/// Task execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Task '{task}' failed: {reason}")]
    TaskFailed { task: String, reason: String },

    #[error("Command failed with exit code {0:?}")]
    CommandFailed(Option<i32>),

    #[error("Failed to spawn '{program}': {error}")]
    Spawn { program: String, error: String },

    #[error("Invalid value for '{name}': {error}")]
    InvalidValue { name: String, error: String },
}

/// Variable interpolation errors
#[derive(Error, Debug)]
pub enum InterpolationError {
    #[error("Recursive interpolation detected")]
    RecursiveInterpolation,
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for registration operations
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Specialized result type for graph operations
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Specialized result type for interpolation operations
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;

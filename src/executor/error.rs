//! Error types for task execution
//!
//! This error type wraps graph and filter errors while also providing
//! execution-specific variants. Nested errors are converted to strings so
//! the type stays `Clone`: a rejected task's error is observed through a
//! shared outcome future, which hands every extractor its own copy.

use crate::filter::FilterError;
use crate::graph::GraphError;
use thiserror::Error;

/// Result type for execution operations
pub type Result<T> = std::result::Result<T, ExecutionError>;

/// Errors that can occur while resolving, executing, or aggregating tasks
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExecutionError {
    /// No callable is registered for a task name
    #[error("no task registered with name '{name}'")]
    Unresolved {
        /// The unresolved task name
        name: String,
    },

    /// A task's callable failed during execution
    #[error("task execution failed: {0}")]
    Failed(String),

    /// A task panicked during execution
    #[error("task '{task}' panicked: {reason}")]
    TaskPanic {
        /// The task that panicked
        task: String,
        /// The panic payload, stringified
        reason: String,
    },

    /// A graph operation failed (invalid dependency, cycle, unfinishable)
    #[error("graph error: {0}")]
    Graph(String),

    /// A filter could not be configured
    #[error("filter error: {0}")]
    Filter(String),

    /// The workflow configuration is incomplete or inconsistent
    #[error("invalid workflow configuration: {0}")]
    Configuration(String),
}

impl ExecutionError {
    /// Creates an unresolved task error
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self::Unresolved { name: name.into() }
    }

    /// Creates a task failure with the given reason
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    /// Creates a task panic error
    pub fn task_panic(task: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TaskPanic {
            task: task.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }
}

// Nested errors are flattened to strings to keep ExecutionError Clone
impl From<GraphError> for ExecutionError {
    fn from(e: GraphError) -> Self {
        ExecutionError::Graph(e.to_string())
    }
}

impl From<FilterError> for ExecutionError {
    fn from(e: FilterError) -> Self {
        ExecutionError::Filter(e.to_string())
    }
}

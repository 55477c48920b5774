//! Error types for graph operations
//!
//! This module hides error representation details and provides
//! a unified error type for all graph operations.

use thiserror::Error;

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur while building or scheduling a task graph
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphError {
    /// A task declared a dependency on a name that is not in the graph
    #[error("task '{task}' depends on unknown task '{dependency}'")]
    InvalidDependency {
        /// The task that declared the dependency
        task: String,
        /// The dependency name that was not found
        dependency: String,
    },

    /// A task was inserted with a name that already exists
    #[error("duplicate task name: {name}")]
    DuplicateTask {
        /// The duplicate task name
        name: String,
    },

    /// The dependency relation contains a cycle
    #[error("cycle detected in task graph: {detail}")]
    Cycle {
        /// Human-readable description of the cycle
        detail: String,
    },

    /// Batching could not make progress although tasks remain pending
    #[error("unfinishable task graph: make sure that no task dependencies can be left unfulfilled")]
    Unfinishable,
}

impl GraphError {
    /// Creates an invalid dependency error
    pub fn invalid_dependency(task: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::InvalidDependency {
            task: task.into(),
            dependency: dependency.into(),
        }
    }

    /// Creates a duplicate task error
    pub fn duplicate_task(name: impl Into<String>) -> Self {
        Self::DuplicateTask { name: name.into() }
    }

    /// Creates a cycle error with the given detail
    pub fn cycle(detail: impl Into<String>) -> Self {
        Self::Cycle {
            detail: detail.into(),
        }
    }
}

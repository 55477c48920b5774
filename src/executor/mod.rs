//! Task execution engine
//!
//! This module hides the execution strategy: how callables are resolved,
//! how a batch is driven concurrently, and how outcomes are observed.
//!
//! Module organization:
//! - `resolver`: the name-to-callable seam and the built-in registry
//! - `task_executor`: per-batch concurrent launch
//! - `result`: the shared, memoized outcome wrapper
//! - `error`: the execution error type

mod error;
mod resolver;
mod result;
mod task_executor;

pub use error::{ExecutionError, Result};
pub use resolver::{Resolver, TaskFn, TaskFuture, TaskRegistry};
pub use result::{TaskExecutionResult, TaskState};
pub use task_executor::{ExecutionMode, TaskExecutor};

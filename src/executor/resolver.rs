//! Task name resolution
//!
//! The scheduler never holds executable logic itself; a [`Resolver`] maps
//! a task name to its callable at execution time. [`TaskRegistry`] is the
//! built-in resolver: a concurrent map from name to boxed async closure.

use super::error::{ExecutionError, Result};
use dashmap::DashMap;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Boxed future produced by a task callable
pub type TaskFuture = BoxFuture<'static, Result<Value>>;

/// A task's executable logic: input value in, future value out
pub type TaskFn = Arc<dyn Fn(Value) -> TaskFuture + Send + Sync>;

/// Lookup from task name to executable logic
///
/// Resolution failures propagate unchanged to the workflow caller.
pub trait Resolver: Send + Sync {
    /// Resolves a task name to its callable
    fn resolve(&self, name: &str) -> Result<TaskFn>;
}

impl<R: Resolver + ?Sized> Resolver for Arc<R> {
    fn resolve(&self, name: &str) -> Result<TaskFn> {
        (**self).resolve(name)
    }
}

/// Concurrent registry of task callables
///
/// # Examples
///
/// ```
/// use gather::TaskRegistry;
/// use serde_json::json;
///
/// let registry = TaskRegistry::new();
/// registry.register("fetch_user", |input| async move {
///     Ok(json!({ "user": { "id": 1 }, "input": input }))
/// });
/// assert!(registry.contains("fetch_user"));
/// ```
#[derive(Default)]
pub struct TaskRegistry {
    tasks: DashMap<String, TaskFn>,
}

impl TaskRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            tasks: DashMap::new(),
        }
    }

    /// Registers a callable under a task name
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register<F, Fut>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        self.tasks
            .insert(name.into(), Arc::new(move |input| f(input).boxed()));
    }

    /// Returns true if a callable is registered under the name
    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// Returns the number of registered callables
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Resolver for TaskRegistry {
    fn resolve(&self, name: &str) -> Result<TaskFn> {
        self.tasks
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ExecutionError::unresolved(name))
    }
}

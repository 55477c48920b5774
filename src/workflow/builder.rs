//! Workflow configuration surface
//!
//! A thin builder over the core: tasks are declared in order (each
//! dependency must be declared before its dependents), the resolver and
//! aggregator are passed in explicitly, and `build` validates the whole
//! configuration up front. There is no hidden default state shared
//! across workflow instances.

use super::Workflow;
use crate::aggregator::{Aggregate, DeepMerge};
use crate::executor::{ExecutionError, ExecutionMode, Resolver, Result};
use crate::graph::{Task, TaskGraph};
use std::sync::Arc;

/// Builder for a [`Workflow`]
///
/// # Examples
///
/// ```
/// use gather::{TaskRegistry, Workflow};
/// use serde_json::json;
///
/// let registry = TaskRegistry::new();
/// registry.register("fetch_post", |_| async { Ok(json!({"title": "hello"})) });
/// registry.register("fetch_user", |_| async { Ok(json!({"user": {"id": 1}})) });
///
/// let workflow = Workflow::builder()
///     .root_task("fetch_post")
///     .task("fetch_user", ["fetch_post"])
///     .resolver(registry)
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct WorkflowBuilder {
    tasks: Vec<Task>,
    resolver: Option<Arc<dyn Resolver>>,
    aggregator: Option<Arc<dyn Aggregate>>,
    mode: ExecutionMode,
}

impl WorkflowBuilder {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Declares a task with its dependency names
    ///
    /// Declaration order matters: dependencies must be declared before
    /// the tasks that depend on them, and it breaks ordering ties during
    /// scheduling.
    pub fn task<I, S>(mut self, name: impl Into<String>, depends_on: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tasks.push(Task::new(name, depends_on));
        self
    }

    /// Declares a task with no dependencies
    pub fn root_task(mut self, name: impl Into<String>) -> Self {
        self.tasks.push(Task::root(name));
        self
    }

    /// Sets the resolver that maps task names to callables
    pub fn resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Sets the aggregation strategy (default: [`DeepMerge`])
    pub fn aggregator(mut self, aggregator: impl Aggregate + 'static) -> Self {
        self.aggregator = Some(Arc::new(aggregator));
        self
    }

    /// Sets how batches are driven (default: concurrent)
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validates the configuration and builds the workflow
    ///
    /// # Errors
    ///
    /// - [`ExecutionError::Configuration`] if no resolver was supplied
    /// - [`ExecutionError::Graph`] for unknown dependency names,
    ///   duplicate task names, or an unschedulable graph
    pub fn build(self) -> Result<Workflow> {
        let resolver = self
            .resolver
            .ok_or_else(|| ExecutionError::configuration("no resolver configured"))?;

        let graph = TaskGraph::from_tasks(self.tasks)?;
        // Surface scheduling failures at build time, before any task runs
        graph.topological_order()?;

        Ok(Workflow {
            graph,
            resolver,
            aggregator: self
                .aggregator
                .unwrap_or_else(|| Arc::new(DeepMerge::new())),
            mode: self.mode,
        })
    }
}

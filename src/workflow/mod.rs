//! Workflow orchestration
//!
//! The orchestration loop drives the graph's batches through the
//! executor and the aggregator. Tasks are processed in dependent order,
//! with the merged outputs of each batch fed as input to the next batch,
//! so later tasks can use the enriched data produced upstream. The
//! externally visible result is every task's contribution merged against
//! the *original* input; the intermediate chained inputs exist only to
//! pass enriched data forward during execution.

mod builder;

pub use builder::WorkflowBuilder;

use crate::aggregator::Aggregate;
use crate::executor::{ExecutionMode, Resolver, Result, TaskExecutor};
use crate::graph::TaskGraph;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// A configured, runnable workflow
///
/// Built once via [`Workflow::builder`]; immutable afterwards and safe
/// to run repeatedly.
///
/// # Examples
///
/// ```
/// use gather::{TaskRegistry, Workflow};
/// use serde_json::json;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let registry = TaskRegistry::new();
/// registry.register("fetch_user", |_| async {
///     Ok(json!({"user": {"name": "ian"}}))
/// });
///
/// let workflow = Workflow::builder()
///     .root_task("fetch_user")
///     .resolver(registry)
///     .build()
///     .unwrap();
///
/// let result = workflow.run(json!({"id": 1})).await.unwrap();
/// assert_eq!(result, json!({"id": 1, "user": {"name": "ian"}}));
/// # });
/// ```
pub struct Workflow {
    pub(super) graph: TaskGraph,
    pub(super) resolver: Arc<dyn Resolver>,
    pub(super) aggregator: Arc<dyn Aggregate>,
    pub(super) mode: ExecutionMode,
}

impl Workflow {
    /// Returns a builder for configuring a workflow
    pub fn builder() -> WorkflowBuilder {
        WorkflowBuilder::new()
    }

    /// Returns the underlying task graph
    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    /// Returns a Graphviz DOT description of the workflow
    pub fn to_dot(&self) -> String {
        self.graph.to_dot()
    }

    /// Executes the workflow against the given input
    ///
    /// Batches run strictly in topological order; tasks within a batch
    /// run concurrently against the current aggregated input. After the
    /// last batch, all results are merged against the original input to
    /// produce the final value.
    ///
    /// Fails with the first surfaced task, scheduling, or aggregation
    /// error; no partial result is delivered.
    pub async fn run(&self, input: Value) -> Result<Value> {
        let executor = TaskExecutor::with_mode(Arc::clone(&self.resolver), self.mode);

        let mut current = input.clone();
        let mut all_results = Vec::new();

        for batch in self.graph.batches()? {
            let batch = batch?;
            debug!(size = batch.len(), "executing batch");

            let results = executor.run(&batch, &current)?;
            current = self.aggregator.combine(&current, &results).await?;
            all_results.extend(results);
        }

        debug!(tasks = all_results.len(), "workflow complete, merging final result");
        self.aggregator.combine(&input, &all_results).await
    }
}

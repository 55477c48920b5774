//! Gather: dependency-aware task orchestration
//!
//! `gather` runs named units of work ("tasks") according to their
//! declared dependencies: it computes a valid execution order, runs
//! independent tasks concurrently in batches, feeds each batch's merged
//! output forward as input to the next batch, and combines every task's
//! output into one final value using a pluggable merge strategy with an
//! optional validation-based filtering step.
//!
//! # Features
//!
//! - **Derived parallelism**: concurrency groups are computed from the
//!   declared partial order; callers never annotate batches by hand
//! - **Input enrichment**: later tasks see the merged output of earlier
//!   batches, so data accumulates as it moves through the workflow
//! - **Pluggable aggregation**: deep merge, shallow merge, or ordered
//!   deep merge, with reverse/merge-input/array options
//! - **Validation filtering**: strip invalid keys from task outputs
//!   before they enter the merge, with a record of what was removed
//!
//! # Quick Start
//!
//! ```
//! use gather::{TaskRegistry, Workflow};
//! use serde_json::json;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let registry = TaskRegistry::new();
//! registry.register("fetch_post", |input| async move {
//!     Ok(json!({"title": "hello", "user_id": input["id"]}))
//! });
//! registry.register("fetch_user", |input| async move {
//!     Ok(json!({"user": {"id": input["user_id"], "email": "t@t.com"}}))
//! });
//!
//! let workflow = Workflow::builder()
//!     .root_task("fetch_post")
//!     .task("fetch_user", ["fetch_post"])
//!     .resolver(registry)
//!     .build()
//!     .unwrap();
//!
//! let result = workflow.run(json!({"id": 12})).await.unwrap();
//! assert_eq!(result["user"]["email"], "t@t.com");
//! # });
//! ```
//!
//! # Module Organization
//!
//! Each module hides a design decision that is likely to change:
//!
//! - [`graph`]: task identity, dependency validation, topological
//!   ordering and batching (hides the scheduling algorithms)
//! - [`executor`]: name resolution and per-batch concurrent execution
//!   (hides the execution strategy)
//! - [`filter`]: validation-driven stripping of invalid values (hides
//!   the validation engine behind a small contract)
//! - [`aggregator`]: merge strategies (hides merge semantics)
//! - [`workflow`]: the orchestration loop and configuration surface

pub mod aggregator;
pub mod executor;
pub mod filter;
pub mod graph;
pub mod workflow;

// Re-export commonly used types for convenience
pub use aggregator::{Aggregate, ArrayStrategy, DeepMerge, OrderedDeepMerge, ShallowMerge};
pub use executor::{
    ExecutionError, ExecutionMode, Resolver, Result, TaskExecutionResult, TaskExecutor, TaskFn,
    TaskFuture, TaskRegistry, TaskState,
};
pub use filter::{
    Contract, ContractFilter, Filter, FilterError, Filtered, Filtering, Noop, Validation,
    ValidationError,
};
pub use graph::{Batches, GraphError, GraphResult, Task, TaskGraph};
pub use workflow::{Workflow, WorkflowBuilder};

// Re-export dependencies used in public API
pub use serde_json;

/// Prelude module for convenient glob imports
///
/// # Example
///
/// ```
/// use gather::prelude::*;
/// ```
pub mod prelude {
    pub use crate::aggregator::{Aggregate, ArrayStrategy, DeepMerge, OrderedDeepMerge, ShallowMerge};
    pub use crate::executor::{
        ExecutionError, ExecutionMode, Resolver, Result as ExecutionResult, TaskExecutionResult,
        TaskExecutor, TaskRegistry, TaskState,
    };
    pub use crate::filter::{Contract, ContractFilter, Filter, Filtering, Noop};
    pub use crate::graph::{GraphError, GraphResult, Task, TaskGraph};
    pub use crate::workflow::{Workflow, WorkflowBuilder};

    // Re-export commonly used external types
    pub use serde_json::{json, Value};
}

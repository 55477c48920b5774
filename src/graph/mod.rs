//! Task dependency graph
//!
//! This module hides the graph representation and scheduling algorithms:
//! how tasks are stored, how the dependency relation is derived from
//! declared names, and how the topological order is partitioned into
//! concurrent batches.

mod dot;
mod error;
mod task;
mod task_graph;

pub use error::{GraphError, GraphResult};
pub use task::Task;
pub use task_graph::{Batches, TaskGraph};

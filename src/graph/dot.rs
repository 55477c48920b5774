//! DOT export for task graphs
//!
//! Produces a Graphviz `digraph` description with one directed edge per
//! `(task, dependent)` pair. Edge sources appear in insertion order, so
//! the output is stable for a fixed graph definition and can be rendered
//! with `dot -Tsvg graph.dot`.

use super::task_graph::TaskGraph;
use std::fmt::Write;

/// Serializes a task graph to the DOT format
pub(super) struct DotSerializer<'a> {
    graph: &'a TaskGraph,
}

impl<'a> DotSerializer<'a> {
    pub(super) fn new(graph: &'a TaskGraph) -> Self {
        Self { graph }
    }

    pub(super) fn to_dot(&self) -> String {
        let mut out = String::from("digraph TaskGraph {\n");
        for task in self.graph.tasks() {
            for dependent in self.graph.tasks().filter(|t| t.depends_on_task(task)) {
                // Infallible for String targets
                let _ = writeln!(out, "  {} -> {};", task.name(), dependent.name());
            }
        }
        out.push_str("}\n");
        out
    }
}

impl TaskGraph {
    /// Returns a Graphviz DOT description of the dependency graph
    ///
    /// One line per edge, `source -> target;`, sources in insertion
    /// order. Intended for visualization tooling outside the core.
    ///
    /// # Examples
    ///
    /// ```
    /// use gather::{Task, TaskGraph};
    ///
    /// let graph = TaskGraph::from_tasks([
    ///     Task::root("one"),
    ///     Task::new("two", ["one"]),
    /// ]).unwrap();
    ///
    /// assert_eq!(graph.to_dot(), "digraph TaskGraph {\n  one -> two;\n}\n");
    /// ```
    pub fn to_dot(&self) -> String {
        DotSerializer::new(self).to_dot()
    }
}

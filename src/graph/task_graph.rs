//! Dependency graph for workflow tasks
//!
//! The graph owns the full task set and derives the dependency relation
//! from the names each task declares. Tasks must be inserted in
//! dependency-safe order: a dependency name that is not already present
//! rejects the insertion. This makes forward references (and therefore
//! cycles) unrepresentable through the public API, but topological
//! ordering still detects cycles explicitly rather than trusting that
//! invariant.
//!
//! # Batching
//!
//! [`TaskGraph::batches`] partitions the topological order into
//! concurrency-maximal groups: each batch is the maximal leading run of
//! pending tasks whose dependencies are all outside the pending list.
//! Tasks within one batch have no dependency relation among themselves
//! and are safe to run concurrently. Parallelism is derived purely from
//! the declared partial order; callers never annotate concurrency groups
//! by hand.

use super::error::{GraphError, GraphResult};
use super::task::Task;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// A directed acyclic graph of tasks, ordered by insertion
///
/// Built once per workflow definition and immutable afterwards; queried
/// repeatedly for ordering and batches.
///
/// # Examples
///
/// ```
/// use gather::{Task, TaskGraph};
///
/// let mut graph = TaskGraph::new();
/// graph.insert(Task::root("fetch_post")).unwrap();
/// graph.insert(Task::new("fetch_user", ["fetch_post"])).unwrap();
///
/// let order = graph.topological_order().unwrap();
/// assert_eq!(order[0].name(), "fetch_post");
/// assert_eq!(order[1].name(), "fetch_user");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    /// Tasks in insertion order
    tasks: Vec<Task>,
}

impl TaskGraph {
    /// Creates a new empty graph
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Creates a graph from tasks, inserting them in order
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> GraphResult<Self> {
        let mut graph = Self::new();
        for task in tasks {
            graph.insert(task)?;
        }
        Ok(graph)
    }

    /// Returns the number of tasks in the graph
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if the graph has no tasks
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns an iterator over the tasks in insertion order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Returns true if a task with the given name exists
    pub fn contains(&self, name: &str) -> bool {
        self.tasks.iter().any(|task| task.name() == name)
    }

    /// Inserts a task into the graph
    ///
    /// Every declared dependency must already be present, and the name
    /// must be unique. On failure the graph is left untouched.
    ///
    /// # Errors
    ///
    /// - [`GraphError::InvalidDependency`] for an unknown dependency name
    /// - [`GraphError::DuplicateTask`] for a name collision
    pub fn insert(&mut self, task: Task) -> GraphResult<()> {
        if self.contains(task.name()) {
            return Err(GraphError::duplicate_task(task.name()));
        }

        for dependency in task.depends_on() {
            if !self.contains(dependency) {
                return Err(GraphError::invalid_dependency(task.name(), dependency));
            }
        }

        self.tasks.push(task);
        Ok(())
    }

    /// Returns a topological ordering of the tasks
    ///
    /// Every task appears after all tasks it depends on. Ties between
    /// unordered tasks are broken by insertion order, so the result is
    /// stable for a fixed insertion sequence.
    ///
    /// Uses Kahn's algorithm with a min-index ready set. Cycle detection
    /// is explicit: a result shorter than the task count means a cycle,
    /// reported as [`GraphError::Cycle`] rather than looping forever.
    pub fn topological_order(&self) -> GraphResult<Vec<Task>> {
        let index_of: HashMap<&str, usize> = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| (task.name(), i))
            .collect();

        let mut in_degree = vec![0usize; self.tasks.len()];
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); self.tasks.len()];

        for (i, task) in self.tasks.iter().enumerate() {
            for dependency in task.depends_on() {
                // Dependencies are validated at insertion time
                let dep = index_of[dependency.as_str()];
                in_degree[i] += 1;
                successors[dep].push(i);
            }
        }

        // Min-heap on insertion index keeps ties in insertion order
        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(self.tasks.len());
        while let Some(Reverse(i)) = ready.pop() {
            order.push(self.tasks[i].clone());
            for &succ in &successors[i] {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    ready.push(Reverse(succ));
                }
            }
        }

        if order.len() != self.tasks.len() {
            let stuck: Vec<&str> = self
                .tasks
                .iter()
                .enumerate()
                .filter(|(i, _)| in_degree[*i] > 0)
                .map(|(_, task)| task.name())
                .collect();
            return Err(GraphError::cycle(stuck.join(", ")));
        }

        Ok(order)
    }

    /// Returns the tasks that could run from a cold start
    ///
    /// This is the prefix of the topological order whose dependencies are
    /// all satisfied without running anything else first.
    pub fn runnable_tasks(&self) -> GraphResult<Vec<Task>> {
        let order = self.topological_order()?;
        let runnable = order
            .iter()
            .take_while(|task| task.satisfied_given_remaining(&self.tasks))
            .cloned()
            .collect();
        Ok(runnable)
    }

    /// Returns a lazy iterator over concurrency-maximal batches
    ///
    /// Batches are emitted in execution order; the concatenation of all
    /// batches equals the topological order, and no task in a batch
    /// depends on another task in the same batch. The iterator is
    /// restartable: each call produces a fresh sequence.
    ///
    /// # Errors
    ///
    /// Fails up front with [`GraphError::Cycle`] if the graph is cyclic.
    /// An iteration that can make no progress while tasks remain yields
    /// [`GraphError::Unfinishable`]; this guards against internal
    /// invariant violations and should not occur for a validated graph.
    pub fn batches(&self) -> GraphResult<Batches> {
        let pending = self.topological_order()?;
        Ok(Batches { pending })
    }

    /// Returns the mapping from each task to its direct dependency set
    ///
    /// Exposed for testing and visualization; the scheduler itself works
    /// from the batching iterator.
    pub fn dependency_map(&self) -> HashMap<Task, HashSet<Task>> {
        self.tasks
            .iter()
            .map(|task| {
                let deps = self
                    .tasks
                    .iter()
                    .filter(|candidate| task.depends_on_task(candidate))
                    .cloned()
                    .collect();
                (task.clone(), deps)
            })
            .collect()
    }
}

/// Iterator over concurrency-maximal task batches
///
/// Created by [`TaskGraph::batches`]. Yields `GraphResult<Vec<Task>>`;
/// after an error the iterator is fused.
#[derive(Debug, Clone)]
pub struct Batches {
    pending: Vec<Task>,
}

impl Iterator for Batches {
    type Item = GraphResult<Vec<Task>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pending.is_empty() {
            return None;
        }

        let batch: Vec<Task> = self
            .pending
            .iter()
            .take_while(|task| task.satisfied_given_remaining(&self.pending))
            .cloned()
            .collect();

        if batch.is_empty() {
            // No progress although tasks remain pending
            self.pending.clear();
            return Some(Err(GraphError::Unfinishable));
        }

        self.pending.drain(..batch.len());
        Some(Ok(batch))
    }
}

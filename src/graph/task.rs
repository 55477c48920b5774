//! Task identity
//!
//! A task is a named unit of work together with the names of the tasks
//! that must complete before it may run. Tasks carry no executable logic
//! themselves; the [`Resolver`](crate::executor::Resolver) maps a task
//! name to its callable at execution time.
//!
//! Names are used as identifiers rather than indices because they are
//! human-readable in `depends_on` declarations and stable across
//! reordering of the configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named unit of work with declared upstream dependencies
///
/// Equality and hashing are structural (name plus dependency list), so two
/// tasks built from the same descriptor compare equal. A task is immutable
/// after construction.
///
/// # Examples
///
/// ```
/// use gather::Task;
///
/// let task = Task::new("fetch_user", ["fetch_post"]);
/// assert_eq!(task.name(), "fetch_user");
/// assert!(task.depends_on().contains(&"fetch_post".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    /// Unique name within a graph
    name: String,
    /// Names of tasks that must complete first
    depends_on: Vec<String>,
}

impl Task {
    /// Creates a new task with the given name and dependency names
    pub fn new<I, S>(name: impl Into<String>, depends_on: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            depends_on: depends_on.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a task with no dependencies
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            depends_on: Vec::new(),
        }
    }

    /// Returns the task name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared dependency names
    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    /// Returns true if this task depends on `other`
    pub fn depends_on_task(&self, other: &Task) -> bool {
        self.depends_on.iter().any(|dep| dep == other.name())
    }

    /// Returns true if none of `remaining` is a dependency of this task
    ///
    /// This is the batching predicate: a task whose dependencies are all
    /// outside the remaining pending list has no outstanding blockers and
    /// may run in the current batch.
    pub fn satisfied_given_remaining(&self, remaining: &[Task]) -> bool {
        remaining.iter().all(|task| !self.depends_on_task(task))
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

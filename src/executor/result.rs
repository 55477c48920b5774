//! Execution result wrapper
//!
//! A [`TaskExecutionResult`] wraps one task's in-flight or completed
//! asynchronous outcome: the originating task, a unique identifier, the
//! launch timestamp, a non-blocking lifecycle state, and the outcome
//! itself behind a shared, memoized future. The shared future matters:
//! the orchestration loop extracts every result twice (once for the
//! per-batch merge, once for the final merge over all batches), and the
//! underlying callable must still run exactly once.

use super::error::{ExecutionError, Result};
use crate::graph::Task;
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use serde_json::Value;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Lifecycle state of a task's asynchronous outcome
///
/// Transitions are monotonic:
/// `Unscheduled → Pending → Processing → Fulfilled | Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum TaskState {
    /// Created but not yet handed to an executor
    Unscheduled = 0,
    /// Launched, not yet running
    Pending = 1,
    /// The callable is running
    Processing = 2,
    /// Completed with a value
    Fulfilled = 3,
    /// Completed with a failure
    Rejected = 4,
}

impl TaskState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => TaskState::Unscheduled,
            1 => TaskState::Pending,
            2 => TaskState::Processing,
            3 => TaskState::Fulfilled,
            _ => TaskState::Rejected,
        }
    }
}

/// Shared, monotonic state cell written by the executing future and read
/// by anyone holding the result
#[derive(Debug)]
pub(super) struct StateCell(AtomicU8);

impl StateCell {
    pub(super) fn new() -> Self {
        Self(AtomicU8::new(TaskState::Unscheduled as u8))
    }

    /// Advances the state; transitions never revert
    pub(super) fn advance(&self, state: TaskState) {
        self.0.fetch_max(state as u8, Ordering::SeqCst);
    }

    pub(super) fn get(&self) -> TaskState {
        TaskState::from_u8(self.0.load(Ordering::SeqCst))
    }
}

type OutcomeFuture = Shared<BoxFuture<'static, Result<Value>>>;

/// Wrapper around one task's asynchronous outcome
///
/// Owned by the batch that created it until consumed by an aggregator;
/// extraction via [`value`](TaskExecutionResult::value) may be repeated,
/// the outcome is memoized.
pub struct TaskExecutionResult {
    id: Uuid,
    task: Task,
    started_at: DateTime<Utc>,
    state: Arc<StateCell>,
    outcome: OutcomeFuture,
}

impl TaskExecutionResult {
    pub(super) fn new(task: Task, state: Arc<StateCell>, outcome: OutcomeFuture) -> Self {
        Self {
            id: Uuid::new_v4(),
            task,
            started_at: Utc::now(),
            state,
            outcome,
        }
    }

    /// Creates an already-fulfilled result
    ///
    /// Useful in tests and custom aggregators; execution never goes
    /// through this path.
    pub fn fulfilled(task: Task, value: Value) -> Self {
        let state = Arc::new(StateCell::new());
        state.advance(TaskState::Fulfilled);
        Self::new(task, state, futures::future::ready(Ok(value)).boxed().shared())
    }

    /// Creates an already-rejected result
    pub fn rejected(task: Task, error: ExecutionError) -> Self {
        let state = Arc::new(StateCell::new());
        state.advance(TaskState::Rejected);
        Self::new(task, state, futures::future::ready(Err(error)).boxed().shared())
    }

    /// Returns the unique identifier of this result
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the originating task
    pub fn task(&self) -> &Task {
        &self.task
    }

    /// Returns when this result was created
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the current lifecycle state without blocking
    pub fn state(&self) -> TaskState {
        self.state.get()
    }

    /// Returns true once the outcome is fulfilled or rejected
    pub fn is_settled(&self) -> bool {
        matches!(self.state(), TaskState::Fulfilled | TaskState::Rejected)
    }

    /// Waits for the outcome and returns the task's value
    ///
    /// Re-raises the original failure if the task was rejected. May be
    /// called any number of times; the callable still runs exactly once.
    pub async fn value(&self) -> Result<Value> {
        self.outcome.clone().await
    }
}

impl std::fmt::Debug for TaskExecutionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskExecutionResult")
            .field("id", &self.id)
            .field("task", &self.task.name())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

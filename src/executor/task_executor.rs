//! Per-batch concurrent task execution
//!
//! Given one batch of tasks and a resolver, the executor launches every
//! task against the same input value and returns one wrapped result per
//! task, preserving batch order. Each callable is invoked exactly once.
//! Failures are not caught or classified here; a failing task leaves its
//! result rejected and the error surfaces when the value is extracted.
//!
//! # Execution modes
//!
//! [`ExecutionMode::Concurrent`] spawns one tokio task per callable, so
//! batch members run in parallel on the runtime's worker threads.
//! [`ExecutionMode::Inline`] keeps the futures lazy in the current task:
//! they run, in extraction order, when an aggregator awaits them. Inline
//! mode exists for deterministic testing; concurrency affects completion
//! timing, never merge order.

use super::error::Result;
use super::resolver::Resolver;
use super::result::{StateCell, TaskExecutionResult, TaskState};
use crate::graph::Task;
use futures::FutureExt;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::error::ExecutionError;

/// How a batch's callables are driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Spawn each task on the tokio runtime (default)
    #[default]
    Concurrent,
    /// Run each task lazily in the current tokio task, in extraction order
    Inline,
}

/// Launches one batch of tasks concurrently against a shared input
pub struct TaskExecutor<R> {
    resolver: R,
    mode: ExecutionMode,
}

impl<R: Resolver> TaskExecutor<R> {
    /// Creates an executor with the default concurrent mode
    pub fn new(resolver: R) -> Self {
        Self::with_mode(resolver, ExecutionMode::Concurrent)
    }

    /// Creates an executor with an explicit execution mode
    pub fn with_mode(resolver: R, mode: ExecutionMode) -> Self {
        Self { resolver, mode }
    }

    /// Launches every task in the batch against the same input
    ///
    /// Returns one [`TaskExecutionResult`] per task, in batch order.
    /// Resolution failures propagate immediately, before anything runs;
    /// execution failures are deferred to value extraction.
    pub fn run(&self, batch: &[Task], input: &Value) -> Result<Vec<TaskExecutionResult>> {
        // Resolve the whole batch up front so a missing callable fails
        // the batch before any sibling starts
        let callables = batch
            .iter()
            .map(|task| self.resolver.resolve(task.name()))
            .collect::<Result<Vec<_>>>()?;

        debug!(size = batch.len(), mode = ?self.mode, "launching batch");

        let results = batch
            .iter()
            .zip(callables)
            .map(|(task, callable)| {
                debug!(task = %task.name(), "launching task");
                self.launch(task.clone(), callable, input.clone())
            })
            .collect();

        Ok(results)
    }

    fn launch(
        &self,
        task: Task,
        callable: super::resolver::TaskFn,
        input: Value,
    ) -> TaskExecutionResult {
        let state = Arc::new(StateCell::new());
        state.advance(TaskState::Pending);

        let fut = {
            let state = Arc::clone(&state);
            async move {
                state.advance(TaskState::Processing);
                let result = callable(input).await;
                match &result {
                    Ok(_) => state.advance(TaskState::Fulfilled),
                    Err(_) => state.advance(TaskState::Rejected),
                }
                result
            }
        };

        let outcome = match self.mode {
            ExecutionMode::Concurrent => {
                let handle = tokio::spawn(fut);
                let state = Arc::clone(&state);
                let name = task.name().to_string();
                async move {
                    match handle.await {
                        Ok(result) => result,
                        Err(join_error) => {
                            state.advance(TaskState::Rejected);
                            Err(ExecutionError::task_panic(name, join_error.to_string()))
                        }
                    }
                }
                .boxed()
                .shared()
            }
            ExecutionMode::Inline => fut.boxed().shared(),
        };

        TaskExecutionResult::new(task, state, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::TaskRegistry;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    fn registry() -> TaskRegistry {
        let registry = TaskRegistry::new();
        registry.register("echo", |input| async move { Ok(input) });
        registry.register("id", |_| async { Ok(json!({"user": {"id": 1}})) });
        registry.register("fail", |_| async { Err(ExecutionError::failed("boom")) });
        registry
    }

    #[tokio::test]
    async fn test_runs_batch_against_shared_input() {
        let executor = TaskExecutor::new(registry());
        let batch = [Task::root("echo"), Task::root("id")];

        let results = executor.run(&batch, &json!({"foo": "bar"})).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].task().name(), "echo");
        assert_eq!(results[0].value().await.unwrap(), json!({"foo": "bar"}));
        assert_eq!(results[1].value().await.unwrap(), json!({"user": {"id": 1}}));
    }

    #[tokio::test]
    async fn test_unresolved_task_fails_before_launch() {
        let executor = TaskExecutor::new(registry());
        let batch = [Task::root("echo"), Task::root("missing")];

        let result = executor.run(&batch, &json!({}));
        assert_eq!(result.err(), Some(ExecutionError::unresolved("missing")));
    }

    #[tokio::test]
    async fn test_failure_surfaces_at_extraction() {
        let executor = TaskExecutor::new(registry());

        let results = executor.run(&[Task::root("fail")], &json!({})).unwrap();
        assert_eq!(
            results[0].value().await,
            Err(ExecutionError::failed("boom"))
        );
        assert_eq!(results[0].state(), TaskState::Rejected);
    }

    #[tokio::test]
    async fn test_sibling_completes_when_one_task_fails() {
        let registry = TaskRegistry::new();
        static COMPLETED: AtomicUsize = AtomicUsize::new(0);
        registry.register("good", |_| async {
            COMPLETED.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"good": true}))
        });
        registry.register("fail", |_| async { Err(ExecutionError::failed("boom")) });

        let executor = TaskExecutor::new(registry);
        let results = executor
            .run(&[Task::root("good"), Task::root("fail")], &json!({}))
            .unwrap();

        assert_eq!(results[0].value().await.unwrap(), json!({"good": true}));
        assert!(results[1].value().await.is_err());
        assert_eq!(COMPLETED.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_mode_runs_in_parallel() {
        let registry = TaskRegistry::new();
        registry.register("slow_a", |_| async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(json!({"a": 1}))
        });
        registry.register("slow_b", |_| async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(json!({"b": 2}))
        });

        let executor = TaskExecutor::new(registry);
        let start = Instant::now();
        let results = executor
            .run(&[Task::root("slow_a"), Task::root("slow_b")], &json!({}))
            .unwrap();
        for result in &results {
            result.value().await.unwrap();
        }

        // Sequential execution would take ~200ms; allow generous headroom
        // for scheduler variance in CI
        assert!(
            start.elapsed() < Duration::from_millis(190),
            "tasks appear to have run sequentially: {:?}",
            start.elapsed()
        );
    }

    #[tokio::test]
    async fn test_inline_mode_is_lazy_and_deterministic() {
        let executor = TaskExecutor::with_mode(registry(), ExecutionMode::Inline);

        let results = executor.run(&[Task::root("id")], &json!({})).unwrap();
        // Nothing runs until the value is extracted
        assert_eq!(results[0].state(), TaskState::Pending);

        assert_eq!(results[0].value().await.unwrap(), json!({"user": {"id": 1}}));
        assert_eq!(results[0].state(), TaskState::Fulfilled);
    }

    #[tokio::test]
    async fn test_panicking_task_is_reported() {
        let registry = TaskRegistry::new();
        registry.register("explode", |_| async { panic!("kaboom") });

        let executor = TaskExecutor::new(registry);
        let results = executor.run(&[Task::root("explode")], &json!({})).unwrap();

        match results[0].value().await {
            Err(ExecutionError::TaskPanic { task, .. }) => assert_eq!(task, "explode"),
            other => panic!("expected TaskPanic, got {other:?}"),
        }
        assert_eq!(results[0].state(), TaskState::Rejected);
    }

    #[tokio::test]
    async fn test_callable_invoked_exactly_once() {
        let registry = TaskRegistry::new();
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        registry.register("counted", |_| async {
            CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(json!(1))
        });

        let executor = TaskExecutor::new(registry);
        let results = executor.run(&[Task::root("counted")], &json!({})).unwrap();

        results[0].value().await.unwrap();
        results[0].value().await.unwrap();
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }
}

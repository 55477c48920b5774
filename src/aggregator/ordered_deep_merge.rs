//! Convenience deep merge with fixed ordering options

use super::{Aggregate, ArrayStrategy, DeepMerge};
use crate::executor::{Result, TaskExecutionResult};
use crate::filter::Filter;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Deeply merges results in order from first to last
///
/// A [`DeepMerge`] with `reverse = false` and `merge_input = true` fixed;
/// the array strategy and filter remain configurable.
#[derive(Clone, Default)]
pub struct OrderedDeepMerge {
    inner: DeepMerge,
}

impl OrderedDeepMerge {
    /// Creates an ordered deep merge aggregator
    pub fn new() -> Self {
        Self {
            inner: DeepMerge::new(),
        }
    }

    /// Sets the strategy for colliding arrays
    pub fn array_strategy(mut self, strategy: ArrayStrategy) -> Self {
        self.inner = self.inner.array_strategy(strategy);
        self
    }

    /// Sets the filter applied to every value entering the merge
    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.inner = self.inner.filter_arc(Arc::new(filter));
        self
    }
}

#[async_trait]
impl Aggregate for OrderedDeepMerge {
    async fn combine(&self, input: &Value, results: &[TaskExecutionResult]) -> Result<Value> {
        self.inner.combine(input, results).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Task;
    use serde_json::json;

    #[tokio::test]
    async fn test_merges_in_declaration_order() {
        let results = [
            TaskExecutionResult::fulfilled(Task::root("a"), json!({"user": {"id": 1}})),
            TaskExecutionResult::fulfilled(Task::root("b"), json!({"user": {"id": 2}})),
        ];

        let merged = OrderedDeepMerge::new()
            .combine(&json!({"user": {"name": "ian"}}), &results)
            .await
            .unwrap();

        assert_eq!(merged, json!({"user": {"name": "ian", "id": 2}}));
    }
}

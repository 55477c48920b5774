//! Recursive merge aggregator

use super::{deep_merge, merge_base, processing_order, Aggregate, ArrayStrategy};
use crate::executor::{Result, TaskExecutionResult};
use crate::filter::{Filter, Noop};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Deep merges result values into the running input
///
/// Values are merged key by key, recursing into nested objects; on a key
/// collision the later-processed value wins, so `reverse` flips priority
/// to earlier tasks. Colliding arrays follow the configured
/// [`ArrayStrategy`].
///
/// This is the default aggregator.
///
/// # Examples
///
/// ```
/// use gather::aggregator::{Aggregate, DeepMerge};
/// use gather::{Task, TaskExecutionResult};
/// use serde_json::json;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let results = [
///     TaskExecutionResult::fulfilled(Task::root("ids"), json!({"user": {"id": 1}})),
///     TaskExecutionResult::fulfilled(Task::root("emails"), json!({"user": {"email": "t@t.com"}})),
/// ];
///
/// let merged = DeepMerge::new()
///     .combine(&json!({"user": {"name": "ian"}}), &results)
///     .await
///     .unwrap();
/// assert_eq!(merged, json!({"user": {"name": "ian", "id": 1, "email": "t@t.com"}}));
/// # });
/// ```
#[derive(Clone)]
pub struct DeepMerge {
    reverse: bool,
    merge_input: bool,
    array_strategy: ArrayStrategy,
    filter: Arc<dyn Filter>,
}

impl DeepMerge {
    /// Creates a deep merge aggregator with default options
    pub fn new() -> Self {
        Self {
            reverse: false,
            merge_input: true,
            array_strategy: ArrayStrategy::default(),
            filter: Arc::new(Noop),
        }
    }

    /// Processes results in reverse order, prioritizing earlier tasks
    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Whether the running input participates as the merge's starting
    /// point (default true)
    pub fn merge_input(mut self, merge_input: bool) -> Self {
        self.merge_input = merge_input;
        self
    }

    /// Sets the strategy for colliding arrays
    pub fn array_strategy(mut self, strategy: ArrayStrategy) -> Self {
        self.array_strategy = strategy;
        self
    }

    /// Sets the filter applied to every value entering the merge
    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filter = Arc::new(filter);
        self
    }

    pub(super) fn filter_arc(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filter = filter;
        self
    }
}

impl Default for DeepMerge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Aggregate for DeepMerge {
    async fn combine(&self, input: &Value, results: &[TaskExecutionResult]) -> Result<Value> {
        let mut merged = merge_base(input, self.merge_input, self.filter.as_ref());

        for result in processing_order(results, self.reverse) {
            let value = result.value().await?;
            let filtered = self.filter.apply(value).value;
            merged = deep_merge(merged, filtered, self.array_strategy);
        }

        Ok(merged)
    }
}

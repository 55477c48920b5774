//! Single-level merge aggregator

use super::{merge_base, processing_order, shallow_merge, Aggregate};
use crate::executor::{Result, TaskExecutionResult};
use crate::filter::{Filter, Noop};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Shallowly merges result values into the running input
///
/// Only top-level keys are merged; a colliding key is replaced wholesale
/// by the later-processed value, nested content included. No array
/// handling is performed.
#[derive(Clone)]
pub struct ShallowMerge {
    reverse: bool,
    merge_input: bool,
    filter: Arc<dyn Filter>,
}

impl ShallowMerge {
    /// Creates a shallow merge aggregator with default options
    pub fn new() -> Self {
        Self {
            reverse: false,
            merge_input: true,
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

    /// Sets the filter applied to every value entering the merge
    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filter = Arc::new(filter);
        self
    }
}

impl Default for ShallowMerge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Aggregate for ShallowMerge {
    async fn combine(&self, input: &Value, results: &[TaskExecutionResult]) -> Result<Value> {
        let mut merged = merge_base(input, self.merge_input, self.filter.as_ref());

        for result in processing_order(results, self.reverse) {
            let value = result.value().await?;
            let filtered = self.filter.apply(value).value;
            merged = shallow_merge(merged, filtered);
        }

        Ok(merged)
    }
}

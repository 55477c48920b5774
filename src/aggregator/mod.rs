//! Result aggregation strategies
//!
//! An aggregator reduces an ordered collection of task results, plus the
//! running input, into a single merged value. Results are merged in
//! stable batch order (or reversed, per the `reverse` option); task
//! completion timing never affects merge order. Every value entering the
//! merge passes through the aggregator's filter first, the initial input
//! included when `merge_input` is enabled.
//!
//! Extracting any result's value re-raises that task's failure, which
//! aborts the whole combine; no partial merge is ever returned.

mod deep_merge;
mod ordered_deep_merge;
mod shallow_merge;

pub use deep_merge::DeepMerge;
pub use ordered_deep_merge::OrderedDeepMerge;
pub use shallow_merge::ShallowMerge;

use crate::executor::{Result, TaskExecutionResult};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Strategy for merging an initial value with a set of task outputs
#[async_trait]
pub trait Aggregate: Send + Sync {
    /// Combines the input with the ordered task results into one value
    async fn combine(&self, input: &Value, results: &[TaskExecutionResult]) -> Result<Value>;
}

/// How colliding list-like leaf values are merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayStrategy {
    /// Append the later array to the earlier one (default)
    #[default]
    Concat,
    /// Replace the earlier array with the later one
    Overwrite,
}

/// Yields results in processing order, honoring the `reverse` option
fn processing_order(
    results: &[TaskExecutionResult],
    reverse: bool,
) -> Vec<&TaskExecutionResult> {
    if reverse {
        results.iter().rev().collect()
    } else {
        results.iter().collect()
    }
}

/// Returns the starting accumulator: the filtered input, or empty
fn merge_base(input: &Value, merge_input: bool, filter: &dyn crate::filter::Filter) -> Value {
    if merge_input {
        filter.apply(input.clone()).value
    } else {
        Value::Object(Map::new())
    }
}

/// Recursively merges `other` into `base`
///
/// Objects merge key by key; colliding arrays follow the array strategy;
/// any other collision is won outright by `other`.
fn deep_merge(base: Value, other: Value, arrays: ArrayStrategy) -> Value {
    match (base, other) {
        (Value::Object(mut base), Value::Object(other)) => {
            for (key, value) in other {
                let merged = match base.remove(&key) {
                    Some(existing) => deep_merge(existing, value, arrays),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (Value::Array(mut base), Value::Array(other)) if arrays == ArrayStrategy::Concat => {
            base.extend(other);
            Value::Array(base)
        }
        (_, other) => other,
    }
}

/// Merges `other` into `base` one level deep: whole keys are replaced
fn shallow_merge(base: Value, other: Value) -> Value {
    match (base, other) {
        (Value::Object(mut base), Value::Object(other)) => {
            for (key, value) in other {
                base.insert(key, value);
            }
            Value::Object(base)
        }
        (_, other) => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deep_merge_recurses_into_objects() {
        let merged = deep_merge(
            json!({"user": {"name": "ian"}}),
            json!({"user": {"id": 1}}),
            ArrayStrategy::Concat,
        );
        assert_eq!(merged, json!({"user": {"name": "ian", "id": 1}}));
    }

    #[test]
    fn test_deep_merge_concat_arrays() {
        let merged = deep_merge(
            json!({"tags": ["foo"]}),
            json!({"tags": ["bar"]}),
            ArrayStrategy::Concat,
        );
        assert_eq!(merged, json!({"tags": ["foo", "bar"]}));
    }

    #[test]
    fn test_deep_merge_overwrite_arrays() {
        let merged = deep_merge(
            json!({"tags": ["foo"]}),
            json!({"tags": ["bar"]}),
            ArrayStrategy::Overwrite,
        );
        assert_eq!(merged, json!({"tags": ["bar"]}));
    }

    #[test]
    fn test_deep_merge_scalar_collision_later_wins() {
        let merged = deep_merge(json!({"id": 1}), json!({"id": 2}), ArrayStrategy::Concat);
        assert_eq!(merged, json!({"id": 2}));
    }

    #[test]
    fn test_shallow_merge_replaces_whole_keys() {
        let merged = shallow_merge(json!({"user": {"name": "ian"}}), json!({"user": {"id": 1}}));
        assert_eq!(merged, json!({"user": {"id": 1}}));
    }
}

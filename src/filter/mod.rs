//! Validation-driven filtering of candidate values
//!
//! A filter sits between a task's output and the aggregator: every value
//! that enters the merged result passes through the configured filter
//! first. The [`Noop`] filter passes values through untouched; the
//! [`ContractFilter`] validates against an externally supplied
//! [`Contract`] and strips the keys that failed, reporting what was
//! removed and why.
//!
//! Filtering records are purely informational byproducts; the scheduler
//! never consults them.

mod contract;
mod error;
mod noop;

pub use contract::{Contract, ContractFilter, Validation, ValidationError};
pub use error::{FilterError, FilterResult};
pub use noop::Noop;

use serde::Serialize;
use serde_json::Value;

/// Information about one filtered (removed) item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filtering {
    /// Key path of the removed value
    pub path: Vec<String>,
    /// Why the item was filtered
    pub reason: String,
    /// The original, invalid value at that path
    pub input: Value,
}

impl Filtering {
    /// Creates a new filtering record
    pub fn new(path: Vec<String>, reason: impl Into<String>, input: Value) -> Self {
        Self {
            path,
            reason: reason.into(),
            input,
        }
    }
}

/// Result of applying a filter
#[derive(Debug, Clone, PartialEq)]
pub struct Filtered {
    /// The filtered value
    pub value: Value,
    /// Records of everything that was removed
    pub filterings: Vec<Filtering>,
}

/// Strategy for validating and stripping invalid fields from a value
/// before it participates in aggregation
pub trait Filter: Send + Sync {
    /// Applies the filter to a candidate value
    fn apply(&self, input: Value) -> Filtered;
}

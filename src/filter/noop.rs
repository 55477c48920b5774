//! Pass-through filter

use super::{Filter, Filtered};
use serde_json::Value;

/// Does not perform any filtering
///
/// The default when no filter is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Noop;

impl Filter for Noop {
    fn apply(&self, input: Value) -> Filtered {
        Filtered {
            value: input,
            filterings: Vec::new(),
        }
    }
}

//! Contract-based filtering
//!
//! The validation engine itself is an external collaborator; this module
//! only consumes its pass/fail contract. A [`Contract`] reports, for a
//! candidate value, a corrected output plus a list of errors carrying a
//! key path, a human-readable message, and the offending input. The
//! [`ContractFilter`] removes each errored key from the corrected output
//! and records what was stripped.

use super::error::{FilterError, FilterResult};
use super::{Filter, Filtered, Filtering};
use serde_json::{Map, Value};
use std::sync::Arc;

/// A single validation error reported by a contract
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Key path of the offending value
    pub path: Vec<String>,
    /// Human-readable reason
    pub message: String,
    /// The offending input value
    pub input: Value,
}

impl ValidationError {
    /// Creates a new validation error
    pub fn new(path: Vec<String>, message: impl Into<String>, input: Value) -> Self {
        Self {
            path,
            message: message.into(),
            input,
        }
    }
}

/// Outcome of validating a value against a contract
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    /// The corrected (coerced) value
    pub output: Value,
    /// Errors found during validation
    pub errors: Vec<ValidationError>,
}

/// Interface a validation engine must expose to be used as a filter
///
/// Implementations are expected to return an object-shaped `output` for
/// object-shaped input; compatibility is probed once at filter
/// configuration time, not per call.
pub trait Contract: Send + Sync {
    /// Validates a candidate value
    fn validate(&self, input: &Value) -> Validation;
}

/// Filters values with a validation contract
///
/// Every key the contract rejects is removed from a working copy of the
/// corrected output at its exact nested path; if the path already leads
/// to a missing container, the error is effectively represented and
/// removal is a no-op.
#[derive(Clone)]
pub struct ContractFilter {
    contract: Arc<dyn Contract>,
}

impl ContractFilter {
    /// Creates a new contract filter
    ///
    /// Probes the contract for compatibility: validating an empty object
    /// must produce an object-shaped output.
    ///
    /// # Errors
    ///
    /// [`FilterError::IncompatibleContract`] if the probe fails.
    pub fn new(contract: impl Contract + 'static) -> FilterResult<Self> {
        Self::from_arc(Arc::new(contract))
    }

    /// Creates a new contract filter from a shared contract
    pub fn from_arc(contract: Arc<dyn Contract>) -> FilterResult<Self> {
        let probe = contract.validate(&Value::Object(Map::new()));
        if !probe.output.is_object() {
            return Err(FilterError::incompatible_contract(
                "contract output is not an object",
            ));
        }

        Ok(Self { contract })
    }
}

impl Filter for ContractFilter {
    fn apply(&self, input: Value) -> Filtered {
        let validation = self.contract.validate(&input);
        let mut value = validation.output;

        let filterings = validation
            .errors
            .into_iter()
            .map(|error| {
                remove_at_path(&mut value, &error.path);
                Filtering::new(error.path, error.message, error.input)
            })
            .collect();

        Filtered { value, filterings }
    }
}

/// Removes the value at the given key path, if the path exists
fn remove_at_path(value: &mut Value, path: &[String]) {
    let Some((key, parents)) = path.split_last() else {
        return;
    };

    let mut target = value;
    for segment in parents {
        match target.get_mut(segment) {
            Some(next) => target = next,
            // Missing container: nothing left to remove
            None => return,
        }
    }

    if let Value::Object(map) = target {
        map.remove(key);
    }
}

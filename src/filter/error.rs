//! Error types for filter configuration

use thiserror::Error;

/// Result type for filter configuration
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised while configuring a filter
///
/// Filters fail at configuration time, never at run time: a filter that
/// constructed successfully always produces a [`Filtered`](super::Filtered)
/// result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FilterError {
    /// The supplied contract does not satisfy the validation interface
    #[error("incompatible contract: {detail}")]
    IncompatibleContract {
        /// What the compatibility probe observed
        detail: String,
    },
}

impl FilterError {
    /// Creates an incompatible contract error
    pub fn incompatible_contract(detail: impl Into<String>) -> Self {
        Self::IncompatibleContract {
            detail: detail.into(),
        }
    }
}

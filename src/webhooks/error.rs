//! Error types for admission validation.

use thiserror::Error;

use crate::duration::ParseDurationError;
use crate::webhooks::policies::time_ranges::TimeField;

/// Reason attached to denials caused by a field under its minimum.
pub const REASON_BELOW_MINIMUM: &str = "DurationBelowMinimum";
/// Reason attached to denials caused by an unparseable minimum.
pub const REASON_MALFORMED_DURATION: &str = "MalformedDuration";

/// Error returned by the validator hooks.
///
/// The `Display` text of `BelowMinimum` is the fixed per-field message and is
/// returned verbatim to the API caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A configured duration is shorter than the field allows
    #[error("{message}")]
    BelowMinimum {
        field: TimeField,
        message: &'static str,
        given_ms: i64,
    },

    /// A minimum duration constant could not be parsed
    #[error("{0}")]
    MalformedDuration(#[from] ParseDurationError),
}

impl ValidationError {
    /// Machine-readable reason reported alongside the denial message
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::BelowMinimum { .. } => REASON_BELOW_MINIMUM,
            ValidationError::MalformedDuration(_) => REASON_MALFORMED_DURATION,
        }
    }
}

/// Result type alias for validator hooks
pub type Result<T> = std::result::Result<T, ValidationError>;

//! Minimum duration policy.
//!
//! Enforced on CREATE and UPDATE.
//!
//! Every duration in the spec, when set, must be at least the minimum for its
//! field. Fields are checked in table order and the first violation wins.

use std::fmt;

use tracing::error;

use crate::crd::{PoisonPillConfig, PoisonPillConfigSpec};
use crate::duration::{Duration, parse_duration};
use crate::webhooks::error::{Result, ValidationError};

pub const MIN_DUR_PEER_API_SERVER_TIMEOUT: &str = "10ms";
pub const MIN_DUR_API_SERVER_TIMEOUT: &str = "10ms";
pub const MIN_DUR_PEER_DIAL_TIMEOUT: &str = "10ms";
pub const MIN_DUR_PEER_REQUEST_TIMEOUT: &str = "10ms";
pub const MIN_DUR_API_CHECK_INTERVAL: &str = "1s";
pub const MIN_DUR_PEER_UPDATE_INTERVAL: &str = "10s";

pub const ERR_PEER_API_SERVER_TIMEOUT: &str = "PeerApiServerTimeout 10ms";
pub const ERR_API_SERVER_TIMEOUT: &str = "ApiServerTimeout 10ms";
pub const ERR_PEER_DIAL_TIMEOUT: &str = "PeerDialTimeout 10ms";
pub const ERR_PEER_REQUEST_TIMEOUT: &str = "PeerRequestTimeout 10ms";
pub const ERR_API_CHECK_INTERVAL: &str = "ApiCheckInterval can't be less than 1s";
pub const ERR_PEER_UPDATE_INTERVAL: &str = "PeerUpdateInterval can't be less than 10s";

/// A duration-typed field of [`PoisonPillConfigSpec`] that carries a minimum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeField {
    PeerApiServerTimeout,
    ApiServerTimeout,
    PeerDialTimeout,
    PeerRequestTimeout,
    ApiCheckInterval,
    PeerUpdateInterval,
}

impl TimeField {
    /// All fields in the order they are validated.
    pub const ALL: [TimeField; 6] = [
        TimeField::PeerApiServerTimeout,
        TimeField::ApiServerTimeout,
        TimeField::PeerDialTimeout,
        TimeField::PeerRequestTimeout,
        TimeField::ApiCheckInterval,
        TimeField::PeerUpdateInterval,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TimeField::PeerApiServerTimeout => "PeerApiServerTimeout",
            TimeField::ApiServerTimeout => "ApiServerTimeout",
            TimeField::PeerDialTimeout => "PeerDialTimeout",
            TimeField::PeerRequestTimeout => "PeerRequestTimeout",
            TimeField::ApiCheckInterval => "ApiCheckInterval",
            TimeField::PeerUpdateInterval => "PeerUpdateInterval",
        }
    }

    /// Smallest accepted value, as a duration string
    pub fn min_duration(self) -> &'static str {
        match self {
            TimeField::PeerApiServerTimeout => MIN_DUR_PEER_API_SERVER_TIMEOUT,
            TimeField::ApiServerTimeout => MIN_DUR_API_SERVER_TIMEOUT,
            TimeField::PeerDialTimeout => MIN_DUR_PEER_DIAL_TIMEOUT,
            TimeField::PeerRequestTimeout => MIN_DUR_PEER_REQUEST_TIMEOUT,
            TimeField::ApiCheckInterval => MIN_DUR_API_CHECK_INTERVAL,
            TimeField::PeerUpdateInterval => MIN_DUR_PEER_UPDATE_INTERVAL,
        }
    }

    pub fn error_message(self) -> &'static str {
        match self {
            TimeField::PeerApiServerTimeout => ERR_PEER_API_SERVER_TIMEOUT,
            TimeField::ApiServerTimeout => ERR_API_SERVER_TIMEOUT,
            TimeField::PeerDialTimeout => ERR_PEER_DIAL_TIMEOUT,
            TimeField::PeerRequestTimeout => ERR_PEER_REQUEST_TIMEOUT,
            TimeField::ApiCheckInterval => ERR_API_CHECK_INTERVAL,
            TimeField::PeerUpdateInterval => ERR_PEER_UPDATE_INTERVAL,
        }
    }

    /// The configured value of this field, if set
    pub fn value(self, spec: &PoisonPillConfigSpec) -> Option<Duration> {
        match self {
            TimeField::PeerApiServerTimeout => spec.peer_api_server_timeout,
            TimeField::ApiServerTimeout => spec.api_server_timeout,
            TimeField::PeerDialTimeout => spec.peer_dial_timeout,
            TimeField::PeerRequestTimeout => spec.peer_request_timeout,
            TimeField::ApiCheckInterval => spec.api_check_interval,
            TimeField::PeerUpdateInterval => spec.peer_update_interval,
        }
    }
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validate that no time field in the resource goes below its minimum.
pub fn validate_times(resource: &PoisonPillConfig) -> Result<()> {
    for field in TimeField::ALL {
        if let Some(value) = field.value(&resource.spec) {
            check_field(field, value.as_millis(), field.min_duration())?;
        }
    }
    Ok(())
}

/// Compare a value in milliseconds against a minimum duration string.
pub fn check_field(field: TimeField, input_ms: i64, min_valid: &str) -> Result<()> {
    let min_valid_ms = to_ms(min_valid)?;

    if input_ms < min_valid_ms {
        let message = field.error_message();
        error!(
            field = %field,
            given_ms = input_ms,
            min_ms = min_valid_ms,
            "{}",
            message
        );
        return Err(ValidationError::BelowMinimum {
            field,
            message,
            given_ms: input_ms,
        });
    }

    Ok(())
}

fn to_ms(value: &str) -> Result<i64> {
    Ok(parse_duration(value)?.as_millis())
}

// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Property-based tests for poison-pill-webhook.
//!
//! Uses proptest to generate random inputs and verify invariants.

use proptest::prelude::*;

#[path = "../common/mod.rs"]
mod common;

use common::fixtures::PoisonPillConfigBuilder;
use poison_pill_webhook::crd::PoisonPillConfig;
use poison_pill_webhook::duration::{Duration, parse_duration};
use poison_pill_webhook::webhooks::Validator;
use poison_pill_webhook::webhooks::policies::time_ranges::TimeField;

/// Strategy for picking one of the validated fields.
fn any_field() -> impl Strategy<Value = TimeField> {
    prop::sample::select(TimeField::ALL.to_vec())
}

/// Strategy for durations between -1h and 1h at nanosecond resolution.
fn any_duration() -> impl Strategy<Value = Duration> {
    (-3_600_000_000_000i64..=3_600_000_000_000i64).prop_map(Duration::from_nanos)
}

fn config_with(field: TimeField, value: Duration) -> PoisonPillConfig {
    PoisonPillConfigBuilder::new("prop").field(field, value).build()
}

proptest! {
    /// A single field is accepted exactly when its whole milliseconds reach the minimum.
    #[test]
    fn prop_single_field_threshold(field in any_field(), value in any_duration()) {
        let min_ms = parse_duration(field.min_duration()).unwrap().as_millis();
        let result = config_with(field, value).validate_create();

        if value.as_millis() >= min_ms {
            prop_assert!(result.is_ok());
        } else {
            let err = result.unwrap_err();
            prop_assert_eq!(err.to_string(), field.error_message());
        }
    }

    /// Delete never rejects, whatever the durations are.
    #[test]
    fn prop_delete_always_allowed(field in any_field(), value in any_duration()) {
        prop_assert!(config_with(field, value).validate_delete().is_ok());
    }

    /// Create and update agree on every object.
    #[test]
    fn prop_create_and_update_agree(field in any_field(), value in any_duration()) {
        let config = config_with(field, value);
        let old = PoisonPillConfigBuilder::new("prop").build();
        prop_assert_eq!(config.validate_create(), config.validate_update(&old));
    }

    /// The canonical string form parses back to the same duration.
    #[test]
    fn prop_display_parses_back(value in any::<i64>()) {
        let duration = Duration::from_nanos(value);
        prop_assert_eq!(parse_duration(&duration.to_string()), Ok(duration));
    }
}

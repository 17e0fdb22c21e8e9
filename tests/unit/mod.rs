// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Unit tests for poison-pill-webhook.
//!
//! These tests run without a Kubernetes cluster and exercise the public
//! validation and registration API.

#[path = "../common/mod.rs"]
mod common;

mod validator_tests {
    use super::common::fixtures::{PoisonPillConfigBuilder, default_config};
    use poison_pill_webhook::duration::Duration;
    use poison_pill_webhook::webhooks::{
        Operation, ValidationContext, ValidationError, Validator, validate_all,
    };

    #[test]
    fn test_agent_defaults_accepted() {
        let config = default_config("poison-pill-config");
        assert!(config.validate_create().is_ok());
        assert!(config.validate_update(&config).is_ok());
    }

    #[test]
    fn test_each_minimum_is_inclusive() {
        let config = PoisonPillConfigBuilder::default()
            .peer_api_server_timeout(Duration::from_millis(10))
            .api_server_timeout(Duration::from_millis(10))
            .peer_dial_timeout(Duration::from_millis(10))
            .peer_request_timeout(Duration::from_millis(10))
            .api_check_interval(Duration::from_secs(1))
            .peer_update_interval(Duration::from_secs(10))
            .build();
        assert!(config.validate_create().is_ok());
    }

    #[test]
    fn test_rejections_carry_fixed_messages() {
        let cases: [(PoisonPillConfigBuilder, &str); 6] = [
            (
                PoisonPillConfigBuilder::default().peer_api_server_timeout(Duration::from_millis(5)),
                "PeerApiServerTimeout 10ms",
            ),
            (
                PoisonPillConfigBuilder::default().api_server_timeout(Duration::from_millis(9)),
                "ApiServerTimeout 10ms",
            ),
            (
                PoisonPillConfigBuilder::default().peer_dial_timeout(Duration::from_millis(0)),
                "PeerDialTimeout 10ms",
            ),
            (
                PoisonPillConfigBuilder::default().peer_request_timeout(Duration::from_nanos(10)),
                "PeerRequestTimeout 10ms",
            ),
            (
                PoisonPillConfigBuilder::default().api_check_interval(Duration::from_millis(999)),
                "ApiCheckInterval can't be less than 1s",
            ),
            (
                PoisonPillConfigBuilder::default().peer_update_interval(Duration::from_secs(9)),
                "PeerUpdateInterval can't be less than 10s",
            ),
        ];

        for (builder, expected) in cases {
            let err = builder.build().validate_create().unwrap_err();
            assert_eq!(err.to_string(), expected);
            assert_eq!(err.reason(), "DurationBelowMinimum");
        }
    }

    #[test]
    fn test_only_first_violation_reported() {
        let config = PoisonPillConfigBuilder::default()
            .api_server_timeout(Duration::from_millis(1))
            .peer_update_interval(Duration::from_secs(1))
            .build();

        match config.validate_create() {
            Err(ValidationError::BelowMinimum { message, given_ms, .. }) => {
                assert_eq!(message, "ApiServerTimeout 10ms");
                assert_eq!(given_ms, 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_delete_ignores_fields() {
        let config = PoisonPillConfigBuilder::default()
            .peer_update_interval(Duration::from_secs(1))
            .build();
        let ctx = ValidationContext {
            resource: &config,
            old_resource: None,
            operation: Operation::Delete,
        };
        assert!(validate_all(&ctx).is_ok());
    }
}

mod registration_tests {
    use poison_pill_webhook::webhooks::certs::{WEBHOOK_CERT_NAME, WEBHOOK_KEY_NAME};
    use poison_pill_webhook::{
        FsCertificateProvider, VALIDATE_PATH, WebhookError, WebhookServer,
        setup_webhook_with_server,
    };

    #[test]
    fn test_injected_certs_configure_server() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(WEBHOOK_CERT_NAME), "cert").unwrap();
        std::fs::write(dir.path().join(WEBHOOK_KEY_NAME), "key").unwrap();

        let mut server = WebhookServer::default();
        setup_webhook_with_server(&mut server, &FsCertificateProvider::in_dir(dir.path()))
            .unwrap();

        assert_eq!(server.cert_dir, dir.path());
        assert_eq!(server.cert_name, WEBHOOK_CERT_NAME);
        assert_eq!(server.key_name, WEBHOOK_KEY_NAME);
        assert!(server.registered_paths().any(|p| p == VALIDATE_PATH));
    }

    #[test]
    fn test_missing_certs_not_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let mut server = WebhookServer::default();
        let result =
            setup_webhook_with_server(&mut server, &FsCertificateProvider::in_dir(dir.path()));

        assert!(result.is_ok());
        assert_eq!(server, {
            let mut expected = WebhookServer::default();
            expected.register(VALIDATE_PATH).unwrap();
            expected
        });
    }

    #[test]
    fn test_registration_failure_returned() {
        let mut server = WebhookServer::default();
        server.register(VALIDATE_PATH).unwrap();

        let result = setup_webhook_with_server(&mut server, &FsCertificateProvider::default());
        assert!(matches!(result, Err(WebhookError::AlreadyRegistered(_))));
    }
}

mod duration_tests {
    use poison_pill_webhook::duration::{Duration, ParseDurationError, parse_duration};

    #[test]
    fn test_kubernetes_style_values() {
        assert_eq!(parse_duration("15m").unwrap(), Duration::from_mins(15));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_mins(90));
        assert_eq!(parse_duration("300ms").unwrap(), Duration::from_millis(300));
        assert_eq!(parse_duration("-2s").unwrap(), Duration::from_secs(-2));
    }

    #[test]
    fn test_rejected_values() {
        assert_eq!(parse_duration(""), Err(ParseDurationError::Empty));
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("5x").is_err());
        assert!(parse_duration("1 s").is_err());
    }
}

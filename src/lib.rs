//! poison-pill-webhook library crate
//!
//! Validating admission webhook for `PoisonPillConfig` resources. Exports the
//! CRD definition, the Kubernetes duration type its fields use, the
//! validator and webhook server, and the health/metrics server.

pub mod crd;
pub mod duration;
pub mod health;
pub mod webhooks;

pub use health::HealthState;
pub use webhooks::{
    FsCertificateProvider, VALIDATE_PATH, WEBHOOK_PORT, WebhookError, WebhookServer,
    WebhookState, setup_webhook_with_server,
};

//! Webhook module for validating admission requests.
//!
//! - `validator`: lifecycle hooks (create/update/delete) for PoisonPillConfig
//! - `policies`: operation dispatch and the minimum duration policy
//! - `registrar`: certificate wiring and path registration
//! - `server`: the TLS admission server

pub mod certs;
pub mod error;
pub mod policies;
pub mod registrar;
mod server;
pub mod validator;

pub use certs::{CertificateProvider, FsCertificateProvider, InjectedCertificates};
pub use error::ValidationError;
pub use policies::{ValidationContext, validate_all};
pub use registrar::{VALIDATE_PATH, setup_webhook_with_server};
pub use server::{
    DEFAULT_CERT_DIR, DEFAULT_CERT_NAME, DEFAULT_KEY_NAME, WEBHOOK_PORT, WebhookError,
    WebhookServer, WebhookState,
};
pub use validator::Validator;

// Re-export kube-rs admission types for contract testing
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};

//! Admission webhook server.
//!
//! Provides HTTPS endpoints for Kubernetes admission webhooks. Paths are
//! registered on a [`WebhookServer`] (see `registrar`), which is then served
//! with the certificate and key from its `cert_dir`.
//!
//! Without OLM-injected certificates the server falls back to the serving
//! certificate directory used by cert-manager style deployments,
//! `/tmp/k8s-webhook-server/serving-certs/tls.{crt,key}`.

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use axum_server::tls_rustls::RustlsConfig;
use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::crd::PoisonPillConfig;
use crate::health::HealthState;
use crate::webhooks::policies::{ValidationContext, validate_all};

/// Default directory holding the webhook serving certificate
pub const DEFAULT_CERT_DIR: &str = "/tmp/k8s-webhook-server/serving-certs";
/// Default serving certificate file name
pub const DEFAULT_CERT_NAME: &str = "tls.crt";
/// Default serving key file name
pub const DEFAULT_KEY_NAME: &str = "tls.key";
/// Default webhook server port
pub const WEBHOOK_PORT: u16 = 9443;

/// HTTP status code reported in the Status of a denied request
const DENIED_CODE: u16 = 403;
/// Denial reason for requests whose object is missing or does not decode
const REASON_INVALID_REQUEST: &str = "InvalidRequest";

/// Errors that can occur when registering or running the webhook server
#[derive(Error, Debug)]
pub enum WebhookError {
    /// A handler is already registered for this path
    #[error("webhook path already registered: {0}")]
    AlreadyRegistered(String),

    /// TLS configuration error
    #[error("TLS configuration error: {0}")]
    TlsConfig(String),

    /// Server error
    #[error("Webhook server error: {0}")]
    Server(String),
}

/// Webhook server configuration and registered validation paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebhookServer {
    pub port: u16,
    pub cert_dir: PathBuf,
    pub cert_name: String,
    pub key_name: String,
    paths: BTreeSet<String>,
}

impl Default for WebhookServer {
    fn default() -> Self {
        Self {
            port: WEBHOOK_PORT,
            cert_dir: PathBuf::from(DEFAULT_CERT_DIR),
            cert_name: DEFAULT_CERT_NAME.to_string(),
            key_name: DEFAULT_KEY_NAME.to_string(),
            paths: BTreeSet::new(),
        }
    }
}

impl WebhookServer {
    /// Register a PoisonPillConfig validation handler at `path`
    pub fn register(&mut self, path: &str) -> Result<(), WebhookError> {
        if !self.paths.insert(path.to_string()) {
            return Err(WebhookError::AlreadyRegistered(path.to_string()));
        }
        debug!(path = %path, "Registered validating webhook");
        Ok(())
    }

    pub fn registered_paths(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn cert_path(&self) -> PathBuf {
        self.cert_dir.join(&self.cert_name)
    }

    pub fn key_path(&self) -> PathBuf {
        self.cert_dir.join(&self.key_name)
    }

    /// Create the webhook router with one route per registered path
    pub fn router(&self, state: Arc<WebhookState>) -> Router {
        self.paths
            .iter()
            .fold(Router::<Arc<WebhookState>>::new(), |router, path| {
                router.route(path, post(validate_poisonpillconfig))
            })
            .with_state(state)
    }

    /// Load the serving certificate and key from `cert_dir` (PEM format)
    pub async fn tls_config(&self) -> Result<RustlsConfig, WebhookError> {
        RustlsConfig::from_pem_file(self.cert_path(), self.key_path())
            .await
            .map_err(|e| WebhookError::TlsConfig(e.to_string()))
    }

    /// Serve the registered webhooks with an already loaded TLS config
    ///
    /// Binds to 0.0.0.0 on the configured port.
    pub async fn serve(
        self,
        state: Arc<WebhookState>,
        config: RustlsConfig,
    ) -> Result<(), WebhookError> {
        let app = self.router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!(
            port = self.port,
            cert_dir = %self.cert_dir.display(),
            "Webhook server listening with TLS"
        );

        axum_server::bind_rustls(addr, config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| WebhookError::Server(e.to_string()))?;

        Ok(())
    }

    /// Load TLS and serve the registered webhooks
    pub async fn run(self, state: Arc<WebhookState>) -> Result<(), WebhookError> {
        let config = self.tls_config().await?;
        self.serve(state, config).await
    }
}

/// Shared state for webhook handlers
#[derive(Default)]
pub struct WebhookState {
    pub health: Option<Arc<HealthState>>,
}

impl WebhookState {
    pub fn new(health: Option<Arc<HealthState>>) -> Self {
        Self { health }
    }

    fn record(&self, operation: &Operation, denial_reason: Option<&str>) {
        if let Some(health) = &self.health {
            health
                .metrics
                .record_admission(operation_label(operation), denial_reason.is_none());
            if let Some(reason) = denial_reason {
                health.metrics.record_denial(reason);
            }
        }
    }
}

fn operation_label(operation: &Operation) -> &'static str {
    match operation {
        Operation::Create => "CREATE",
        Operation::Update => "UPDATE",
        Operation::Delete => "DELETE",
        Operation::Connect => "CONNECT",
    }
}

/// Create a denial response carrying a machine-readable reason.
fn deny_with_reason(
    request: &AdmissionRequest<DynamicObject>,
    message: &str,
    reason: &str,
) -> AdmissionReview<DynamicObject> {
    let mut response = AdmissionResponse::from(request).deny(message);
    response.result.reason = reason.to_string();
    response.result.code = DENIED_CODE;
    response.into_review()
}

/// Decode an admitted object into a typed PoisonPillConfig
fn to_config(object: &DynamicObject) -> Result<PoisonPillConfig, serde_json::Error> {
    serde_json::to_value(object).and_then(serde_json::from_value)
}

/// PoisonPillConfig admission webhook handler
///
/// Objects arrive untyped so that a spec which fails to decode (for example a
/// malformed duration) still gets an AdmissionResponse instead of an HTTP
/// rejection from the extractor.
async fn validate_poisonpillconfig(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<AdmissionReview<DynamicObject>>,
) -> impl IntoResponse {
    let request: AdmissionRequest<DynamicObject> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to extract admission request");
            return (
                StatusCode::BAD_REQUEST,
                Json(
                    AdmissionResponse::invalid(format!("Invalid AdmissionReview: {}", e))
                        .into_review(),
                ),
            );
        }
    };

    let uid = &request.uid;
    debug!(
        uid = %uid,
        operation = ?request.operation,
        namespace = ?request.namespace,
        name = ?request.name,
        "Processing admission request"
    );

    // DELETE is never rejected; the stored object (in oldObject) is only run
    // through the delete hook when it decodes
    if request.operation == Operation::Delete {
        let stored = request
            .old_object
            .as_ref()
            .or(request.object.as_ref())
            .and_then(|obj| to_config(obj).ok());
        if let Some(resource) = &stored {
            let ctx = ValidationContext {
                resource,
                old_resource: None,
                operation: Operation::Delete,
            };
            if let Err(e) = validate_all(&ctx) {
                warn!(uid = %uid, error = %e, "Delete hook failed, allowing anyway");
            }
        }
        info!(uid = %uid, "Admission request allowed (DELETE)");
        state.record(&request.operation, None);
        return (
            StatusCode::OK,
            Json(AdmissionResponse::from(&request).into_review()),
        );
    }

    let resource = match request.object.as_ref().map(to_config) {
        Some(Ok(resource)) => resource,
        Some(Err(e)) => {
            let message = format!("Invalid PoisonPillConfig: {}", e);
            warn!(uid = %uid, message = %message, "Admission request denied");
            state.record(&request.operation, Some(REASON_INVALID_REQUEST));
            return (
                StatusCode::OK,
                Json(deny_with_reason(&request, &message, REASON_INVALID_REQUEST)),
            );
        }
        None => {
            error!(uid = %uid, "Missing object in request");
            state.record(&request.operation, Some(REASON_INVALID_REQUEST));
            return (
                StatusCode::OK,
                Json(deny_with_reason(
                    &request,
                    "Missing object in request",
                    REASON_INVALID_REQUEST,
                )),
            );
        }
    };

    // The previous object is not validated, so one that no longer decodes is ignored
    let old_resource = match request.operation {
        Operation::Update => request
            .old_object
            .as_ref()
            .and_then(|obj| to_config(obj).ok()),
        _ => None,
    };

    let ctx = ValidationContext {
        resource: &resource,
        old_resource: old_resource.as_ref(),
        operation: request.operation.clone(),
    };

    if let Err(e) = validate_all(&ctx) {
        let reason = e.reason();
        let message = e.to_string();
        warn!(uid = %uid, reason = %reason, message = %message, "Admission request denied");
        state.record(&request.operation, Some(reason));
        return (
            StatusCode::OK,
            Json(deny_with_reason(&request, &message, reason)),
        );
    }

    info!(uid = %uid, "Admission request allowed");
    state.record(&request.operation, None);
    (
        StatusCode::OK,
        Json(AdmissionResponse::from(&request).into_review()),
    )
}

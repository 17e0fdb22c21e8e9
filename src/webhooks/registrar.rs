//! Webhook registration for PoisonPillConfig.
//!
//! Wires OLM-injected certificates into the webhook server when present and
//! registers the validation path for the resource.

use tracing::info;

use crate::webhooks::certs::CertificateProvider;
use crate::webhooks::server::{WebhookError, WebhookServer};

/// Path the ValidatingWebhookConfiguration points at
pub const VALIDATE_PATH: &str = "/validate-poison-pill-medik8s-io-v1alpha1-poisonpillconfig";

/// Register the PoisonPillConfig validating webhook on `server`.
///
/// If `certs` reports an injected certificate/key pair, the server's
/// `cert_dir`, `cert_name` and `key_name` are pointed at it. Otherwise the
/// server keeps its TLS settings; missing certificates are not an error.
pub fn setup_webhook_with_server(
    server: &mut WebhookServer,
    certs: &dyn CertificateProvider,
) -> Result<(), WebhookError> {
    match certs.injected_certificates() {
        Some(injected) => {
            info!(cert_dir = %injected.cert_dir.display(), "Using OLM injected webhook certs");
            server.cert_dir = injected.cert_dir;
            server.cert_name = injected.cert_name;
            server.key_name = injected.key_name;
        }
        None => info!("OLM injected certs for webhooks not found"),
    }

    server.register(VALIDATE_PATH)
}

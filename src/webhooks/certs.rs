//! Webhook serving certificates injected by the Operator Lifecycle Manager.
//!
//! When the operator is installed through OLM, a certificate and key for the
//! webhook service are mounted at [`WEBHOOK_CERT_DIR`]. Their presence is
//! probed through a [`CertificateProvider`] so the registrar can be tested
//! without touching the real filesystem layout.

use std::path::PathBuf;

/// Directory where OLM mounts the webhook serving certificate
pub const WEBHOOK_CERT_DIR: &str = "/apiserver.local.config/certificates";
/// File name of the OLM-injected certificate
pub const WEBHOOK_CERT_NAME: &str = "apiserver.crt";
/// File name of the OLM-injected private key
pub const WEBHOOK_KEY_NAME: &str = "apiserver.key";

/// Location of an injected certificate/key pair
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InjectedCertificates {
    pub cert_dir: PathBuf,
    pub cert_name: String,
    pub key_name: String,
}

/// Source of externally injected webhook certificates
pub trait CertificateProvider {
    /// Returns the certificate location if both certificate and key are present
    fn injected_certificates(&self) -> Option<InjectedCertificates>;
}

/// Probes a fixed directory for a certificate and key file.
#[derive(Clone, Debug)]
pub struct FsCertificateProvider {
    cert_dir: PathBuf,
    cert_name: String,
    key_name: String,
}

impl Default for FsCertificateProvider {
    /// Probe the OLM certificate location
    fn default() -> Self {
        Self::new(WEBHOOK_CERT_DIR, WEBHOOK_CERT_NAME, WEBHOOK_KEY_NAME)
    }
}

impl FsCertificateProvider {
    pub fn new(
        cert_dir: impl Into<PathBuf>,
        cert_name: impl Into<String>,
        key_name: impl Into<String>,
    ) -> Self {
        Self {
            cert_dir: cert_dir.into(),
            cert_name: cert_name.into(),
            key_name: key_name.into(),
        }
    }

    /// Probe `dir` for the OLM certificate and key file names
    pub fn in_dir(cert_dir: impl Into<PathBuf>) -> Self {
        Self::new(cert_dir, WEBHOOK_CERT_NAME, WEBHOOK_KEY_NAME)
    }
}

impl CertificateProvider for FsCertificateProvider {
    fn injected_certificates(&self) -> Option<InjectedCertificates> {
        let found = [&self.cert_name, &self.key_name]
            .iter()
            .all(|name| self.cert_dir.join(name).exists());

        found.then(|| InjectedCertificates {
            cert_dir: self.cert_dir.clone(),
            cert_name: self.cert_name.clone(),
            key_name: self.key_name.clone(),
        })
    }
}

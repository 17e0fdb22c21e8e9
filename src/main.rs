//! poison-pill-webhook - validating admission webhook for PoisonPillConfig.
//!
//! This is the main entry point that:
//! - Initializes structured logging
//! - Starts the health server
//! - Registers the PoisonPillConfig webhook, picking up OLM-injected certs
//! - Serves admission requests until shutdown

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{error, info, warn};

use poison_pill_webhook::health::{HealthState, run_health_server};
use poison_pill_webhook::{
    FsCertificateProvider, WebhookServer, WebhookState, setup_webhook_with_server,
};

/// Grace period for in-flight admission requests to complete during shutdown
const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 2;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("poison_pill_webhook=info".parse()?)
                .add_directive("kube=info".parse()?),
        )
        .json()
        .init();

    // Pin the process-wide rustls crypto provider before any TLS config is built
    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider already installed");
    }

    let namespace = std::env::var("POD_NAMESPACE").unwrap_or_else(|_| {
        warn!("POD_NAMESPACE not set, using 'default'");
        "default".to_string()
    });
    info!(namespace = %namespace, "Starting poison-pill-webhook");

    // Create shared health state
    let health_state = Arc::new(HealthState::new());

    // Start health server immediately so liveness probes pass during setup
    let health_handle = {
        let health_state = health_state.clone();
        tokio::spawn(async move { run_health_server(health_state).await })
    };

    let mut server = WebhookServer::default();
    setup_webhook_with_server(&mut server, &FsCertificateProvider::default())?;

    // Readiness must not be reported before the serving certificate loads
    let tls_config = server.tls_config().await.inspect_err(|e| {
        error!("Failed to load webhook serving certificate: {}", e);
    })?;

    let webhook_handle = {
        let state = Arc::new(WebhookState::new(Some(health_state.clone())));
        tokio::spawn(async move { server.serve(state, tls_config).await })
    };

    health_state.set_ready(true).await;

    tokio::select! {
        result = webhook_handle => {
            health_state.set_ready(false).await;
            match result {
                Ok(Ok(())) => {
                    error!("Webhook server stopped unexpectedly");
                    return Err("webhook server stopped unexpectedly".into());
                }
                Ok(Err(e)) => {
                    error!("Webhook server error: {}", e);
                    return Err(e.into());
                }
                Err(e) => {
                    error!("Webhook server task panicked: {}", e);
                    return Err(e.into());
                }
            }
        }
        result = health_handle => {
            health_state.set_ready(false).await;
            match result {
                Ok(Ok(())) => {
                    error!("Health server stopped unexpectedly");
                    return Err("health server stopped unexpectedly".into());
                }
                Ok(Err(e)) => {
                    error!("Health server error: {}", e);
                    return Err(e.into());
                }
                Err(e) => {
                    error!("Health server task panicked: {}", e);
                    return Err(e.into());
                }
            }
        }
        // Handle graceful shutdown on SIGTERM or SIGINT
        _ = shutdown_signal() => {
            info!("Received shutdown signal, initiating graceful shutdown...");

            // Mark as not ready so the Service stops routing admission requests here
            health_state.set_ready(false).await;
            info!("Marked webhook as not ready");

            tokio::time::sleep(Duration::from_secs(SHUTDOWN_GRACE_PERIOD_SECS)).await;
            info!("Grace period complete, shutting down");
        }
    }

    info!("Webhook stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
///
/// Note: Signal handler setup failures are fatal - the webhook cannot shut down
/// gracefully without them.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

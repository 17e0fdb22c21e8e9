//! Test fixtures and builder patterns for PoisonPillConfig.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use poison_pill_webhook::crd::{PoisonPillConfig, PoisonPillConfigSpec};
use poison_pill_webhook::duration::Duration;
use poison_pill_webhook::webhooks::policies::time_ranges::TimeField;

/// Builder for creating PoisonPillConfig test fixtures.
///
/// # Example
/// ```
/// let config = PoisonPillConfigBuilder::new("poison-pill-config")
///     .namespace("openshift-operators")
///     .api_check_interval(Duration::from_secs(15))
///     .build();
/// ```
#[derive(Clone, Debug)]
pub struct PoisonPillConfigBuilder {
    name: String,
    namespace: Option<String>,
    spec: PoisonPillConfigSpec,
}

#[allow(dead_code)]
impl PoisonPillConfigBuilder {
    /// Create a new builder with the given resource name and no durations set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            spec: PoisonPillConfigSpec::default(),
        }
    }

    /// Set the namespace for the resource.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set every duration to the agent's shipped defaults.
    pub fn with_agent_defaults(self) -> Self {
        self.peer_api_server_timeout(Duration::from_secs(5))
            .api_server_timeout(Duration::from_secs(5))
            .peer_dial_timeout(Duration::from_secs(5))
            .peer_request_timeout(Duration::from_secs(5))
            .api_check_interval(Duration::from_secs(15))
            .peer_update_interval(Duration::from_mins(15))
    }

    pub fn peer_api_server_timeout(mut self, value: Duration) -> Self {
        self.spec.peer_api_server_timeout = Some(value);
        self
    }

    pub fn api_server_timeout(mut self, value: Duration) -> Self {
        self.spec.api_server_timeout = Some(value);
        self
    }

    pub fn peer_dial_timeout(mut self, value: Duration) -> Self {
        self.spec.peer_dial_timeout = Some(value);
        self
    }

    pub fn peer_request_timeout(mut self, value: Duration) -> Self {
        self.spec.peer_request_timeout = Some(value);
        self
    }

    pub fn api_check_interval(mut self, value: Duration) -> Self {
        self.spec.api_check_interval = Some(value);
        self
    }

    pub fn peer_update_interval(mut self, value: Duration) -> Self {
        self.spec.peer_update_interval = Some(value);
        self
    }

    /// Set the duration of a validated field by its table entry.
    pub fn field(self, field: TimeField, value: Duration) -> Self {
        match field {
            TimeField::PeerApiServerTimeout => self.peer_api_server_timeout(value),
            TimeField::ApiServerTimeout => self.api_server_timeout(value),
            TimeField::PeerDialTimeout => self.peer_dial_timeout(value),
            TimeField::PeerRequestTimeout => self.peer_request_timeout(value),
            TimeField::ApiCheckInterval => self.api_check_interval(value),
            TimeField::PeerUpdateInterval => self.peer_update_interval(value),
        }
    }

    /// Build the PoisonPillConfig.
    pub fn build(self) -> PoisonPillConfig {
        PoisonPillConfig {
            metadata: ObjectMeta {
                name: Some(self.name),
                namespace: self.namespace,
                ..Default::default()
            },
            spec: self.spec,
        }
    }
}

impl Default for PoisonPillConfigBuilder {
    fn default() -> Self {
        Self::new("poison-pill-config")
    }
}

/// Create a PoisonPillConfig with every duration at the agent defaults.
#[allow(dead_code)]
pub fn default_config(name: &str) -> PoisonPillConfig {
    PoisonPillConfigBuilder::new(name)
        .namespace("default")
        .with_agent_defaults()
        .build()
}

//! PoisonPillConfig Custom Resource Definition.
//!
//! Holds the timing knobs shared by every poison-pill agent in the cluster:
//! how long to wait on the API server and on peers, and how often to poll.
//! Each field is optional; omitted fields keep the agent's built-in default.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::duration::Duration;

/// PoisonPillConfig is the configuration object for poison-pill agents.
///
/// Example:
/// ```yaml
/// apiVersion: poison-pill.medik8s.io/v1alpha1
/// kind: PoisonPillConfig
/// metadata:
///   name: poison-pill-config
/// spec:
///   peerApiServerTimeout: 5s
///   apiServerTimeout: 5s
///   peerDialTimeout: 5s
///   peerRequestTimeout: 5s
///   apiCheckInterval: 15s
///   peerUpdateInterval: 15m
/// ```
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "poison-pill.medik8s.io",
    version = "v1alpha1",
    kind = "PoisonPillConfig",
    plural = "poisonpillconfigs",
    shortname = "ppc",
    namespaced,
    printcolumn = r#"{"name":"ApiCheckInterval", "type":"string", "jsonPath":".spec.apiCheckInterval"}"#,
    printcolumn = r#"{"name":"PeerUpdateInterval", "type":"string", "jsonPath":".spec.peerUpdateInterval"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct PoisonPillConfigSpec {
    /// Timeout for a peer's call to the API server on this node's behalf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_api_server_timeout: Option<Duration>,

    /// Timeout for this node's own calls to the API server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_server_timeout: Option<Duration>,

    /// Timeout for establishing a connection to a peer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_dial_timeout: Option<Duration>,

    /// Timeout for a single request to a peer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_request_timeout: Option<Duration>,

    /// How often API server connectivity is checked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_check_interval: Option<Duration>,

    /// How often the peer list is refreshed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_update_interval: Option<Duration>,
}

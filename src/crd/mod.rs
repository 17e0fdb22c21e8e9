//! Custom Resource Definitions (CRDs) for poison-pill-webhook.
//!
//! - `PoisonPillConfig`: Timing configuration shared by poison-pill agents

mod poison_pill_config;

pub use poison_pill_config::*;

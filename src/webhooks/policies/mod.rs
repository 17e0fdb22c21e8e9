//! Validation policies for PoisonPillConfig admission webhooks.
//!
//! Requests are routed to the [`Validator`] hook matching their operation:
//! - CREATE / UPDATE: minimum duration policy (`time_ranges`)
//! - DELETE: always allowed
//! - CONNECT: not validated

pub mod time_ranges;

use kube::core::admission::Operation;

use crate::crd::PoisonPillConfig;
use crate::webhooks::error::Result;
use crate::webhooks::validator::Validator;

/// Context for validation
pub struct ValidationContext<'a> {
    /// The resource being validated (the stored object for DELETE)
    pub resource: &'a PoisonPillConfig,
    /// The old resource (for UPDATE operations)
    pub old_resource: Option<&'a PoisonPillConfig>,
    /// The admission operation
    pub operation: Operation,
}

/// Run the validator hook for the request's operation
pub fn validate_all(ctx: &ValidationContext<'_>) -> Result<()> {
    match ctx.operation {
        Operation::Create => ctx.resource.validate_create(),
        Operation::Update => match ctx.old_resource {
            Some(old) => ctx.resource.validate_update(old),
            // The API server always sends oldObject on UPDATE; still enforce minimums
            None => time_ranges::validate_times(ctx.resource),
        },
        Operation::Delete => ctx.resource.validate_delete(),
        Operation::Connect => Ok(()),
    }
}

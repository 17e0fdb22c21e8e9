//! Admission lifecycle hooks.
//!
//! A type implementing [`Validator`] gets a validating webhook registered for
//! it. CREATE and UPDATE run the minimum duration policy; DELETE is always
//! allowed.

use kube::ResourceExt;
use tracing::info;

use crate::crd::PoisonPillConfig;
use crate::webhooks::error::Result;
use crate::webhooks::policies::time_ranges::validate_times;

/// Validation hooks invoked by the admission server
pub trait Validator {
    /// Called for CREATE requests
    fn validate_create(&self) -> Result<()>;

    /// Called for UPDATE requests with the currently stored object
    fn validate_update(&self, old: &Self) -> Result<()>;

    /// Called for DELETE requests
    fn validate_delete(&self) -> Result<()>;
}

impl Validator for PoisonPillConfig {
    fn validate_create(&self) -> Result<()> {
        info!(name = %self.name_any(), "validate create");
        validate_times(self)
    }

    fn validate_update(&self, _old: &Self) -> Result<()> {
        info!(name = %self.name_any(), "validate update");
        validate_times(self)
    }

    fn validate_delete(&self) -> Result<()> {
        info!(name = %self.name_any(), "validate delete");
        Ok(())
    }
}

//! Readiness probes for backing services.

use async_trait::async_trait;

use crate::errors::DomainError;

/// A dependency that can report whether it is reachable
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Short name used in health reports, e.g. `"redis"`
    fn name(&self) -> &'static str;

    async fn check(&self) -> Result<(), DomainError>;
}

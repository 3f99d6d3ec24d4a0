//! Provider contract for fare sources.

use crate::sro::Sro;
use crate::trips::Trips;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider rejected the request: {0}")]
    BadRequest(String),
    #[error("upstream failure: {0}")]
    Upstream(String),
    #[error("provider is not available")]
    Unavailable,
}

/// A single fare source (one GDS connection, one partner feed, ...).
///
/// `search` runs inside a spawned task that may be aborted when the
/// request deadline fires, so implementations must not hold state that
/// is corrupted by cancellation at an await point.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable name used in logs, metrics tags, and result attribution.
    fn name(&self) -> &str;

    /// Whether the provider should be queried at all for this process.
    /// Unavailable providers are skipped without counting as failures.
    fn is_available(&self) -> bool {
        true
    }

    async fn search(&self, request: &Sro) -> Result<Trips, ProviderError>;
}

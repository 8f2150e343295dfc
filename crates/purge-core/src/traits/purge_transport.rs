// # Purge Transport Trait
//
// Defines the interface for delivering purge requests to the cache service.
//
// ## Implementations
//
// - HTTP: `purge-transport-http` crate

use async_trait::async_trait;

use crate::request::{PurgeRequest, PurgeResponse};

/// Trait for purge transport implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Constraints
///
/// A transport performs exactly one exchange per [`PurgeTransport::send`]
/// call. It must not retry, back off, spawn tasks or cache responses.
/// Whether a failure matters is decided by the caller.
#[async_trait]
pub trait PurgeTransport: Send + Sync {
    /// Send a purge request
    ///
    /// # Returns
    ///
    /// - `Ok(PurgeResponse)`: The service answered with a success status
    /// - `Err(Error)`: Connection failure, timeout, or an error status
    async fn send(&self, request: &PurgeRequest) -> Result<PurgeResponse, crate::Error>;

    /// Get the transport name (for logging/debugging)
    fn transport_name(&self) -> &'static str;
}

/// Helper trait for constructing transports from configuration
pub trait PurgeTransportFactory: Send + Sync {
    /// Create a PurgeTransport instance from configuration
    fn create(
        &self,
        config: &crate::config::TransportConfig,
    ) -> Result<Box<dyn PurgeTransport>, crate::Error>;
}

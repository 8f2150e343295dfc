//! Plugin-based transport registry
//!
//! The registry lets transports be registered at runtime and built from
//! [`TransportConfig`], without a hardcoded match over transport crates.
//!
//! ## Registration
//!
//! Transport crates expose a `register` function:
//!
//! ```rust,ignore
//! // In purge-transport-http
//! pub fn register(registry: &TransportRegistry) {
//!     registry.register_transport("http", Box::new(HttpTransportFactory));
//! }
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::config::TransportConfig;
use crate::error::{Error, Result};
use crate::traits::{PurgeTransport, PurgeTransportFactory};

/// Registry of transport factories keyed by type name
#[derive(Default)]
pub struct TransportRegistry {
    transports: RwLock<HashMap<String, Box<dyn PurgeTransportFactory>>>,
}

impl TransportRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transport factory
    ///
    /// Registering the same name twice replaces the earlier factory.
    pub fn register_transport(
        &self,
        name: impl Into<String>,
        factory: Box<dyn PurgeTransportFactory>,
    ) {
        self.transports
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), factory);
    }

    /// Create a transport from configuration
    ///
    /// # Errors
    ///
    /// `Error::Config` if the transport type is not registered, or whatever
    /// the factory returns.
    pub fn create_transport(&self, config: &TransportConfig) -> Result<Box<dyn PurgeTransport>> {
        let transport_type = config.type_name();
        let transports = self
            .transports
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let factory = transports
            .get(transport_type)
            .ok_or_else(|| Error::config(format!("Unknown transport type: {}", transport_type)))?;

        factory.create(config)
    }

    /// List all registered transport types
    pub fn list_transports(&self) -> Vec<String> {
        self.transports
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Check if a transport type is registered
    pub fn has_transport(&self, name: &str) -> bool {
        self.transports
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }
}

//! Configuration types for the purge notifier
//!
//! All configuration is passed explicitly. Nothing in this crate reads the
//! process environment; the daemon maps environment variables onto these
//! structures.

use serde::{Deserialize, Serialize};
use url::Url;

/// Purge path used by the cache service when none is configured
pub const DEFAULT_PURGE_PATH: &str = "/__wp_cache/purge";

/// Header carrying the shared purge key
pub const DEFAULT_KEY_HEADER: &str = "X-Purge-Key";

/// Main purge configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct PurgeConfig {
    /// Public base URL of the site (e.g. "https://example.com")
    pub purge_base_url: String,

    /// Path segment of the purge endpoint (e.g. "/purge")
    #[serde(default = "default_purge_path")]
    pub purge_path: String,

    /// Shared secret sent with every purge request
    pub purge_key: String,

    /// Name of the header carrying the purge key
    #[serde(default = "default_key_header")]
    pub key_header: String,

    /// Transport configuration
    #[serde(default)]
    pub transport: TransportConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

// The purge key must never reach logs
impl std::fmt::Debug for PurgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PurgeConfig")
            .field("purge_base_url", &self.purge_base_url)
            .field("purge_path", &self.purge_path)
            .field("purge_key", &"<REDACTED>")
            .field("key_header", &self.key_header)
            .field("transport", &self.transport)
            .field("engine", &self.engine)
            .finish()
    }
}

impl PurgeConfig {
    /// Create a new configuration with default transport and engine settings
    pub fn new(
        purge_base_url: impl Into<String>,
        purge_path: impl Into<String>,
        purge_key: impl Into<String>,
    ) -> Self {
        Self {
            purge_base_url: purge_base_url.into(),
            purge_path: purge_path.into(),
            purge_key: purge_key.into(),
            key_header: default_key_header(),
            transport: TransportConfig::default(),
            engine: EngineConfig::default(),
        }
    }

    /// Set the header name carrying the purge key
    pub fn with_key_header(mut self, key_header: impl Into<String>) -> Self {
        self.key_header = key_header.into();
        self
    }

    /// Set the transport configuration
    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    /// Set the engine configuration
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.purge_base_url.is_empty() {
            return Err(crate::Error::config("Purge base URL cannot be empty"));
        }

        let base = Url::parse(&self.purge_base_url).map_err(|e| {
            crate::Error::config(format!(
                "Purge base URL '{}' is invalid: {}",
                self.purge_base_url, e
            ))
        })?;

        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(crate::Error::config(format!(
                "Purge base URL must use http or https, got '{}'",
                base.scheme()
            )));
        }

        if base.query().is_some() || base.fragment().is_some() {
            return Err(crate::Error::config(
                "Purge base URL cannot carry a query or fragment",
            ));
        }

        if !self.purge_path.is_empty() && !self.purge_path.starts_with('/') {
            return Err(crate::Error::config(format!(
                "Purge path must start with '/', got '{}'",
                self.purge_path
            )));
        }

        if self.purge_key.is_empty() {
            return Err(crate::Error::config("Purge key cannot be empty"));
        }

        if self.key_header.is_empty() {
            return Err(crate::Error::config("Purge key header name cannot be empty"));
        }

        self.transport.validate()?;
        self.engine.validate()?;

        Ok(())
    }
}

/// Transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportConfig {
    /// Plain HTTP(S) transport
    Http {
        /// Request timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },

    /// Custom transport
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl TransportConfig {
    /// Validate the transport configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            TransportConfig::Http { timeout_secs } => {
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("HTTP transport timeout must be > 0"));
                }
                Ok(())
            }
            TransportConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom transport factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom transport config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the transport type name
    pub fn type_name(&self) -> &str {
        match self {
            TransportConfig::Http { .. } => "http",
            TransportConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig::Http {
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of the monitoring event channel
    ///
    /// When full, new events are dropped (with a warning log).
    ///
    /// Default: 1000 events
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl EngineConfig {
    fn validate(&self) -> Result<(), crate::Error> {
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_purge_path() -> String {
    DEFAULT_PURGE_PATH.to_string()
}

fn default_key_header() -> String {
    DEFAULT_KEY_HEADER.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_event_channel_capacity() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> PurgeConfig {
        PurgeConfig::new("https://example.com", "/purge", "secret123")
    }

    #[test]
    fn test_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_empty_key_rejected() {
        let config = PurgeConfig::new("https://example.com", "/purge", "");
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_non_http_base_rejected() {
        let config = PurgeConfig::new("ftp://example.com", "/purge", "k");
        assert!(config.validate().is_err());

        let config = PurgeConfig::new("not a url", "/purge", "k");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_relative_purge_path_rejected() {
        let config = PurgeConfig::new("https://example.com", "purge", "k");
        assert!(config.validate().is_err());

        let config = PurgeConfig::new("https://example.com", "", "k");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = valid().with_transport(TransportConfig::Http { timeout_secs: 0 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", valid());
        assert!(!rendered.contains("secret123"));
        assert!(rendered.contains("<REDACTED>"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: PurgeConfig = serde_json::from_str(
            r#"{ "purge_base_url": "https://example.com", "purge_key": "k" }"#,
        )
        .unwrap();

        assert_eq!(config.purge_path, DEFAULT_PURGE_PATH);
        assert_eq!(config.key_header, DEFAULT_KEY_HEADER);
        assert_eq!(config.transport.type_name(), "http");
        assert_eq!(config.engine.event_channel_capacity, 1000);
    }
}

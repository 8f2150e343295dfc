// # HTTP Purge Transport
//
// This crate delivers purge requests to the cache service over HTTP(S).
//
// ## Behavior
//
// - Makes exactly ONE HTTP request per `send` call
// - Applies a request timeout (default 10 seconds)
// - Maps error statuses to specific errors (401/403, 429, 5xx)
// - No retry, no backoff, no background tasks: the notifier decides what a
//   failure means, and for purges it means nothing
//
// ## Security
//
// - The purge key travels only in the configured request header
// - The purge key NEVER appears in logs or error messages
//
// ## Wire Format
//
// ```http
// POST /purge/hello-world/ HTTP/1.1
// Host: example.com
// X-Purge-Key: <key>
// Content-Length: 0
// ```

use async_trait::async_trait;
use purge_core::config::TransportConfig;
use purge_core::request::{PurgeMethod, PurgeRequest, PurgeResponse};
use purge_core::traits::{PurgeTransport, PurgeTransportFactory};
use purge_core::{Error, Result, TransportRegistry};
use std::time::Duration;

/// Default HTTP timeout for purge requests (10 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP transport for purge requests
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client for purge requests
    client: reqwest::Client,

    /// Request timeout (kept for diagnostics)
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a transport with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// The request timeout in use
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl PurgeTransport for HttpTransport {
    /// Send one purge request
    ///
    /// # Returns
    ///
    /// - `Ok(PurgeResponse)`: 2xx status with the response body
    /// - `Err(Error::Http)`: Connection failure or timeout
    /// - `Err(Error::Authentication)`: 401/403, the key was refused
    /// - `Err(Error::RateLimited)`: 429
    /// - `Err(Error::Transport)`: Any other non-2xx status
    async fn send(&self, request: &PurgeRequest) -> Result<PurgeResponse> {
        let method = match request.method {
            PurgeMethod::Post => reqwest::Method::POST,
            PurgeMethod::Get => reqwest::Method::GET,
        };

        tracing::debug!("{} {}", request.method.as_str(), request.url);

        let mut builder = self.client.request(method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::http(format!("Purge request to {} failed: {}", request.url, e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());

        if status.is_success() {
            return Ok(PurgeResponse {
                status: status.as_u16(),
                body,
            });
        }

        match status.as_u16() {
            401 | 403 => Err(Error::auth(format!(
                "Purge key refused by {}. Status: {}",
                request.url, status
            ))),
            429 => Err(Error::rate_limited(format!(
                "Purge endpoint rate limit exceeded. Status: {}",
                status
            ))),
            500..=599 => Err(Error::transport(
                "http",
                format!("Purge service error (transient): {} - {}", status, body),
            )),
            _ => Err(Error::transport(
                "http",
                format!("Purge request failed: {} - {}", status, body),
            )),
        }
    }

    fn transport_name(&self) -> &'static str {
        "http"
    }
}

/// Factory for creating HTTP transports
pub struct HttpTransportFactory;

impl PurgeTransportFactory for HttpTransportFactory {
    fn create(&self, config: &TransportConfig) -> Result<Box<dyn PurgeTransport>> {
        match config {
            TransportConfig::Http { timeout_secs } => Ok(Box::new(HttpTransport::with_timeout(
                Duration::from_secs(*timeout_secs),
            )?)),
            _ => Err(Error::config("Invalid config for HTTP transport")),
        }
    }
}

/// Register the HTTP transport with a registry
pub fn register(registry: &TransportRegistry) {
    registry.register_transport("http", Box::new(HttpTransportFactory));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_creation() {
        let factory = HttpTransportFactory;

        let transport = factory.create(&TransportConfig::Http { timeout_secs: 3 });
        assert!(transport.is_ok());
        assert_eq!(transport.unwrap().transport_name(), "http");
    }

    #[test]
    fn test_factory_rejects_custom_config() {
        let config = TransportConfig::Custom {
            factory: "other".to_string(),
            config: serde_json::json!({}),
        };
        assert!(HttpTransportFactory.create(&config).is_err());
    }

    #[test]
    fn test_register() {
        let registry = TransportRegistry::new();
        register(&registry);

        assert!(registry.has_transport("http"));
        assert!(registry.create_transport(&TransportConfig::default()).is_ok());
    }
}

//! Purge request construction
//!
//! A [`PurgeRequest`] is derived from nothing but a content identifier and
//! the [`PurgeConfig`]. The cache service understands three calls on its
//! purge endpoint:
//!
//! ```text
//! POST {base}{purge_path}/{identifier}/   purge one item
//! POST {base}{purge_path}/                flush everything
//! GET  {base}{purge_path}/                list cached keys
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::PurgeConfig;
use crate::content::ContentItem;
use crate::error::{Error, Result};

/// HTTP method of a purge request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeMethod {
    Post,
    Get,
}

impl PurgeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurgeMethod::Post => "POST",
            PurgeMethod::Get => "GET",
        }
    }
}

/// A fully resolved request against the purge endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct PurgeRequest {
    /// HTTP method
    pub method: PurgeMethod,
    /// Target URL
    pub url: Url,
    /// Headers to send; holds the purge key
    pub headers: HashMap<String, String>,
}

// Header values carry the purge key and are never printed
impl std::fmt::Debug for PurgeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let header_names: Vec<&str> = self.headers.keys().map(String::as_str).collect();
        f.debug_struct("PurgeRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &header_names)
            .finish()
    }
}

impl PurgeRequest {
    /// Build the request purging a single content item
    ///
    /// The identifier is percent-encoded as one path segment, so a slug with
    /// spaces or slashes still yields a well-formed URL that cannot escape the
    /// purge path. An empty identifier still gets its own segment
    /// (`{purge_path}//`), which the cache service treats as a single-item
    /// purge rather than a flush.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidInput` if the identifier is `.` or `..`
    /// - `Error::Url` / `Error::Config` if the base URL cannot be resolved
    pub fn for_content(item: &ContentItem, config: &PurgeConfig) -> Result<Self> {
        // The url crate drops dot segments, which would turn this into a flush
        if item.identifier == "." || item.identifier == ".." {
            return Err(Error::invalid_input(format!(
                "Content identifier '{}' is not a valid path segment",
                item.identifier
            )));
        }

        let mut url = endpoint(config)?;
        url.path_segments_mut()
            .map_err(|_| Error::config("Purge base URL cannot carry a path"))?
            .pop_if_empty()
            .push(&item.identifier)
            .push("");

        Ok(Self::new(PurgeMethod::Post, url, config))
    }

    /// Build the request flushing the whole cache
    pub fn flush_all(config: &PurgeConfig) -> Result<Self> {
        Ok(Self::new(PurgeMethod::Post, endpoint(config)?, config))
    }

    /// Build the request listing cached keys
    pub fn list(config: &PurgeConfig) -> Result<Self> {
        Ok(Self::new(PurgeMethod::Get, endpoint(config)?, config))
    }

    fn new(method: PurgeMethod, url: Url, config: &PurgeConfig) -> Self {
        let mut headers = HashMap::with_capacity(1);
        headers.insert(config.key_header.clone(), config.purge_key.clone());

        Self {
            method,
            url,
            headers,
        }
    }
}

/// `{base}{purge_path}/`, with a trailing slash on the base ignored
fn endpoint(config: &PurgeConfig) -> Result<Url> {
    let base = config.purge_base_url.trim_end_matches('/');
    Ok(Url::parse(&format!("{}{}/", base, config.purge_path))?)
}

/// What a transport got back from the purge service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl PurgeResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Cache keys held by the purge service, as returned by its listing call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheListing {
    /// Keys held in memory
    #[serde(default)]
    pub mem: Vec<String>,
    /// Keys held on disk
    #[serde(default)]
    pub disk: Vec<String>,
}

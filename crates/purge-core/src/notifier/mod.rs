//! Best-effort purge notifier
//!
//! The PurgeNotifier turns a content identifier into one authenticated
//! request against the cache service's purge endpoint.
//!
//! ## Failure Model
//!
//! A purge is a side effect of a content save and never decides its outcome.
//! [`PurgeNotifier::notify`] therefore returns nothing: connection failures
//! and error statuses are logged at `warn` and reported as
//! [`PurgeEvent::PurgeFailed`] on the monitoring channel, then dropped.
//! There are no retries.
//!
//! ## Dispatch
//!
//! ```text
//! save path ──► dispatch(id) ──► tokio task ──► notify(id) ──► PurgeTransport
//!     │                                              │
//!     └── returns immediately                        └──► PurgeEvent
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::PurgeConfig;
use crate::content::ContentItem;
use crate::error::Result;
use crate::hooks::ContentHooks;
use crate::request::{CacheListing, PurgeRequest, PurgeResponse};
use crate::traits::PurgeTransport;

/// Events emitted by the notifier and the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurgeEvent {
    /// Engine started consuming a content source
    Started {
        source: String,
    },

    /// Engine stopped
    Stopped {
        reason: String,
    },

    /// Purge request was accepted by the cache service
    PurgeSent {
        identifier: String,
        url: String,
        status: u16,
    },

    /// Purge request failed (network error or error status)
    PurgeFailed {
        identifier: String,
        error: String,
    },

    /// No request was sent for this identifier
    PurgeSkipped {
        identifier: String,
        reason: String,
    },

    /// Full cache flush was accepted
    FlushSent {
        status: u16,
    },

    /// Full cache flush failed
    FlushFailed {
        error: String,
    },
}

/// Sends purge notifications for saved content
///
/// Cloning is cheap; clones share the transport, the configuration and the
/// monitoring channel.
#[derive(Clone)]
pub struct PurgeNotifier {
    config: Arc<PurgeConfig>,
    transport: Arc<dyn PurgeTransport>,
    event_tx: mpsc::Sender<PurgeEvent>,
}

impl PurgeNotifier {
    /// Create a new notifier
    ///
    /// # Returns
    ///
    /// A tuple of (notifier, event_receiver) where event_receiver yields
    /// purge events. Dropping the receiver is fine; events are then discarded.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration does not validate.
    pub fn new(
        config: PurgeConfig,
        transport: Box<dyn PurgeTransport>,
    ) -> Result<(Self, mpsc::Receiver<PurgeEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.engine.event_channel_capacity);

        let notifier = Self {
            config: Arc::new(config),
            transport: Arc::from(transport),
            event_tx: tx,
        };

        Ok((notifier, rx))
    }

    /// The configuration this notifier was built with
    pub fn config(&self) -> &PurgeConfig {
        &self.config
    }

    /// Purge the cached copy of one content item
    ///
    /// Issues exactly one `POST {base}{purge_path}/{identifier}/` carrying the
    /// key header. Completes once the exchange is over; never fails.
    pub async fn notify(&self, identifier: &str) {
        let _ = self.try_notify(identifier).await;
    }

    /// Same as [`PurgeNotifier::notify`], but hands the outcome back
    ///
    /// For one-shot callers that must know whether the purge went through
    /// without relying on the bounded monitoring channel. Logging and events
    /// are identical to `notify`.
    pub async fn try_notify(&self, identifier: &str) -> Result<PurgeResponse> {
        let item = ContentItem::new(identifier);

        let request = match PurgeRequest::for_content(&item, &self.config) {
            Ok(request) => request,
            Err(e) => {
                debug!("Skipping purge for {:?}: {}", identifier, e);
                self.emit_event(PurgeEvent::PurgeSkipped {
                    identifier: identifier.to_string(),
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        debug!("Sending purge for {} to {}", identifier, request.url);

        match self.transport.send(&request).await {
            Ok(response) => {
                info!("Purged {} ({})", identifier, response.status);
                self.emit_event(PurgeEvent::PurgeSent {
                    identifier: identifier.to_string(),
                    url: request.url.to_string(),
                    status: response.status,
                });
                Ok(response)
            }
            Err(e) => {
                warn!(
                    "Purge notification for {} via {} failed: {}",
                    identifier,
                    self.transport.transport_name(),
                    e
                );
                self.emit_event(PurgeEvent::PurgeFailed {
                    identifier: identifier.to_string(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Purge in the background and return immediately
    ///
    /// Spawns [`PurgeNotifier::notify`] on the current tokio runtime. Outside
    /// a runtime the purge is dropped with a warning and `None` is returned.
    pub fn dispatch(&self, identifier: impl Into<String>) -> Option<JoinHandle<()>> {
        let identifier = identifier.into();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let notifier = self.clone();
                Some(handle.spawn(async move { notifier.notify(&identifier).await }))
            }
            Err(_) => {
                warn!("No async runtime available, dropping purge for {}", identifier);
                self.emit_event(PurgeEvent::PurgeFailed {
                    identifier,
                    error: "no async runtime available".to_string(),
                });
                None
            }
        }
    }

    /// Ask the cache service to drop every entry
    ///
    /// Best-effort like [`PurgeNotifier::notify`].
    pub async fn flush_all(&self) {
        let _ = self.try_flush_all().await;
    }

    /// Same as [`PurgeNotifier::flush_all`], but hands the outcome back
    pub async fn try_flush_all(&self) -> Result<PurgeResponse> {
        let request = match PurgeRequest::flush_all(&self.config) {
            Ok(request) => request,
            Err(e) => {
                warn!("Cannot build flush request: {}", e);
                self.emit_event(PurgeEvent::FlushFailed {
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        match self.transport.send(&request).await {
            Ok(response) => {
                info!("Flushed cache ({})", response.status);
                self.emit_event(PurgeEvent::FlushSent {
                    status: response.status,
                });
                Ok(response)
            }
            Err(e) => {
                warn!("Cache flush failed: {}", e);
                self.emit_event(PurgeEvent::FlushFailed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Fetch the keys currently held by the cache service
    ///
    /// Unlike purges this is an operator query, so errors are returned.
    pub async fn list_cache(&self) -> Result<CacheListing> {
        let request = PurgeRequest::list(&self.config)?;
        let response = self.transport.send(&request).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Purge every item saved through `hooks` from now on
    pub fn attach(&self, hooks: &ContentHooks) {
        let notifier = self.clone();
        hooks.on_content_saved(move |item| {
            notifier.dispatch(item.identifier.clone());
        });
    }

    /// Emit a monitoring event, dropping it if the channel is full or closed
    pub(crate) fn emit_event(&self, event: PurgeEvent) {
        if let Err(mpsc::error::TrySendError::Full(_)) = self.event_tx.try_send(event) {
            warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
        }
    }
}

impl std::fmt::Debug for PurgeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PurgeNotifier")
            .field("config", &self.config)
            .field("transport", &self.transport.transport_name())
            .finish()
    }
}

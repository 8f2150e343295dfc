//! Event-driven purge engine
//!
//! The PurgeEngine is responsible for:
//! - Consuming content-saved events from a ContentSource
//! - Dispatching one purge per event without blocking the event loop
//! - Draining in-flight purges on shutdown
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐
//! │ ContentSource │─── ContentSavedEvent ───┐
//! └───────────────┘                         │
//!                                           ▼
//!                                  ┌──────────────┐
//!                                  │ PurgeEngine  │
//!                                  └──────────────┘
//!                                           │ JoinSet
//!                                           ▼
//!                                  ┌────────────────┐      ┌────────────────┐
//!                                  │ PurgeNotifier  │ ───► │ PurgeTransport │
//!                                  └────────────────┘      └────────────────┘
//!                                           │
//!                                           ▼
//!                                     PurgeEvent
//! ```

use std::future::Future;

use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tokio_stream::StreamExt;
use tracing::{debug, error, info};

use crate::content::ContentSavedEvent;
use crate::error::Result;
use crate::notifier::{PurgeEvent, PurgeNotifier};
use crate::traits::ContentSource;

/// Core purge engine
///
/// ## Lifecycle
///
/// 1. Create with [`PurgeEngine::new()`]
/// 2. Start with [`PurgeEngine::run()`]
/// 3. Engine runs until a shutdown signal arrives or the source ends
/// 4. In-flight purges are awaited before `run` returns
pub struct PurgeEngine {
    /// Source of content-saved events
    source: Box<dyn ContentSource>,

    /// Notifier performing the purges
    notifier: PurgeNotifier,
}

impl PurgeEngine {
    /// Create a new purge engine
    pub fn new(source: Box<dyn ContentSource>, notifier: PurgeNotifier) -> Self {
        Self { source, notifier }
    }

    /// Run the engine until ctrl-c or until the content source ends
    pub async fn run(&self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run the engine with a programmatic shutdown signal
    ///
    /// With `None` this behaves like [`PurgeEngine::run`]. A dropped sender
    /// counts as a shutdown signal.
    pub async fn run_with_shutdown(&self, shutdown_rx: Option<oneshot::Receiver<()>>) -> Result<()> {
        match shutdown_rx {
            Some(rx) => {
                self.run_until(async {
                    let _ = rx.await;
                })
                .await
            }
            None => self.run().await,
        }
    }

    async fn run_until(&self, shutdown: impl Future<Output = ()>) -> Result<()> {
        tokio::pin!(shutdown);

        self.notifier.emit_event(PurgeEvent::Started {
            source: self.source.source_name().to_string(),
        });
        info!("Purge engine started (source={})", self.source.source_name());

        let mut stream = self.source.watch();
        let mut in_flight = JoinSet::new();

        let reason = loop {
            tokio::select! {
                maybe_event = stream.next() => match maybe_event {
                    Some(event) => self.spawn_purge(&mut in_flight, event),
                    None => {
                        info!("Content source closed");
                        break "Content source closed";
                    }
                },

                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        error!("Purge task aborted: {}", e);
                    }
                }

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break "Shutdown signal";
                }
            }
        };

        if !in_flight.is_empty() {
            info!("Waiting for {} in-flight purge(s)", in_flight.len());
        }
        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                error!("Purge task aborted: {}", e);
            }
        }

        self.notifier.emit_event(PurgeEvent::Stopped {
            reason: reason.to_string(),
        });
        info!("Purge engine stopped");

        Ok(())
    }

    fn spawn_purge(&self, in_flight: &mut JoinSet<()>, event: ContentSavedEvent) {
        debug!(
            "Content saved: {} at {}",
            event.item.identifier, event.saved_at
        );

        let notifier = self.notifier.clone();
        in_flight.spawn(async move {
            notifier.notify(&event.item.identifier).await;
        });
    }
}

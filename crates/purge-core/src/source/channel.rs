// # Channel Content Source
//
// Content source fed from inside the process.
//
// ## Purpose
//
// Lets an embedding application push content-saved events into a
// `PurgeEngine` from its own save path, and gives tests a controllable
// source.

use std::pin::Pin;
use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::warn;

use crate::content::ContentSavedEvent;
use crate::traits::ContentSource;

/// Content source backed by an unbounded channel
///
/// The stream ends once every sender has been dropped.
///
/// # Example
///
/// ```rust
/// use purge_core::source::ChannelContentSource;
/// use purge_core::ContentSavedEvent;
///
/// let (source, tx) = ChannelContentSource::new();
/// tx.send(ContentSavedEvent::new("hello-world")).unwrap();
/// # drop(source);
/// ```
pub struct ChannelContentSource {
    rx: Mutex<Option<mpsc::UnboundedReceiver<ContentSavedEvent>>>,
}

impl ChannelContentSource {
    /// Create a source and the sender that feeds it
    pub fn new() -> (Self, mpsc::UnboundedSender<ContentSavedEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let source = Self {
            rx: Mutex::new(Some(rx)),
        };

        (source, tx)
    }
}

impl ContentSource for ChannelContentSource {
    fn watch(&self) -> Pin<Box<dyn Stream<Item = ContentSavedEvent> + Send + 'static>> {
        let rx = self.rx.lock().unwrap_or_else(PoisonError::into_inner).take();

        match rx {
            Some(rx) => Box::pin(UnboundedReceiverStream::new(rx)),
            None => {
                warn!("Channel content source watched twice, returning an empty stream");
                Box::pin(tokio_stream::empty::<ContentSavedEvent>())
            }
        }
    }

    fn source_name(&self) -> &'static str {
        "channel"
    }
}

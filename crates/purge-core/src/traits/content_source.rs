// # Content Source Trait
//
// Defines the interface for receiving content-saved events from the host.
//
// ## Implementations
//
// - Channel-backed (embedding, tests): `source::ChannelContentSource`
// - Line-oriented reader (daemon stdin): `source::LinesContentSource`
//
// ## Usage
//
// ```rust,ignore
// use purge_core::ContentSource;
// use tokio_stream::StreamExt;
//
// let source = /* ContentSource implementation */;
// let mut stream = source.watch();
// while let Some(event) = stream.next().await {
//     println!("saved: {}", event.item.identifier);
// }
// ```

use std::pin::Pin;
use tokio_stream::Stream;

use crate::content::ContentSavedEvent;

/// Trait for content source implementations
///
/// A source yields one [`ContentSavedEvent`] per create or update of a
/// content item. The stream ends when the host stops producing events.
pub trait ContentSource: Send + Sync {
    /// Stream of content-saved events
    ///
    /// Called once by the engine. Implementations may panic or return an
    /// empty stream on a second call.
    fn watch(&self) -> Pin<Box<dyn Stream<Item = ContentSavedEvent> + Send + 'static>>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}

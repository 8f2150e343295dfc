// # purge-core
//
// Core library for best-effort cache purge notifications.
//
// ## Architecture Overview
//
// When a content item is saved, the cached copy of its public URL has to be
// dropped by the caching proxy in front of the site. This library provides:
// - **PurgeNotifier**: Builds the purge URL and sends one authenticated request
// - **ContentHooks**: Explicit `on_content_saved` observer registration
// - **ContentSource**: Trait for streams of content-saved events
// - **PurgeTransport**: Trait for delivering requests to the purge endpoint
// - **PurgeEngine**: Event loop wiring a ContentSource to the notifier
// - **TransportRegistry**: Plugin-based registry for transports
//
// ## Design Principles
//
// 1. **Best-Effort**: A failed purge never fails the save that triggered it
// 2. **Off the Critical Path**: Purges run on background tasks
// 3. **Explicit Configuration**: No environment lookups inside the library
// 4. **Single-Shot**: One request per save, no retries

pub mod traits;
pub mod engine;
pub mod registry;
pub mod config;
pub mod content;
pub mod error;
pub mod hooks;
pub mod notifier;
pub mod request;
pub mod source;

// Re-export core types for convenience
pub use traits::{ContentSource, PurgeTransport, PurgeTransportFactory};
pub use engine::PurgeEngine;
pub use registry::TransportRegistry;
pub use config::{EngineConfig, PurgeConfig, TransportConfig};
pub use content::{ContentItem, ContentSavedEvent};
pub use error::{Error, Result};
pub use hooks::ContentHooks;
pub use notifier::{PurgeEvent, PurgeNotifier};
pub use request::{CacheListing, PurgeMethod, PurgeRequest, PurgeResponse};

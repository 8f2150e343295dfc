//! Core traits for the purge notifier
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`ContentSource`]: Stream of content-saved events
//! - [`PurgeTransport`]: Deliver purge requests to the cache service

pub mod content_source;
pub mod purge_transport;

pub use content_source::ContentSource;
pub use purge_transport::{PurgeTransport, PurgeTransportFactory};

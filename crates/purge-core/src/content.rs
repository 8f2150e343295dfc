//! Content items handed over by the host's save path

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved piece of content, reduced to what a purge needs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentItem {
    /// The slug the content is published under (e.g. "hello-world")
    pub identifier: String,
}

impl ContentItem {
    /// Create a content item from its slug
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

impl From<&str> for ContentItem {
    fn from(identifier: &str) -> Self {
        Self::new(identifier)
    }
}

impl From<String> for ContentItem {
    fn from(identifier: String) -> Self {
        Self::new(identifier)
    }
}

/// A content item was created or updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSavedEvent {
    /// The saved item
    pub item: ContentItem,
    /// When the save happened
    pub saved_at: DateTime<Utc>,
}

impl ContentSavedEvent {
    /// Create an event stamped with the current time
    pub fn new(item: impl Into<ContentItem>) -> Self {
        Self {
            item: item.into(),
            saved_at: Utc::now(),
        }
    }
}

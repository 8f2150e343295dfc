//! Explicit content-saved observers
//!
//! The host application owns a [`ContentHooks`] and calls
//! [`ContentHooks::content_saved`] from its save path. Interested parties,
//! typically a [`crate::PurgeNotifier`] via `attach`, register with
//! [`ContentHooks::on_content_saved`].
//!
//! ```rust
//! use purge_core::{ContentHooks, ContentItem};
//!
//! let hooks = ContentHooks::new();
//! hooks.on_content_saved(|item| println!("saved {}", item.identifier));
//! hooks.content_saved(&ContentItem::new("hello-world"));
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use crate::content::ContentItem;

/// Handler invoked after a content item is saved
pub type SavedHandler = Arc<dyn Fn(&ContentItem) + Send + Sync>;

/// Registry of content-saved handlers
///
/// Clones share the same handler list.
#[derive(Clone, Default)]
pub struct ContentHooks {
    saved: Arc<RwLock<Vec<SavedHandler>>>,
}

impl ContentHooks {
    /// Create an empty hook registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for content saves
    pub fn on_content_saved<F>(&self, handler: F)
    where
        F: Fn(&ContentItem) + Send + Sync + 'static,
    {
        self.saved
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(handler));
    }

    /// Announce a saved item to every handler, in registration order
    pub fn content_saved(&self, item: &ContentItem) {
        // Snapshot so a handler may register further handlers
        let handlers: Vec<SavedHandler> = self
            .saved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for handler in &handlers {
            handler(item);
        }
    }

    /// Number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.saved.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl std::fmt::Debug for ContentHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentHooks")
            .field("saved", &self.handler_count())
            .finish()
    }
}

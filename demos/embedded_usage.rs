//! Minimal embedding example for purge-core
//!
//! A host application owns a `ContentHooks` registry and fires
//! `content_saved` from its save path. The attached notifier purges the
//! cached page in the background; the save itself never waits for it.
//!
//! ```bash
//! PURGE_DEMO_BASE_URL=http://localhost:8080 cargo run -p embedded_usage
//! ```

use purge_core::{ContentHooks, ContentItem, PurgeConfig, PurgeEvent, PurgeNotifier};
use purge_transport_http::HttpTransport;
use std::time::Duration;

/// Stand-in for the host's persistence layer
struct Posts {
    hooks: ContentHooks,
}

impl Posts {
    fn save(&self, slug: &str) {
        // ... write the post ...
        self.hooks.content_saved(&ContentItem::new(slug));
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let base_url = std::env::var("PURGE_DEMO_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:8080".to_string());
    let config = PurgeConfig::new(base_url, "/purge", "demo-key");

    let transport = HttpTransport::with_timeout(Duration::from_secs(2))?;
    let (notifier, mut events) = PurgeNotifier::new(config, Box::new(transport))?;

    let posts = Posts {
        hooks: ContentHooks::new(),
    };
    notifier.attach(&posts.hooks);

    posts.save("hello-world");
    posts.save("hello world");
    println!("Both posts saved; purges are running in the background");

    for _ in 0..2 {
        match tokio::time::timeout(Duration::from_secs(5), events.recv()).await {
            Ok(Some(PurgeEvent::PurgeSent { url, status, .. })) => {
                println!("purged {} ({})", url, status)
            }
            Ok(Some(PurgeEvent::PurgeFailed { identifier, error })) => {
                println!("purge of {} failed, save unaffected: {}", identifier, error)
            }
            Ok(Some(other)) => println!("{:?}", other),
            Ok(None) | Err(_) => break,
        }
    }

    Ok(())
}

//! Contract Test: Purge Notification
//!
//! Constraints verified:
//! - One notify call → exactly one request to `{base}{path}/{identifier}/`
//! - Every request carries the configured key header
//! - Failures never reach the caller
//! - dispatch() does not wait for the round trip

mod common;

use common::*;
use purge_core::{PurgeEvent, PurgeMethod, PurgeNotifier};
use std::time::{Duration, Instant};

#[tokio::test]
async fn notify_sends_exactly_one_post_with_key() {
    let transport = RecordingTransport::new();
    let (notifier, mut event_rx) =
        PurgeNotifier::new(test_config(), Box::new(transport.clone())).expect("valid config");

    notifier.notify("hello-world").await;

    let requests = transport.requests();
    assert_eq!(requests.len(), 1, "expected exactly one request");

    let request = &requests[0];
    assert_eq!(request.method, PurgeMethod::Post);
    assert_eq!(request.url.as_str(), "https://example.com/purge/hello-world/");
    assert_eq!(
        request.headers.get("X-Purge-Key").map(String::as_str),
        Some("secret123")
    );

    assert_eq!(
        drain_events(&mut event_rx),
        vec![PurgeEvent::PurgeSent {
            identifier: "hello-world".to_string(),
            url: "https://example.com/purge/hello-world/".to_string(),
            status: 200,
        }]
    );
}

#[tokio::test]
async fn each_identifier_gets_its_own_request() {
    let transport = RecordingTransport::new();
    let (notifier, _event_rx) =
        PurgeNotifier::new(test_config(), Box::new(transport.clone())).expect("valid config");

    for identifier in ["a", "b", "a"] {
        notifier.notify(identifier).await;
    }

    // No deduplication: saving the same post twice purges twice
    assert_eq!(
        transport.urls(),
        vec![
            "https://example.com/purge/a/",
            "https://example.com/purge/b/",
            "https://example.com/purge/a/",
        ]
    );
}

#[tokio::test]
async fn identifier_with_spaces_is_percent_encoded() {
    let transport = RecordingTransport::new();
    let (notifier, _event_rx) =
        PurgeNotifier::new(test_config(), Box::new(transport.clone())).expect("valid config");

    notifier.notify("hello world").await;

    assert_eq!(transport.urls(), vec!["https://example.com/purge/hello%20world/"]);
}

#[tokio::test]
async fn network_failure_is_swallowed_and_reported() {
    let transport = FailingTransport::new();
    let (notifier, mut event_rx) =
        PurgeNotifier::new(test_config(), Box::new(transport.clone())).expect("valid config");

    // Returns () - nothing to propagate
    notifier.notify("hello-world").await;

    assert_eq!(transport.call_count(), 1, "no retries");

    let events = drain_events(&mut event_rx);
    assert_eq!(events.len(), 1);
    assert!(
        matches!(&events[0], PurgeEvent::PurgeFailed { identifier, .. } if identifier == "hello-world"),
        "unexpected events: {:?}",
        events
    );
}

#[tokio::test]
async fn blank_identifiers_still_send_one_request() {
    let transport = RecordingTransport::new();
    let (notifier, mut event_rx) =
        PurgeNotifier::new(test_config(), Box::new(transport.clone())).expect("valid config");

    notifier.notify("   ").await;
    notifier.notify("").await;

    assert_eq!(
        transport.urls(),
        vec![
            "https://example.com/purge/%20%20%20/",
            "https://example.com/purge//",
        ]
    );
    assert!(matches!(
        drain_events(&mut event_rx).as_slice(),
        [PurgeEvent::PurgeSent { .. }, PurgeEvent::PurgeSent { .. }]
    ));
}

#[tokio::test]
async fn dot_segment_identifier_is_skipped_not_flushed() {
    let transport = RecordingTransport::new();
    let (notifier, mut event_rx) =
        PurgeNotifier::new(test_config(), Box::new(transport.clone())).expect("valid config");

    notifier.notify("..").await;

    assert_eq!(transport.call_count(), 0);
    assert!(matches!(
        drain_events(&mut event_rx).as_slice(),
        [PurgeEvent::PurgeSkipped { .. }]
    ));
}

#[tokio::test]
async fn dispatch_returns_before_the_round_trip() {
    let transport = RecordingTransport::new().with_delay(Duration::from_millis(300));
    let (notifier, _event_rx) =
        PurgeNotifier::new(test_config(), Box::new(transport.clone())).expect("valid config");

    let started = Instant::now();
    let handle = notifier.dispatch("hello-world").expect("runtime available");
    assert!(
        started.elapsed() < Duration::from_millis(200),
        "dispatch blocked for {:?}",
        started.elapsed()
    );

    handle.await.expect("purge task completes");
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn dispatch_without_runtime_does_not_panic() {
    let transport = RecordingTransport::new();
    let (notifier, mut event_rx) =
        PurgeNotifier::new(test_config(), Box::new(transport.clone())).expect("valid config");

    assert!(notifier.dispatch("hello-world").is_none());
    assert_eq!(transport.call_count(), 0);
    assert!(matches!(
        drain_events(&mut event_rx).as_slice(),
        [PurgeEvent::PurgeFailed { .. }]
    ));
}

#[tokio::test]
async fn flush_all_posts_to_endpoint_root() {
    let transport = RecordingTransport::new();
    let (notifier, mut event_rx) =
        PurgeNotifier::new(test_config(), Box::new(transport.clone())).expect("valid config");

    notifier.flush_all().await;

    assert_eq!(transport.urls(), vec!["https://example.com/purge/"]);
    assert_eq!(transport.requests()[0].method, PurgeMethod::Post);
    assert_eq!(
        drain_events(&mut event_rx),
        vec![PurgeEvent::FlushSent { status: 200 }]
    );
}

#[tokio::test]
async fn list_cache_parses_listing() {
    let transport = RecordingTransport::new()
        .with_body(r#"{"mem":["none::/hello-world/"],"disk":["br::+hello-world+"]}"#);
    let (notifier, _event_rx) =
        PurgeNotifier::new(test_config(), Box::new(transport.clone())).expect("valid config");

    let listing = notifier.list_cache().await.expect("listing parses");

    assert_eq!(listing.mem, vec!["none::/hello-world/"]);
    assert_eq!(listing.disk, vec!["br::+hello-world+"]);
    assert_eq!(transport.requests()[0].method, PurgeMethod::Get);
}

#[tokio::test]
async fn list_cache_surfaces_errors() {
    let (notifier, _event_rx) =
        PurgeNotifier::new(test_config(), Box::new(FailingTransport::new())).expect("valid config");

    assert!(notifier.list_cache().await.is_err());
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let config = purge_core::PurgeConfig::new("https://example.com", "/purge", "");
    assert!(PurgeNotifier::new(config, Box::new(RecordingTransport::new())).is_err());
}

//! Test doubles and common utilities for purge contract tests

#![allow(dead_code)]

use purge_core::error::{Error, Result};
use purge_core::request::{PurgeRequest, PurgeResponse};
use purge_core::traits::PurgeTransport;
use purge_core::{PurgeConfig, PurgeEvent};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// A transport that records every request and answers with a fixed response
#[derive(Clone)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<PurgeRequest>>>,
    status: u16,
    body: String,
    delay: Duration,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            status: 200,
            body: "OK".to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Answer with this body instead of "OK"
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Hold every request for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<PurgeRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|request| request.url.to_string())
            .collect()
    }
}

#[async_trait::async_trait]
impl PurgeTransport for RecordingTransport {
    async fn send(&self, request: &PurgeRequest) -> Result<PurgeResponse> {
        self.requests.lock().unwrap().push(request.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(PurgeResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }

    fn transport_name(&self) -> &'static str {
        "recording"
    }
}

/// A transport that simulates a network failure on every call
#[derive(Clone)]
pub struct FailingTransport {
    call_count: Arc<AtomicUsize>,
}

impl FailingTransport {
    pub fn new() -> Self {
        Self {
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PurgeTransport for FailingTransport {
    async fn send(&self, _request: &PurgeRequest) -> Result<PurgeResponse> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Err(Error::http("connection refused"))
    }

    fn transport_name(&self) -> &'static str {
        "failing"
    }
}

/// Configuration used throughout the contract tests
pub fn test_config() -> PurgeConfig {
    PurgeConfig::new("https://example.com", "/purge", "secret123")
}

/// Collect every event currently buffered on the monitoring channel
pub fn drain_events(rx: &mut mpsc::Receiver<PurgeEvent>) -> Vec<PurgeEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

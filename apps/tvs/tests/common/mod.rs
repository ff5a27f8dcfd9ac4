//! Test infrastructure for TVS integration tests.
//!
//! Provides a `MockTransport` that records every call the tracker client
//! makes and answers from canned bodies, so no network is needed.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tvs::error::{AppError, Result};
use tvs::services::{PreparedCall, Transport};
use tvs::{ProgressReconciler, TrackerClient};

pub const ENDPOINT: &str = "https://tracker.test/api.php";

/// Canned reply of the mock transport.
#[derive(Clone)]
pub enum Reply {
    Body(String),
    Status(u16, String),
    Unreachable,
}

/// Transport that answers by `action` (or `service` when there is none).
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<PreparedCall>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reply with `body` to calls whose route is `route`.
    pub fn reply(&self, route: &str, body: &str) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .insert(route.to_string(), Reply::Body(body.to_string()));
        self
    }

    pub fn fail(&self, route: &str, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .insert(route.to_string(), reply);
        self
    }

    pub fn calls(&self) -> Vec<PreparedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn route(call: &PreparedCall) -> String {
        call.param("action")
            .or_else(|| call.param("task"))
            .or_else(|| call.param("service"))
            .unwrap_or_default()
            .to_string()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, call: &PreparedCall) -> Result<String> {
        self.calls.lock().unwrap().push(call.clone());

        let route = Self::route(call);
        let reply = self.replies.lock().unwrap().get(&route).cloned();
        match reply {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Status(status, body)) => Err(AppError::RemoteService { status, body }),
            Some(Reply::Unreachable) => Err(AppError::Transport("connection refused".to_string())),
            None => Err(AppError::RemoteService {
                status: 404,
                body: format!("no reply for {}", route),
            }),
        }
    }
}

/// Client with the given keys sending through `transport`.
pub fn client(transport: &Arc<MockTransport>, keys: &[&str]) -> TrackerClient {
    TrackerClient::with_transport(
        ENDPOINT,
        keys.iter().map(|k| k.to_string()).collect(),
        transport.clone(),
    )
    .expect("Failed to create test client")
}

pub fn reconciler(transport: &Arc<MockTransport>) -> ProgressReconciler {
    ProgressReconciler::new(Arc::new(client(transport, &["read-key"])))
}

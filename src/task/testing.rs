//! Scripted transport used by the lifecycle tests: records every submission
//! and replays canned status payloads without touching the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::client::SpeechTransport;
use crate::task::types::SubmissionRequest;

pub struct ScriptedTransport {
    create_response: Option<Value>,
    statuses: Vec<Value>,
    submissions: Mutex<Vec<SubmissionRequest>>,
    status_calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(create_response: Value) -> Self {
        Self {
            create_response: Some(create_response),
            statuses: Vec::new(),
            submissions: Mutex::new(Vec::new()),
            status_calls: AtomicUsize::new(0),
        }
    }

    /// A transport whose submit call fails outright.
    pub fn failing_submit() -> Self {
        Self {
            create_response: None,
            statuses: Vec::new(),
            submissions: Mutex::new(Vec::new()),
            status_calls: AtomicUsize::new(0),
        }
    }

    /// Status payloads replayed in order; the last one repeats once the
    /// script runs out, so a single "processing" entry polls forever.
    pub fn with_statuses(mut self, statuses: Vec<Value>) -> Self {
        self.statuses = statuses;
        self
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> Vec<SubmissionRequest> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechTransport for ScriptedTransport {
    async fn submit(&self, request: &SubmissionRequest) -> Result<Value> {
        self.submissions.lock().unwrap().push(request.clone());
        self.create_response
            .clone()
            .ok_or_else(|| anyhow!("connection refused"))
    }

    async fn task_status(&self, _task_id: &str) -> Result<Value> {
        let call = self.status_calls.fetch_add(1, Ordering::SeqCst);
        let index = call.min(self.statuses.len().saturating_sub(1));
        self.statuses
            .get(index)
            .cloned()
            .ok_or_else(|| anyhow!("no scripted status response"))
    }
}

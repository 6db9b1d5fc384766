use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::multipart;
use serde_json::Value;
use tracing::debug;

use crate::task::types::SubmissionRequest;

pub mod credentials;

pub use credentials::Credentials;

/// Status endpoint shared by every operation; the task id is appended.
pub const TASK_STATUS_PATH: &str = "/api/v1/transcribe/task_status";

/// The transport seam between the task lifecycle and the actual backend.
/// Production uses [`HttpSpeechClient`]; tests script responses instead.
#[async_trait]
pub trait SpeechTransport: Send + Sync {
    async fn submit(&self, request: &SubmissionRequest) -> Result<Value>;
    async fn task_status(&self, task_id: &str) -> Result<Value>;
}

pub struct HttpSpeechClient {
    client: reqwest::Client,
    credentials: Credentials,
}

impl HttpSpeechClient {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.credentials.api_key())
    }
}

#[async_trait]
impl SpeechTransport for HttpSpeechClient {
    async fn submit(&self, request: &SubmissionRequest) -> Result<Value> {
        let part = multipart::Part::bytes(request.data.clone())
            .file_name(request.file_name.clone())
            .mime_str(&request.mime_type)?;

        let mut form = multipart::Form::new().part("file", part);
        for (name, value) in &request.form_fields {
            form = form.text(*name, value.clone());
        }

        debug!("POST {} ({} bytes)", request.path, request.data.len());
        let response = self
            .client
            .post(self.credentials.endpoint(request.path))
            .header("Authorization", self.bearer())
            .query(&request.query)
            .multipart(form)
            .send()
            .await?;

        read_json(response).await
    }

    async fn task_status(&self, task_id: &str) -> Result<Value> {
        let url = format!("{}/{}", self.credentials.endpoint(TASK_STATUS_PATH), task_id);
        let response = self
            .client
            .get(url)
            .header("Authorization", self.bearer())
            .send()
            .await?;

        read_json(response).await
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!("request failed with status {}: {}", status, body));
    }
    Ok(response.json().await?)
}

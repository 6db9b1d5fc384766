use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::SpeechTransport;
use crate::error::TaskError;
use crate::task::item::{InputItem, ItemParams};
use crate::task::poller;
use crate::task::probe;
use crate::task::submit;
use crate::task::types::{
    FilePart, Operation, OperationOutput, OutputItem, PollPolicy, RunSummary,
};

/// Drives a batch of items through submit → poll → unwrap → normalize,
/// strictly one item at a time. Items never share state; the only thing
/// crossing item boundaries is the ordered output collection.
pub struct TaskRunner {
    transport: Arc<dyn SpeechTransport>,
    continue_on_fail: bool,
}

impl TaskRunner {
    pub fn new(transport: Arc<dyn SpeechTransport>) -> Self {
        Self {
            transport,
            continue_on_fail: false,
        }
    }

    /// Convert per-item errors into error records instead of aborting the run.
    pub fn continue_on_fail(mut self, continue_on_fail: bool) -> Self {
        self.continue_on_fail = continue_on_fail;
        self
    }

    pub async fn run(&self, items: Vec<InputItem>) -> Result<Vec<OutputItem>> {
        let run_id = format!("run-{}", Uuid::new_v4());
        info!("{}: processing {} item(s)", run_id, items.len());

        let mut outputs = Vec::with_capacity(items.len());
        let mut summary = RunSummary::default();

        for (index, mut item) in items.into_iter().enumerate() {
            let started = Utc::now();
            match self.process_item(index, &mut item).await {
                Ok((output, binary)) => {
                    let elapsed = (Utc::now() - started).num_milliseconds();
                    info!("{}: item {} finished in {}ms", run_id, index, elapsed);
                    summary.completed += 1;
                    outputs.push(OutputItem::Completed {
                        index,
                        output,
                        binary,
                    });
                }
                Err(error) => {
                    if !self.continue_on_fail {
                        return Err(error.into());
                    }
                    warn!("{}: item {} failed: {}", run_id, index, error);
                    summary.failed += 1;
                    outputs.push(OutputItem::Failed {
                        index,
                        error: error.to_string(),
                    });
                }
            }
        }

        info!(
            "{}: done, {} completed, {} failed",
            run_id, summary.completed, summary.failed
        );
        Ok(outputs)
    }

    async fn process_item(
        &self,
        index: usize,
        item: &mut InputItem,
    ) -> Result<(OperationOutput, FilePart), TaskError> {
        let file = item.binaries.remove(&item.params.binary_property).ok_or_else(|| {
            TaskError::config(
                index,
                format!("item has no binary field '{}'", item.params.binary_property),
            )
        })?;

        let output = self.run_item(index, &item.params, &file).await?;
        Ok((output, file))
    }

    async fn run_item(
        &self,
        index: usize,
        params: &ItemParams,
        file: &FilePart,
    ) -> Result<OperationOutput, TaskError> {
        let request = submit::build_submission(index, params, file)?;
        info!("submitting {} job for '{}'", params.operation, request.file_name);

        let created = self
            .transport
            .submit(&request)
            .await
            .map_err(|source| TaskError::api(index, source))?;

        let raw = match probe::extract_task_id(&created) {
            Some(task_id) => {
                let policy = PollPolicy::resolve(params.operation, &params.poll);
                debug!(
                    "task {} accepted, polling every {:?} for up to {} attempts",
                    task_id, policy.interval, policy.max_attempts
                );
                poller::poll_until_terminal(self.transport.as_ref(), index, &task_id, &policy)
                    .await?
            }
            None => {
                debug!("create response carried no task id, treating it as the final result");
                created
            }
        };

        Ok(normalize(params, &request.file_name, probe::unwrap_result(&raw)))
    }
}

fn normalize(params: &ItemParams, source_file: &str, payload: Value) -> OperationOutput {
    let source_file = source_file.to_string();
    match params.operation {
        Operation::Transcribe => OperationOutput::Transcribe {
            source_file,
            transcription: transcription_text(&payload),
            model_used: params.model.clone(),
        },
        Operation::Diarize => OperationOutput::Diarize {
            source_file,
            diarization: payload,
        },
        Operation::Sentiment => OperationOutput::Sentiment {
            source_file,
            sentiment: payload,
        },
        Operation::Summarize => OperationOutput::Summarize {
            source_file,
            summary: summary_value(payload),
        },
    }
}

fn transcription_text(payload: &Value) -> String {
    if let Some(text) = payload.as_str() {
        return text.trim().to_string();
    }
    payload
        .get("text")
        .and_then(Value::as_str)
        .or_else(|| payload.get("transcription").and_then(Value::as_str))
        .or_else(|| payload.pointer("/data/text").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

fn summary_value(payload: Value) -> Value {
    if payload.is_string() {
        return payload;
    }
    for key in ["summary", "result", "text"] {
        if let Some(inner) = payload.get(key) {
            return inner.clone();
        }
    }
    payload
}

//! Request construction: endpoint routing per operation, summarize prompt
//! resolution and the multipart inputs for the create call.

use crate::error::TaskError;
use crate::task::item::ItemParams;
use crate::task::types::{
    FilePart, Operation, SubmissionRequest, DEFAULT_FILE_NAME, DEFAULT_MIME_TYPE,
};

/// Sub-task value selecting the canned meeting-summary mode.
pub const MEETING_SUMMARY_TASK: &str = "meeting_summary";
/// Prompt wildcard understood by the summarize endpoint.
pub const WILDCARD_PROMPT: &str = "*";

pub fn build_submission(
    item: usize,
    params: &ItemParams,
    file: &FilePart,
) -> Result<SubmissionRequest, TaskError> {
    let mut query = Vec::new();
    let mut form_fields = Vec::new();

    match params.operation {
        Operation::Transcribe => {
            if let Some(model) = &params.model {
                form_fields.push(("model", model.clone()));
            }
        }
        Operation::Diarize | Operation::Sentiment => {}
        Operation::Summarize => {
            let task = params
                .summarize
                .task
                .as_deref()
                .map(str::trim)
                .filter(|task| !task.is_empty())
                .ok_or_else(|| {
                    TaskError::config(item, "summarize requires a sub-task selector")
                })?;
            query.push(("task", task.to_string()));
            query.push(("prompt", effective_prompt(task, &params.summarize.prompt)));
            query.push(("thinking", params.summarize.thinking.to_string()));
        }
    }

    Ok(SubmissionRequest {
        path: params.operation.endpoint(),
        query,
        form_fields,
        file_name: file
            .file_name
            .clone()
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
        mime_type: file
            .mime_type
            .clone()
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
        data: file.data.clone(),
    })
}

// the canned mode ignores user text entirely; custom prompts fall back to
// the wildcard when they trim to nothing
fn effective_prompt(task: &str, prompt: &str) -> String {
    if task == MEETING_SUMMARY_TASK {
        return WILDCARD_PROMPT.to_string();
    }
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        WILDCARD_PROMPT.to_string()
    } else {
        trimmed.to_string()
    }
}

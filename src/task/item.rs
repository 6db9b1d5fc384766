use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::task::types::{FilePart, Operation, PollSettings, DEFAULT_BINARY_PROPERTY};

/// One unit of work as handed over by the host: named binary attachments
/// plus the parameters configured for this item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputItem {
    #[serde(default)]
    pub binaries: HashMap<String, FilePart>,
    pub params: ItemParams,
}

impl InputItem {
    pub fn new(params: ItemParams) -> Self {
        Self {
            binaries: HashMap::new(),
            params,
        }
    }

    pub fn with_binary(mut self, name: impl Into<String>, part: FilePart) -> Self {
        self.binaries.insert(name.into(), part);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemParams {
    pub operation: Operation,
    /// Name of the binary field holding the audio payload.
    pub binary_property: String,
    /// Model selector, honored for transcribe jobs.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub poll: PollSettings,
    #[serde(default)]
    pub summarize: SummarizeOptions,
}

impl ItemParams {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            binary_property: DEFAULT_BINARY_PROPERTY.to_string(),
            model: None,
            poll: PollSettings::default(),
            summarize: SummarizeOptions::default(),
        }
    }

    pub fn with_binary_property(mut self, name: impl Into<String>) -> Self {
        self.binary_property = name.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_poll(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_summarize(mut self, summarize: SummarizeOptions) -> Self {
        self.summarize = summarize;
        self
    }
}

/// Summarize-only knobs. `task` selects the canned meeting-summary mode or
/// a free-form user prompt; it is required for summarize jobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizeOptions {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub thinking: bool,
}

impl SummarizeOptions {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: Some(task.into()),
            prompt: String::new(),
            thinking: false,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_thinking(mut self, thinking: bool) -> Self {
        self.thinking = thinking;
        self
    }
}

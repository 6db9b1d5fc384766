use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BINARY_PROPERTY: &str = "data";
pub const DEFAULT_FILE_NAME: &str = "audio";
pub const DEFAULT_MIME_TYPE: &str = "audio/mpeg";

pub const MIN_POLL_INTERVAL_MS: u64 = 500;
pub const MAX_POLL_INTERVAL_MS: u64 = 900_000;
pub const MIN_POLL_ATTEMPTS: u32 = 1;
pub const MAX_POLL_ATTEMPTS: u32 = 1_000;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3_000;
pub const DEFAULT_POLL_ATTEMPTS: u32 = 60;
// summarization jobs run noticeably longer than the audio tasks
pub const DEFAULT_SUMMARIZE_POLL_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_SUMMARIZE_POLL_ATTEMPTS: u32 = 120;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Transcribe,
    Diarize,
    Sentiment,
    Summarize,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Transcribe => "transcribe",
            Operation::Diarize => "diarize",
            Operation::Sentiment => "sentiment",
            Operation::Summarize => "summarize",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Operation::Transcribe => "/api/v1/transcribe/do_transcribe",
            Operation::Diarize => "/api/v1/diarization/do_diarize",
            Operation::Sentiment => "/api/v1/sentiment_analysis/analyze_file",
            Operation::Summarize => "/api/v1/ai_service/summarize_file",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "transcribe" => Ok(Operation::Transcribe),
            "diarize" => Ok(Operation::Diarize),
            "sentiment" => Ok(Operation::Sentiment),
            "summarize" => Ok(Operation::Summarize),
            other => Err(format!("unknown operation: {}", other)),
        }
    }
}

/// A configuration value as reported by the host: never seen, seen with its
/// default, or explicitly set by the user. The distinction drives the legacy
/// poll-setting override in [`PollPolicy::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Setting<T> {
    Unset,
    Default(T),
    Explicit(T),
}

impl<T: Copy> Setting<T> {
    pub fn get(&self) -> Option<T> {
        match self {
            Setting::Unset => None,
            Setting::Default(value) | Setting::Explicit(value) => Some(*value),
        }
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, Setting::Explicit(_))
    }
}

impl<T> Default for Setting<T> {
    fn default() -> Self {
        Setting::Unset
    }
}

/// Poll settings as configured on an item. The plain pair applies to
/// transcribe/diarize/sentiment and doubles as the legacy shared pair that
/// older configurations used for every task type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PollSettings {
    #[serde(default)]
    pub interval_ms: Setting<u64>,
    #[serde(default)]
    pub max_attempts: Setting<u32>,
    #[serde(default)]
    pub summarize_interval_ms: Setting<u64>,
    #[serde(default)]
    pub summarize_max_attempts: Setting<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval_ms: u64, max_attempts: u32) -> Self {
        Self {
            interval: Duration::from_millis(
                interval_ms.clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS),
            ),
            max_attempts: max_attempts.clamp(MIN_POLL_ATTEMPTS, MAX_POLL_ATTEMPTS),
        }
    }

    /// Fix the policy for one item before its loop starts. Summarize has its
    /// own keys and defaults; when those keys were never explicitly set and
    /// the legacy shared key holds a non-default value, the legacy value wins.
    pub fn resolve(operation: Operation, settings: &PollSettings) -> Self {
        match operation {
            Operation::Summarize => Self::new(
                effective(
                    settings.summarize_interval_ms,
                    settings.interval_ms,
                    DEFAULT_POLL_INTERVAL_MS,
                    DEFAULT_SUMMARIZE_POLL_INTERVAL_MS,
                ),
                effective(
                    settings.summarize_max_attempts,
                    settings.max_attempts,
                    DEFAULT_POLL_ATTEMPTS,
                    DEFAULT_SUMMARIZE_POLL_ATTEMPTS,
                ),
            ),
            _ => Self::new(
                settings.interval_ms.get().unwrap_or(DEFAULT_POLL_INTERVAL_MS),
                settings.max_attempts.get().unwrap_or(DEFAULT_POLL_ATTEMPTS),
            ),
        }
    }
}

fn effective<T: Copy + PartialEq>(
    newer: Setting<T>,
    legacy: Setting<T>,
    legacy_default: T,
    fallback: T,
) -> T {
    if let Setting::Explicit(value) = newer {
        return value;
    }
    if let Setting::Explicit(value) = legacy {
        if value != legacy_default {
            return value;
        }
    }
    fallback
}

/// A named binary attachment on an input item. Raw bytes stay in memory but
/// are elided from serialized records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilePart {
    #[serde(skip)]
    pub data: Vec<u8>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

impl FilePart {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            file_name: None,
            mime_type: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// One fully resolved create call: endpoint, query pairs, the file part and
/// any extra multipart text fields. Built fresh per item, never reused.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
    pub form_fields: Vec<(&'static str, String)>,
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// The normalized per-item record, tagged with the operation that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum OperationOutput {
    Transcribe {
        source_file: String,
        transcription: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model_used: Option<String>,
    },
    Diarize {
        source_file: String,
        diarization: Value,
    },
    Sentiment {
        source_file: String,
        sentiment: Value,
    },
    Summarize {
        source_file: String,
        summary: Value,
    },
}

/// Per-item result handed back to the caller, paired to its input index.
/// Completed records carry the original attachment forward; failed records
/// (continue-on-fail runs) carry only the error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OutputItem {
    Completed {
        index: usize,
        output: OperationOutput,
        binary: FilePart,
    },
    Failed {
        index: usize,
        error: String,
    },
}

impl OutputItem {
    pub fn index(&self) -> usize {
        match self {
            OutputItem::Completed { index, .. } | OutputItem::Failed { index, .. } => *index,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub completed: usize,
    pub failed: usize,
}

use std::fmt::Display;

/// Everything that can go wrong while driving one item through the task
/// lifecycle. Each variant carries the index of the offending item so a
/// continue-on-fail run can pair errors back to their inputs.
#[derive(Debug)]
pub enum TaskError {
    /// Bad or missing item configuration. Never retried.
    Config { item: usize, message: String },
    /// The submission or status call itself failed.
    Api { item: usize, source: anyhow::Error },
    /// The backend reported the job as failed or canceled.
    RemoteFailure { item: usize, message: String },
    /// The poll budget ran out before the job reached a terminal state.
    PollTimeout {
        item: usize,
        task_id: String,
        attempts: u32,
    },
}

impl TaskError {
    pub fn config(item: usize, message: impl Into<String>) -> Self {
        TaskError::Config {
            item,
            message: message.into(),
        }
    }

    pub fn api(item: usize, source: anyhow::Error) -> Self {
        TaskError::Api { item, source }
    }

    pub fn remote_failure(item: usize, message: impl Into<String>) -> Self {
        TaskError::RemoteFailure {
            item,
            message: message.into(),
        }
    }

    pub fn item(&self) -> usize {
        match self {
            TaskError::Config { item, .. }
            | TaskError::Api { item, .. }
            | TaskError::RemoteFailure { item, .. }
            | TaskError::PollTimeout { item, .. } => *item,
        }
    }
}

impl Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskError::Config { item, message } => write!(f, "item {}: {}", item, message),
            TaskError::Api { item, source } => {
                write!(f, "item {}: request failed: {}", item, source)
            }
            TaskError::RemoteFailure { item, message } => {
                write!(f, "item {}: task failed: {}", item, message)
            }
            TaskError::PollTimeout {
                item,
                task_id,
                attempts,
            } => write!(
                f,
                "item {}: task {} did not reach a terminal state after {} attempts",
                item, task_id, attempts
            ),
        }
    }
}

impl std::error::Error for TaskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaskError::Api { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

use std::sync::Arc;

pub mod item;
pub mod poller;
pub mod probe;
pub mod runner;
pub mod submit;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use item::{InputItem, ItemParams, SummarizeOptions};
pub use runner::TaskRunner;
pub use types::{
    FilePart, Operation, OperationOutput, OutputItem, PollPolicy, PollSettings, RunSummary,
    Setting, SubmissionRequest, DEFAULT_BINARY_PROPERTY,
};

use crate::client::{Credentials, HttpSpeechClient};

/// Build a runner wired to the real HTTP transport.
pub fn create_runner(credentials: Credentials) -> TaskRunner {
    TaskRunner::new(Arc::new(HttpSpeechClient::new(credentials)))
}

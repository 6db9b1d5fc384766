//! The bounded poll loop: query the status endpoint at a fixed interval
//! until the job succeeds, fails, or the attempt budget runs out. The sleep
//! between attempts is the only suspension point in the whole lifecycle.

use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::client::SpeechTransport;
use crate::error::TaskError;
use crate::task::probe;
use crate::task::types::PollPolicy;

pub(crate) enum StatusClass {
    Succeeded,
    Failed(String),
    Running,
}

// failure is checked first so a failed payload that also carries a result
// wrapper is never mistaken for success
pub(crate) fn classify(payload: &Value) -> StatusClass {
    if probe::is_terminal_failure(payload) {
        return StatusClass::Failed(probe::failure_message(payload));
    }
    if probe::is_terminal_success(payload) {
        return StatusClass::Succeeded;
    }
    StatusClass::Running
}

/// Poll until terminal, returning the final status payload on success.
/// Issues at most `policy.max_attempts` status calls; a failure
/// classification stops the loop immediately with no further requests.
pub async fn poll_until_terminal(
    transport: &dyn SpeechTransport,
    item: usize,
    task_id: &str,
    policy: &PollPolicy,
) -> Result<Value, TaskError> {
    for attempt in 1..=policy.max_attempts {
        let payload = transport
            .task_status(task_id)
            .await
            .map_err(|source| TaskError::api(item, source))?;

        match classify(&payload) {
            StatusClass::Succeeded => {
                info!("task {} completed after {} attempt(s)", task_id, attempt);
                return Ok(payload);
            }
            StatusClass::Failed(message) => {
                warn!("task {} reported failure: {}", task_id, message);
                return Err(TaskError::remote_failure(item, message));
            }
            StatusClass::Running => {
                debug!(
                    "task {} still running (attempt {}/{})",
                    task_id, attempt, policy.max_attempts
                );
                if attempt < policy.max_attempts {
                    sleep(policy.interval).await;
                }
            }
        }
    }

    Err(TaskError::PollTimeout {
        item,
        task_id: task_id.to_string(),
        attempts: policy.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::testing::ScriptedTransport;
    use serde_json::json;

    fn policy(max_attempts: u32) -> PollPolicy {
        PollPolicy::new(500, max_attempts)
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_payload_once_completed() {
        let transport = ScriptedTransport::new(json!({})).with_statuses(vec![
            json!({"status": "processing"}),
            json!({"status": "completed", "result": {"text": "hello"}}),
        ]);

        let payload = poll_until_terminal(&transport, 0, "abc", &policy(10))
            .await
            .unwrap();
        assert_eq!(payload["result"]["text"], "hello");
        assert_eq!(transport.status_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_exactly_max_attempts() {
        let transport =
            ScriptedTransport::new(json!({})).with_statuses(vec![json!({"status": "processing"})]);

        let err = poll_until_terminal(&transport, 2, "abc", &policy(3))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TaskError::PollTimeout { item: 2, attempts: 3, ref task_id } if task_id == "abc"
        ));
        assert_eq!(transport.status_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_stops_polling_immediately() {
        let transport = ScriptedTransport::new(json!({})).with_statuses(vec![
            json!({"status": "failed", "error": "bad audio"}),
            json!({"status": "completed"}),
        ]);

        let err = poll_until_terminal(&transport, 0, "abc", &policy(10))
            .await
            .unwrap_err();
        match err {
            TaskError::RemoteFailure { message, .. } => assert!(message.contains("bad audio")),
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(transport.status_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_status_with_result_terminates() {
        let transport = ScriptedTransport::new(json!({}))
            .with_statuses(vec![json!({"status": "archived", "result": {"text": "t"}})]);

        let payload = poll_until_terminal(&transport, 0, "abc", &policy(5))
            .await
            .unwrap();
        assert_eq!(payload["status"], "archived");
        assert_eq!(transport.status_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_propagates_with_item_index() {
        let transport = ScriptedTransport::new(json!({}));

        let err = poll_until_terminal(&transport, 7, "abc", &policy(2))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Api { item: 7, .. }));
    }
}

//! Shape-probing over the loosely specified status contract. The backend
//! names the task id, the job state and the result wrapper differently
//! depending on endpoint version, so every lookup here walks an ordered
//! candidate list and returns the first hit. All functions are pure and
//! total over arbitrary JSON.

use serde_json::Value;

const TASK_ID_KEYS: [&str; 3] = ["task_id", "taskId", "id"];
const STATUS_KEYS: [&str; 3] = ["status", "state", "task_status"];
const RESULT_KEYS: [&str; 4] = ["result", "data", "output", "response"];

const SUCCESS_STATUSES: [&str; 4] = ["completed", "done", "success", "finished"];
const FAILURE_STATUSES: [&str; 4] = ["failed", "error", "canceled", "cancelled"];
const RUNNING_STATUSES: [&str; 5] = ["queued", "pending", "processing", "running", "in_progress"];

/// Find the job identifier in a create response. Absence is meaningful: it
/// signals the backend completed the job synchronously.
pub fn extract_task_id(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    for key in TASK_ID_KEYS {
        if let Some(id) = id_value(object.get(key)) {
            return Some(id);
        }
    }
    id_value(object.get("task").and_then(|task| task.get("id")))
}

fn id_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// The job state string under whichever key carries it, trimmed and
/// case-folded. Non-string values are skipped.
pub fn normalized_status(value: &Value) -> Option<String> {
    for key in STATUS_KEYS {
        if let Some(status) = value.get(key).and_then(Value::as_str) {
            return Some(status.trim().to_ascii_lowercase());
        }
    }
    None
}

pub fn has_result_field(value: &Value) -> bool {
    RESULT_KEYS.iter().any(|key| value.get(key).is_some())
}

/// Success is detected by two independent signals: an explicit terminal
/// status string, or a result payload arriving without any recognizable
/// still-running status. The second signal covers endpoint versions that
/// omit or rename the status field entirely.
pub fn is_terminal_success(value: &Value) -> bool {
    match normalized_status(value) {
        Some(status) if SUCCESS_STATUSES.contains(&status.as_str()) => true,
        Some(status) if RUNNING_STATUSES.contains(&status.as_str()) => false,
        _ => has_result_field(value),
    }
}

pub fn is_terminal_failure(value: &Value) -> bool {
    matches!(normalized_status(value), Some(status) if FAILURE_STATUSES.contains(&status.as_str()))
}

/// Backend-supplied failure text, falling back to the raw payload when the
/// response carries neither an `error` nor a `message` field.
pub fn failure_message(value: &Value) -> String {
    for key in ["error", "message"] {
        if let Some(message) = value.get(key).and_then(Value::as_str) {
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }
    value.to_string()
}

/// Pull the actual payload out of whichever wrapper field the backend used,
/// or hand the whole payload back when none is present.
pub fn unwrap_result(value: &Value) -> Value {
    for key in RESULT_KEYS {
        if let Some(inner) = value.get(key) {
            return inner.clone();
        }
    }
    value.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_id_candidates_all_yield_same_id() {
        for payload in [
            json!({"task_id": "x"}),
            json!({"taskId": "x"}),
            json!({"id": "x"}),
            json!({"task": {"id": "x"}}),
        ] {
            assert_eq!(extract_task_id(&payload).as_deref(), Some("x"));
        }
    }

    #[test]
    fn test_task_id_absent() {
        assert_eq!(extract_task_id(&json!({})), None);
        assert_eq!(extract_task_id(&json!("not an object")), None);
        assert_eq!(extract_task_id(&json!(42)), None);
        assert_eq!(extract_task_id(&json!({"task_id": null})), None);
        assert_eq!(extract_task_id(&json!({"task_id": ""})), None);
    }

    #[test]
    fn test_task_id_precedence_and_numbers() {
        let payload = json!({"id": "fallback", "task_id": "primary"});
        assert_eq!(extract_task_id(&payload).as_deref(), Some("primary"));

        assert_eq!(extract_task_id(&json!({"id": 77})).as_deref(), Some("77"));
    }

    #[test]
    fn test_success_statuses_under_every_key() {
        for key in ["status", "state", "task_status"] {
            for status in ["completed", "done", "success", "finished"] {
                let payload = json!({ key: status });
                assert!(is_terminal_success(&payload), "{}={}", key, status);
            }
        }
    }

    #[test]
    fn test_status_is_trimmed_and_case_folded() {
        assert!(is_terminal_success(&json!({"status": "  Completed "})));
        assert!(is_terminal_failure(&json!({"state": "FAILED"})));
    }

    #[test]
    fn test_result_presence_implies_success_without_status() {
        for key in ["result", "data", "output", "response"] {
            let payload = json!({ key: {"text": "hi"} });
            assert!(is_terminal_success(&payload), "{}", key);
        }
        assert!(!is_terminal_success(&json!({})));
    }

    #[test]
    fn test_running_status_blocks_result_presence_signal() {
        for status in ["queued", "pending", "processing", "running", "in_progress"] {
            let payload = json!({"status": status, "result": {"text": "hi"}});
            assert!(!is_terminal_success(&payload), "{}", status);
        }
    }

    #[test]
    fn test_unrecognized_status_with_result_counts_as_success() {
        // deliberate: an unknown terminal-looking state such as "archived"
        // plus a result payload is accepted rather than polled forever
        let payload = json!({"status": "archived", "result": {}});
        assert!(is_terminal_success(&payload));

        assert!(!is_terminal_success(&json!({"status": "archived"})));
        assert!(!is_terminal_failure(&json!({"status": "archived"})));
    }

    #[test]
    fn test_failure_statuses() {
        for status in ["failed", "error", "canceled", "cancelled"] {
            assert!(is_terminal_failure(&json!({"status": status})), "{}", status);
        }
        assert!(!is_terminal_failure(&json!({"status": "completed"})));
        assert!(!is_terminal_failure(&json!({})));
    }

    #[test]
    fn test_failure_message_sources() {
        assert_eq!(failure_message(&json!({"error": "bad audio"})), "bad audio");
        assert_eq!(failure_message(&json!({"message": "rejected"})), "rejected");
        let raw = json!({"status": "failed", "code": 13});
        assert_eq!(failure_message(&raw), raw.to_string());
    }

    #[test]
    fn test_unwrap_result_precedence() {
        let payload = json!({"data": {"a": 1}, "result": {"b": 2}});
        assert_eq!(unwrap_result(&payload), json!({"b": 2}));

        let bare = json!({"segments": [1, 2, 3]});
        assert_eq!(unwrap_result(&bare), bare);
    }
}

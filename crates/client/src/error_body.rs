//! Error messages from non-2xx responses.
//!
//! The service reports failures as JSON. Validation failures carry a list of
//! `{"msg": ..}` objects under `detail`; everything else carries a `detail`
//! or `message` string.

use serde_json::Value;

/// Build a user-facing message from an error response body.
///
/// Preference order: `detail` string, `detail` list of `{msg}` objects joined
/// by `", "`, `message` string, then a generic message with the status code.
pub fn extract_error_message(status: u16, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    parsed
        .as_ref()
        .and_then(message_from_json)
        .unwrap_or_else(|| fallback_message(status))
}

fn message_from_json(value: &Value) -> Option<String> {
    match value.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => return Some(detail.clone()),
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !msgs.is_empty() {
                return Some(msgs.join(", "));
            }
        }
        _ => {}
    }

    match value.get("message") {
        Some(Value::String(message)) if !message.is_empty() => Some(message.clone()),
        _ => None,
    }
}

fn fallback_message(status: u16) -> String {
    format!("Request failed with status {}", status)
}

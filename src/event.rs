use serde_json::Value;

/// A single inbound call event. Built fresh from each request payload
/// and discarded once the response is written.
#[derive(Debug, Clone)]
pub struct CallEvent {
    pub target_name: String,
    pub caller_id: String,
    pub timestamp: Option<String>,
}

impl CallEvent {
    /// Extract the fields we care about from an arbitrary webhook
    /// payload. The platform is inconsistent about the timestamp field
    /// name, so the first non-empty string among `timestamp`, `callTime`
    /// and `callDate` wins; anything else is treated as absent.
    pub fn from_payload(payload: &Value) -> Self {
        let target_name = payload
            .get("targetName")
            .map(value_to_text)
            .unwrap_or_default();

        let caller_id = match payload.get("callerId") {
            None | Some(Value::Null) => "Unknown".to_string(),
            Some(value) => value_to_text(value),
        };

        let timestamp = ["timestamp", "callTime", "callDate"]
            .iter()
            .find_map(|field| match payload.get(*field) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                _ => None,
            });

        Self {
            target_name,
            caller_id,
            timestamp,
        }
    }
}

/// Render a JSON value the way an operator would read it: strings
/// unquoted, null as empty, anything else in its JSON form.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

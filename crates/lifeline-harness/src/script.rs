#![forbid(unsafe_code)]

//! JSONL lifecycle scripts.
//!
//! One JSON object per line, `{"event": "<name>"}`, where `<name>` is the
//! lowercase event name (`create`, `start`, `resume`, `pause`, `stop`,
//! `destroy`). Blank lines are skipped. The format exists so captured event
//! sequences can be replayed deterministically in CI.

use lifeline_core::Event;
use serde_json::Value;

/// Errors from script parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// A line was not a JSON object with a string `event` field.
    Malformed { line: usize, message: String },
    /// The `event` field named no known lifecycle event.
    UnknownEvent { line: usize, name: String },
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed { line, message } => {
                write!(f, "script line {line}: {message}")
            }
            Self::UnknownEvent { line, name } => {
                write!(f, "script line {line}: unknown event '{name}'")
            }
        }
    }
}

impl std::error::Error for ScriptError {}

fn event_from_name(name: &str) -> Option<Event> {
    match name {
        "create" => Some(Event::Create),
        "start" => Some(Event::Start),
        "resume" => Some(Event::Resume),
        "pause" => Some(Event::Pause),
        "stop" => Some(Event::Stop),
        "destroy" => Some(Event::Destroy),
        _ => None,
    }
}

/// Parse a JSONL script into its event sequence.
///
/// # Errors
///
/// [`ScriptError::Malformed`] for unparsable or mis-shaped lines,
/// [`ScriptError::UnknownEvent`] for unrecognized event names. Line numbers
/// are 1-based.
pub fn parse_script(input: &str) -> Result<Vec<Event>, ScriptError> {
    let mut events = Vec::new();
    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(raw).map_err(|err| ScriptError::Malformed {
            line,
            message: err.to_string(),
        })?;
        let name = value
            .get("event")
            .and_then(Value::as_str)
            .ok_or_else(|| ScriptError::Malformed {
                line,
                message: "missing string field 'event'".to_string(),
            })?;
        let event = event_from_name(name).ok_or_else(|| ScriptError::UnknownEvent {
            line,
            name: name.to_string(),
        })?;
        events.push(event);
    }
    Ok(events)
}

/// Serialize an event sequence as a JSONL script.
#[must_use]
pub fn write_script(events: &[Event]) -> String {
    let mut out = String::new();
    for event in events {
        out.push_str(&serde_json::json!({ "event": event.to_string() }).to_string());
        out.push('\n');
    }
    out
}

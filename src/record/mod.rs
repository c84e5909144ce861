mod serializer;

use serde::Serialize;
use serde_json::value::RawValue;

pub use self::serializer::{serialize, serialize_display, serialize_list, SERIALIZATION_FALLBACK};

/// Severity attached to every shipped record.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    level: Level,
    data: &'a RawValue,
}

/// One line of the wire body: `{"level":<level>,"data":<payload>}`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogRecord(String);

impl LogRecord {
    /// Wraps an already serialized JSON payload.
    ///
    /// Line breaks between the tokens of the payload are removed, so a
    /// record always fits on one line of the wire body. If the payload is
    /// not valid JSON it is replaced by [`SERIALIZATION_FALLBACK`].
    pub fn encode(level: Level, data: String) -> LogRecord {
        let raw_data = single_line_payload(data)
            .or_else(|| RawValue::from_string(SERIALIZATION_FALLBACK.to_string()).ok());
        let line = raw_data
            .and_then(|data| serde_json::to_string(&Envelope { level, data: &data }).ok())
            .unwrap_or_else(|| {
                format!(
                    r#"{{"level":"{}","data":{}}}"#,
                    level.as_str(),
                    SERIALIZATION_FALLBACK
                )
            });
        LogRecord(line)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Valid JSON never holds a raw line break inside a string, so any `\n` or
// `\r` left after validation is whitespace between tokens.
fn single_line_payload(data: String) -> Option<Box<RawValue>> {
    let raw_data = RawValue::from_string(data).ok()?;
    if !raw_data.get().contains(LINE_BREAKS) {
        return Some(raw_data);
    }
    RawValue::from_string(raw_data.get().replace(LINE_BREAKS, "")).ok()
}

const LINE_BREAKS: &[char] = &['\n', '\r'];

use std::collections::HashMap;

/// First character of the status code; anything else goes uncounted.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum StatusClass {
    Success,
    Redirect,
    ClientError,
    ServerError,
}

impl StatusClass {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.as_bytes().first() {
            Some(b'2') => Some(StatusClass::Success),
            Some(b'3') => Some(StatusClass::Redirect),
            Some(b'4') => Some(StatusClass::ClientError),
            Some(b'5') => Some(StatusClass::ServerError),
            _ => None,
        }
    }
}

/// One accepted log line, normalized. Produced only by the record parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Path with query and fragment stripped.
    pub uri: String,
    pub method: String,
    pub status: Option<StatusClass>,
    /// Seconds.
    pub response_time: f64,
    /// Bytes.
    pub body_size: f64,
}

/// Identifies one row of output.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct AggregateKey {
    pub uri: String,
    pub method: String,
}

impl AggregateKey {
    pub fn of(record: &Record) -> Self {
        Self {
            uri: record.uri.clone(),
            method: record.method.clone(),
        }
    }
}

/// A raw line as the tokenizer saw it, kept for the inspector pane.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub sorted_labels: Vec<String>,
    pub fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new(fields: HashMap<String, String>) -> Self {
        let mut sorted_labels: Vec<String> = fields.keys().cloned().collect();
        sorted_labels.sort();
        Self {
            sorted_labels,
            fields,
        }
    }
}

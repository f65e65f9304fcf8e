//! Wire types for the agent backend API.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response of `GET /documents`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentList {
    /// Display names of the indexed documents.
    #[serde(default)]
    pub documents: Vec<String>,
}

/// Response of `POST /upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// File name as recorded by the backend.
    pub filename: String,
    /// Number of chunks the document was split into.
    pub chunks: u64,
}

/// Body of `POST /query`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    /// The user's question, as typed.
    pub query: &'a str,
}

/// Response of `POST /query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnswer {
    /// The agent's answer.
    pub response: String,
    /// Tools the agent used, in the order reported.
    #[serde(default)]
    pub tools_used: Option<Vec<String>>,
    /// Backend-side answer time.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl QueryAnswer {
    /// Backend timestamp as UTC.
    ///
    /// Accepts RFC 3339 and naive ISO-8601 (`2024-05-01T10:00:00.123456`),
    /// the latter read as UTC.
    pub fn answered_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// A file picked by the user, ready to be forwarded to the backend.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original file name.
    pub filename: String,
    /// Content type supplied by the browser, if any.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Content type to send: the supplied one, else a guess from the extension.
    pub fn mime_type(&self) -> String {
        self.content_type
            .clone()
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| {
                mime_guess::from_path(&self.filename)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            })
    }
}

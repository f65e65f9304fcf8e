//! Conversation message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who a message is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Typed by the user.
    User,
    /// Answer (or answer failure) from the agent.
    Bot,
    /// Local notification about a document operation.
    System,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
            Self::System => "system",
        }
    }
}

/// A single entry in the conversation history.
///
/// Messages are immutable once appended to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique within the session, increasing in append order.
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    /// Tools reported by the backend for this answer. Only set on bot replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools_used: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Tools to display, if any.
    pub fn tools(&self) -> &[String] {
        self.tools_used.as_deref().unwrap_or_default()
    }
}

/// System message for a successful upload.
pub(crate) fn upload_succeeded(filename: &str, chunks: u64) -> String {
    format!("✅ Document \"{filename}\" uploaded successfully! ({chunks} chunks processed)")
}

/// System message for a failed upload.
pub(crate) fn upload_failed(error: &str) -> String {
    format!("❌ Failed to upload document: {error}")
}

/// System message for a successful clear.
pub(crate) const DOCUMENTS_CLEARED: &str = "🗑️ All documents cleared from vector store.";

/// Bot message for a failed query.
pub(crate) fn query_failed(error: &str) -> String {
    format!(
        "❌ Sorry, I encountered an error: {error}. Please make sure the backend server is running."
    )
}

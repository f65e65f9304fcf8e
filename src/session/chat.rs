//! Chat session state and the operations that drive it.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::message::{self, Message, MessageKind};
use crate::backend::{AgentBackend, UploadFile};

/// Result of a session operation.
///
/// Failures are already folded into the session state (banner and, where
/// relevant, an inline message); the outcome is for callers that log or test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A guard rejected the operation; nothing was requested.
    Skipped,
    /// The backend call succeeded.
    Succeeded,
    /// The backend call failed.
    Failed,
}

/// Mutable UI state of one chat session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    /// Text currently in the input box.
    pub input: String,
    /// A query is in flight.
    pub loading: bool,
    /// An upload is in flight.
    pub uploading: bool,
    /// Error banner text.
    pub error: Option<String>,
    /// Conversation history, append-only.
    pub messages: Vec<Message>,
    /// Cached document names, replaced wholesale from the backend.
    pub documents: Vec<String>,
}

impl SessionState {
    fn append(
        &mut self,
        kind: MessageKind,
        content: impl Into<String>,
        tools_used: Option<Vec<String>>,
        timestamp: DateTime<Utc>,
    ) {
        // Append-only, so the position doubles as a unique, increasing id.
        self.messages.push(Message {
            id: self.messages.len() as u64 + 1,
            kind,
            content: content.into(),
            tools_used,
            timestamp,
        });
    }
}

/// Point-in-time copy of a session, used for rendering and the JSON API.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    #[serde(flatten)]
    pub state: SessionState,
}

/// One page load's worth of chat UI state.
///
/// Cloning is cheap and shares the underlying state. Locks are only held
/// between backend calls, never across them.
#[derive(Debug, Clone)]
pub struct ChatSession {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    id: String,
    created_at: DateTime<Utc>,
    last_activity: RwLock<DateTime<Utc>>,
    state: RwLock<SessionState>,
}

impl ChatSession {
    pub(super) fn new(id: String) -> Self {
        let now = Utc::now();
        Self {
            inner: Arc::new(SessionInner {
                id,
                created_at: now,
                last_activity: RwLock::new(now),
                state: RwLock::new(SessionState::default()),
            }),
        }
    }

    /// Get the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Copy the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.inner.id.clone(),
            created_at: self.inner.created_at,
            last_activity: *self
                .inner
                .last_activity
                .read()
                .unwrap_or_else(PoisonError::into_inner),
            state: self.read().clone(),
        }
    }

    /// Whether a query or an upload is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        let state = self.read();
        state.loading || state.uploading
    }

    /// Whether the session has been idle longer than `timeout`.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        let last = *self
            .inner
            .last_activity
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        // Negative durations (clock skew) count as fresh.
        (Utc::now() - last)
            .to_std()
            .is_ok_and(|idle| idle > timeout)
    }

    /// Replace the document list with the backend's.
    ///
    /// Failures are logged and leave the previous list in place.
    pub async fn fetch_documents(&self, backend: &dyn AgentBackend) -> Outcome {
        self.touch();
        match backend.list_documents().await {
            Ok(documents) => {
                let count = documents.len();
                self.write().documents = documents;
                tracing::debug!(
                    name: "session.documents.refreshed",
                    session_id = %self.id(),
                    count,
                    "Document list refreshed"
                );
                Outcome::Succeeded
            }
            Err(e) => {
                warn!(
                    name: "session.documents.fetch_failed",
                    session_id = %self.id(),
                    error = %e,
                    "Error fetching documents"
                );
                Outcome::Failed
            }
        }
    }

    /// Forward a picked file to the backend, then refresh the document list.
    ///
    /// Skipped when no file was picked or another upload is in flight.
    pub async fn upload_document(
        &self,
        backend: &dyn AgentBackend,
        file: Option<UploadFile>,
    ) -> Outcome {
        self.touch();
        let Some(file) = file.filter(|f| !f.filename.trim().is_empty()) else {
            return Outcome::Skipped;
        };
        {
            let mut state = self.write();
            if state.uploading {
                return Outcome::Skipped;
            }
            state.uploading = true;
            state.error = None;
        }

        let filename = file.filename.clone();
        let outcome = match backend.upload_document(file).await {
            Ok(receipt) => {
                info!(
                    name: "session.upload.completed",
                    session_id = %self.id(),
                    filename = %receipt.filename,
                    chunks = receipt.chunks,
                    "Document uploaded"
                );
                self.write().append(
                    MessageKind::System,
                    message::upload_succeeded(&receipt.filename, receipt.chunks),
                    None,
                    Utc::now(),
                );
                self.fetch_documents(backend).await;
                Outcome::Succeeded
            }
            Err(e) => {
                warn!(
                    name: "session.upload.failed",
                    session_id = %self.id(),
                    filename = %filename,
                    error = %e,
                    "Document upload failed"
                );
                let mut state = self.write();
                state.error = Some(format!("Upload failed: {e}"));
                state.append(
                    MessageKind::System,
                    message::upload_failed(&e.to_string()),
                    None,
                    Utc::now(),
                );
                Outcome::Failed
            }
        };

        self.write().uploading = false;
        outcome
    }

    /// Record an upload that never reached the backend, e.g. a request body
    /// over the size limit. Reported the same way as a backend failure.
    pub fn reject_upload(&self, reason: &str) {
        self.touch();
        warn!(
            name: "session.upload.rejected",
            session_id = %self.id(),
            reason = %reason,
            "Upload rejected before reaching the backend"
        );
        let mut state = self.write();
        state.error = Some(format!("Upload failed: {reason}"));
        state.append(
            MessageKind::System,
            message::upload_failed(reason),
            None,
            Utc::now(),
        );
    }

    /// Remove every document from the backend.
    pub async fn clear_documents(&self, backend: &dyn AgentBackend) -> Outcome {
        self.touch();
        match backend.clear_documents().await {
            Ok(()) => {
                info!(
                    name: "session.documents.cleared",
                    session_id = %self.id(),
                    "Documents cleared"
                );
                let mut state = self.write();
                state.documents.clear();
                state.append(
                    MessageKind::System,
                    message::DOCUMENTS_CLEARED,
                    None,
                    Utc::now(),
                );
                Outcome::Succeeded
            }
            Err(e) => {
                warn!(
                    name: "session.documents.clear_failed",
                    session_id = %self.id(),
                    error = %e,
                    "Clearing documents failed"
                );
                self.write().error = Some(format!("Clear failed: {e}"));
                Outcome::Failed
            }
        }
    }

    /// Send a question to the agent.
    ///
    /// Blank input and sends while another query is in flight are no-ops.
    /// The user message is appended before the request is made.
    pub async fn send_query(&self, backend: &dyn AgentBackend, text: &str) -> Outcome {
        self.touch();
        {
            let mut state = self.write();
            if text.trim().is_empty() || state.loading {
                state.input = text.to_string();
                return Outcome::Skipped;
            }
            state.append(MessageKind::User, text, None, Utc::now());
            state.input.clear();
            state.loading = true;
            state.error = None;
        }

        let outcome = match backend.query(text).await {
            Ok(answer) => {
                let tools = answer.tools_used.clone().unwrap_or_default();
                info!(
                    name: "session.query.answered",
                    session_id = %self.id(),
                    tools = ?tools,
                    "Query answered"
                );
                let timestamp = answer.answered_at().unwrap_or_else(Utc::now);
                self.write()
                    .append(MessageKind::Bot, answer.response, Some(tools), timestamp);
                Outcome::Succeeded
            }
            Err(e) => {
                warn!(
                    name: "session.query.failed",
                    session_id = %self.id(),
                    error = %e,
                    "Query failed"
                );
                let mut state = self.write();
                state.error = Some(format!("Query failed: {e}"));
                state.append(
                    MessageKind::Bot,
                    message::query_failed(&e.to_string()),
                    None,
                    Utc::now(),
                );
                Outcome::Failed
            }
        };

        self.write().loading = false;
        self.touch();
        outcome
    }

    /// Hide the error banner.
    pub fn dismiss_error(&self) {
        self.touch();
        self.write().error = None;
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn touch(&self) {
        let mut guard = self
            .inner
            .last_activity
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Utc::now();
    }
}

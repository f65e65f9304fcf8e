//! Agent backend client.
//!
//! The agent backend owns the document store, retrieval and tool
//! orchestration. This application only calls four of its endpoints:
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | list documents | GET | `/documents` |
//! | upload | POST | `/upload` |
//! | clear | DELETE | `/documents` |
//! | query | POST | `/query` |
//!
//! [`AgentBackend`] is the seam the chat session talks to; [`HttpAgentBackend`]
//! is the reqwest implementation used in production.

mod client;
mod error;
mod types;

use async_trait::async_trait;

pub use client::HttpAgentBackend;
pub use error::{BackendError, Operation, Result};
pub use types::{DocumentList, QueryAnswer, QueryRequest, UploadFile, UploadReceipt};

/// Operations the chat UI needs from the agent backend.
#[async_trait]
pub trait AgentBackend: Send + Sync + std::fmt::Debug {
    /// Fetch the names of all indexed documents.
    async fn list_documents(&self) -> Result<Vec<String>>;

    /// Upload one document for ingestion.
    async fn upload_document(&self, file: UploadFile) -> Result<UploadReceipt>;

    /// Remove every document from the backend's store.
    async fn clear_documents(&self) -> Result<()>;

    /// Ask the agent a question.
    async fn query(&self, query: &str) -> Result<QueryAnswer>;
}

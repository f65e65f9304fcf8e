//! HTTP implementation of [`AgentBackend`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use url::Url;

use super::error::{BackendError, Operation, Result};
use super::types::{DocumentList, QueryAnswer, QueryRequest, UploadFile, UploadReceipt};
use super::AgentBackend;

/// Agent backend reached over HTTP.
///
/// # Example
///
/// ```rust,no_run
/// use xyz_assistant::backend::{AgentBackend, HttpAgentBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpAgentBackend::new("http://localhost:8000")?;
/// let documents = backend.list_documents().await?;
/// let answer = backend.query("What is XYZ?").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpAgentBackend {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpAgentBackend {
    /// Create a client for the backend at `base_url`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client with an optional per-request timeout.
    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(base_url, builder.build()?)
    }

    /// Create a client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self { base_url, http })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // Plain concatenation keeps any path prefix on the base URL.
    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn check(operation: Operation, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            tracing::debug!(
                name: "backend.call.rejected",
                operation = %operation,
                status = status.as_u16(),
                "Backend returned a non-success status"
            );
            Err(BackendError::Status { operation, status })
        }
    }
}

#[async_trait]
impl AgentBackend for HttpAgentBackend {
    async fn list_documents(&self) -> Result<Vec<String>> {
        let response = self.http.get(self.endpoint("/documents")).send().await?;
        let list: DocumentList = Self::check(Operation::ListDocuments, response)?
            .json()
            .await?;
        Ok(list.documents)
    }

    async fn upload_document(&self, file: UploadFile) -> Result<UploadReceipt> {
        let mime = file.mime_type();
        let part = Part::bytes(file.bytes)
            .file_name(file.filename)
            .mime_str(&mime)?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(self.endpoint("/upload"))
            .multipart(form)
            .send()
            .await?;
        Ok(Self::check(Operation::Upload, response)?.json().await?)
    }

    async fn clear_documents(&self) -> Result<()> {
        let response = self.http.delete(self.endpoint("/documents")).send().await?;
        Self::check(Operation::ClearDocuments, response)?;
        Ok(())
    }

    async fn query(&self, query: &str) -> Result<QueryAnswer> {
        let response = self
            .http
            .post(self.endpoint("/query"))
            .json(&QueryRequest { query })
            .send()
            .await?;
        Ok(Self::check(Operation::Query, response)?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        extract::{Multipart, State},
        http::StatusCode,
        routing::{get, post},
    };
    use serde_json::{Value, json};

    use super::*;

    #[derive(Debug, Default)]
    struct Seen {
        query_bodies: Vec<Value>,
        uploads: Vec<(String, String, String, Vec<u8>)>,
        deletes: usize,
    }

    type Shared = Arc<Mutex<Seen>>;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn recording_backend(seen: Shared) -> Router {
        Router::new()
            .route(
                "/api/documents",
                get(|| async { Json(json!({"documents": ["a.txt", "b.pdf"]})) }).delete(
                    |State(seen): State<Shared>| async move {
                        seen.lock().unwrap().deletes += 1;
                        StatusCode::NO_CONTENT
                    },
                ),
            )
            .route(
                "/api/query",
                post(|State(seen): State<Shared>, Json(body): Json<Value>| async move {
                    seen.lock().unwrap().query_bodies.push(body);
                    Json(json!({
                        "response": "XYZ is...",
                        "tools_used": ["Tavily Web Search"],
                        "timestamp": "2024-05-01T10:00:00Z"
                    }))
                }),
            )
            .route(
                "/api/upload",
                post(|State(seen): State<Shared>, mut multipart: Multipart| async move {
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        let name = field.name().unwrap_or_default().to_string();
                        let filename = field.file_name().unwrap_or_default().to_string();
                        let content_type = field.content_type().unwrap_or_default().to_string();
                        let bytes = field.bytes().await.unwrap().to_vec();
                        seen.lock()
                            .unwrap()
                            .uploads
                            .push((name, filename, content_type, bytes));
                    }
                    Json(json!({"filename": "notes.txt", "chunks": 3}))
                }),
            )
            .with_state(seen)
    }

    #[test]
    fn endpoint_keeps_path_prefix() {
        let backend = HttpAgentBackend::new("http://example.com/api/").unwrap();
        assert_eq!(backend.endpoint("/query"), "http://example.com/api/query");

        let backend = HttpAgentBackend::new("http://localhost:8000").unwrap();
        assert_eq!(backend.endpoint("/documents"), "http://localhost:8000/documents");
    }

    #[test]
    fn rejects_relative_base_url() {
        let err = HttpAgentBackend::new("/relative").unwrap_err();
        assert!(matches!(err, BackendError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn calls_every_endpoint_with_expected_shapes() {
        let seen = Shared::default();
        let base = serve(recording_backend(Arc::clone(&seen))).await;
        let backend = HttpAgentBackend::new(format!("{base}/api")).unwrap();

        let documents = backend.list_documents().await.unwrap();
        assert_eq!(documents, vec!["a.txt".to_string(), "b.pdf".to_string()]);

        let answer = backend.query("What is XYZ?").await.unwrap();
        assert_eq!(answer.response, "XYZ is...");
        assert_eq!(answer.tools_used, Some(vec!["Tavily Web Search".to_string()]));

        let receipt = backend
            .upload_document(UploadFile::new("notes.txt", b"hello".to_vec()))
            .await
            .unwrap();
        assert_eq!(receipt.filename, "notes.txt");
        assert_eq!(receipt.chunks, 3);

        backend.clear_documents().await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.query_bodies, vec![json!({"query": "What is XYZ?"})]);
        assert_eq!(seen.uploads.len(), 1);
        let (field, filename, content_type, bytes) = &seen.uploads[0];
        assert_eq!(field, "file");
        assert_eq!(filename, "notes.txt");
        assert_eq!(content_type, "text/plain");
        assert_eq!(bytes, b"hello");
        assert_eq!(seen.deletes, 1);
    }

    #[tokio::test]
    async fn non_success_status_collapses_to_operation_message() {
        let app = Router::new()
            .route(
                "/documents",
                get(|| async { StatusCode::INTERNAL_SERVER_ERROR })
                    .delete(|| async { StatusCode::FORBIDDEN }),
            )
            .route("/query", post(|| async { StatusCode::BAD_GATEWAY }))
            .route("/upload", post(|| async { StatusCode::UNPROCESSABLE_ENTITY }));
        let backend = HttpAgentBackend::new(serve(app).await).unwrap();

        let err = backend.list_documents().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch documents");

        let err = backend.clear_documents().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to clear documents");

        let err = backend.query("hi").await.unwrap_err();
        assert!(matches!(
            err,
            BackendError::Status { operation: Operation::Query, status }
                if status == StatusCode::BAD_GATEWAY
        ));

        let err = backend
            .upload_document(UploadFile::new("x.md", Vec::new()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to upload document");
    }

    #[tokio::test]
    async fn malformed_body_is_a_transport_error() {
        let app = Router::new().route("/query", post(|| async { "not json" }));
        let backend = HttpAgentBackend::new(serve(app).await).unwrap();

        let err = backend.query("hi").await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
    }
}

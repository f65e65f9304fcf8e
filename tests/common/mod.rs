//! Shared fixtures: an in-process agent backend and a wired-up test server.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_test::TestServer;
use serde_json::{Value, json};
use xyz_assistant::{
    AppState,
    backend::HttpAgentBackend,
    config::AppConfig,
    server,
    session::ChatSession,
};

/// What the fake backend holds and how it should behave.
#[derive(Debug, Default)]
pub struct MockState {
    pub documents: Vec<String>,
    pub queries: Vec<String>,
    pub uploads: Vec<(String, Vec<u8>)>,
    pub deletes: usize,
    /// Every endpoint answers 500 while set.
    pub failing: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn with_documents(names: &[&str]) -> Self {
        let backend = Self::default();
        backend.lock().documents = names.iter().map(ToString::to_string).collect();
        backend
    }

    pub fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/documents", get(list).delete(clear))
            .route("/upload", post(upload))
            .route("/query", post(query))
            .with_state(self.clone())
    }

    /// Serve on an ephemeral port and return the base URL.
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        let app = self.router();
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend");
        });
        format!("http://{addr}")
    }
}

type Reply = Result<Json<Value>, StatusCode>;

async fn list(State(mock): State<MockBackend>) -> Reply {
    let state = mock.lock();
    if state.failing {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(json!({ "documents": state.documents })))
}

async fn clear(State(mock): State<MockBackend>) -> Reply {
    let mut state = mock.lock();
    if state.failing {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    state.deletes += 1;
    state.documents.clear();
    Ok(Json(json!({ "message": "cleared" })))
}

async fn upload(State(mock): State<MockBackend>, mut multipart: Multipart) -> Reply {
    if mock.lock().failing {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    while let Some(field) = multipart.next_field().await.expect("multipart") {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.expect("file bytes").to_vec();
        let mut state = mock.lock();
        state.documents.push(filename.clone());
        state.uploads.push((filename.clone(), bytes));
        return Ok(Json(json!({ "filename": filename, "chunks": 3 })));
    }
    Err(StatusCode::UNPROCESSABLE_ENTITY)
}

async fn query(State(mock): State<MockBackend>, Json(body): Json<Value>) -> Reply {
    let mut state = mock.lock();
    if state.failing {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let text = body["query"].as_str().unwrap_or_default().to_string();
    state.queries.push(text.clone());
    Ok(Json(json!({
        "response": format!("You asked: {text}"),
        "tools_used": ["Tavily Web Search"],
        "timestamp": "2024-05-01T12:00:00"
    })))
}

/// App under test, pointed at a running mock backend.
pub struct Harness {
    pub server: TestServer,
    pub state: AppState,
    pub mock: MockBackend,
    pub backend_url: String,
}

impl Harness {
    pub async fn start(mock: MockBackend) -> Self {
        Self::start_with(mock, |_| {}).await
    }

    /// Start with a tweaked configuration.
    pub async fn start_with(mock: MockBackend, configure: impl FnOnce(&mut AppConfig)) -> Self {
        let backend_url = mock.spawn().await;
        Self::build(mock, backend_url, configure)
    }

    /// Point the app at `backend_url` regardless of where `mock` listens.
    pub fn with_backend_url(mock: MockBackend, backend_url: String) -> Self {
        Self::build(mock, backend_url, |_| {})
    }

    fn build(
        mock: MockBackend,
        backend_url: String,
        configure: impl FnOnce(&mut AppConfig),
    ) -> Self {
        let mut config =
            AppConfig::load_from_args(["xyz-assistant", "--backend-url", &backend_url])
                .expect("test config");
        configure(&mut config);
        let backend = HttpAgentBackend::new(&backend_url).expect("backend client");
        let state = AppState::new(Arc::new(backend), Arc::new(config));
        let server = TestServer::new(server::router(state.clone())).expect("test server");
        Self {
            server,
            state,
            mock,
            backend_url,
        }
    }

    /// A session that already exists in the store.
    pub fn session(&self, id: &str) -> ChatSession {
        self.state.sessions.create_with_id(id)
    }
}

/// Pull the session id out of a rendered page.
pub fn session_id_from(html: &str) -> String {
    let marker = "data-session-id=\"";
    let start = html.find(marker).expect("session id attribute") + marker.len();
    let end = html[start..].find('"').expect("closing quote") + start;
    html[start..end].to_string()
}

impl Harness {
    /// Messages of a session, read through the JSON API shape.
    pub fn session_messages(&self, id: &str) -> Vec<Value> {
        let session = self.state.sessions.get(id).expect("session exists");
        let snapshot = serde_json::to_value(session.snapshot()).expect("snapshot json");
        snapshot["messages"].as_array().cloned().unwrap_or_default()
    }
}

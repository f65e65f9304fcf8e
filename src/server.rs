use axum::{
    Form, Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, multipart::MultipartError},
    http::{HeaderMap, HeaderName, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::backend::{HttpAgentBackend, UploadFile};
use crate::config::AppConfig;
use crate::session::{ChatSession, SessionSnapshot};
use crate::ui::{self, PageContext};

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("session not found: {0}")]
    SessionNotFound(String),
}

/// Carries what the error page needs besides the error itself.
struct ErrorPage {
    ctx: Arc<PageContext>,
    htmx: bool,
    error: AppError,
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        match self.error {
            AppError::SessionNotFound(id) => {
                tracing::debug!(name: "http.session.missing", session_id = %id, "Unknown session");
                if self.htmx {
                    // 4xx responses are not swapped; send the notice with a redirect
                    // to a fresh session instead.
                    (
                        [(HeaderName::from_static("hx-redirect"), "/")],
                        Html(ui::render_missing_fragment()),
                    )
                        .into_response()
                } else {
                    (
                        StatusCode::NOT_FOUND,
                        Html(ui::render_missing_session(&self.ctx)),
                    )
                        .into_response()
                }
            }
        }
    }
}

/// Build the application state from configuration.
pub fn build_state(config: Arc<AppConfig>) -> anyhow::Result<AppState> {
    let backend = HttpAgentBackend::with_timeout(
        &config.backend.base_url,
        config.backend.request_timeout(),
    )?;
    Ok(AppState::new(Arc::new(backend), config))
}

/// Build the router with all routes and layers.
pub fn router(state: AppState) -> Router {
    let max_upload = state.config.server.max_upload_bytes;
    let static_dir = state.config.ui.static_dir.clone();

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(|| async { "ok" }))
        .route("/sessions/{id}", get(session_page))
        .route("/sessions/{id}/query", post(send_query))
        .route(
            "/sessions/{id}/upload",
            post(upload_document).layer(DefaultBodyLimit::max(max_upload)),
        )
        .route(
            "/sessions/{id}/documents",
            get(refresh_documents).delete(clear_documents),
        )
        .route("/sessions/{id}/documents/clear", post(clear_documents))
        .route("/sessions/{id}/error/dismiss", post(dismiss_error))
        .route("/api/sessions/{id}", get(api_session))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    info!(
        name: "backend.config.loaded",
        base_url = %config.backend.base_url,
        timeout_secs = ?config.backend.request_timeout_secs,
        "Agent backend configured"
    );

    let state = build_state(Arc::clone(&config))?;
    let _sweeper = state.sessions.spawn_sweeper(
        config.sessions.sweep_interval(),
        config.sessions.idle_timeout(),
    );

    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn lookup(state: &AppState, headers: &HeaderMap, id: &str) -> Result<ChatSession, ErrorPage> {
    state.sessions.get(id).ok_or_else(|| ErrorPage {
        ctx: Arc::clone(&state.page),
        htmx: is_htmx(headers),
        error: AppError::SessionNotFound(id.to_string()),
    })
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

/// HTMX requests get the `#workspace` fragment, plain form posts the page.
fn render(state: &AppState, headers: &HeaderMap, session: &SessionSnapshot) -> Html<String> {
    if is_htmx(headers) {
        Html(ui::render_fragment(&state.page, session))
    } else {
        Html(ui::render_page(&state.page, session))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - New session per page load, documents fetched before first render.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let session = state.sessions.create();
    info!(name: "session.created", session_id = %session.id(), "Chat session created");
    session.fetch_documents(state.backend.as_ref()).await;
    Html(ui::render_page(&state.page, &session.snapshot()))
}

/// GET /sessions/:id - Re-render an existing session.
async fn session_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Html<String>, ErrorPage> {
    let session = lookup(&state, &headers, &id)?;
    Ok(render(&state, &headers, &session.snapshot()))
}

/// Form body of the query form.
#[derive(Debug, Deserialize)]
struct QueryForm {
    #[serde(default)]
    query: String,
}

/// POST /sessions/:id/query - Ask the agent.
async fn send_query(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<QueryForm>,
) -> Result<Html<String>, ErrorPage> {
    let session = lookup(&state, &headers, &id)?;
    session
        .send_query(state.backend.as_ref(), &form.query)
        .await;
    Ok(render(&state, &headers, &session.snapshot()))
}

/// POST /sessions/:id/upload - Forward the `file` part to the backend.
async fn upload_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Html<String>, ErrorPage> {
    let session = lookup(&state, &headers, &id)?;
    match read_file_part(multipart).await {
        Ok(file) => {
            session
                .upload_document(state.backend.as_ref(), file)
                .await;
        }
        // Oversized or truncated bodies never reach the backend.
        Err(e) => session.reject_upload(&e.body_text()),
    }
    Ok(render(&state, &headers, &session.snapshot()))
}

/// Pull the first `file` part out of the form. `None` when nothing was picked.
async fn read_file_part(mut multipart: Multipart) -> Result<Option<UploadFile>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        if filename.is_empty() {
            return Ok(None);
        }
        let mut file = UploadFile::new(filename, bytes.to_vec());
        file.content_type = content_type;
        return Ok(Some(file));
    }
    Ok(None)
}

/// GET /sessions/:id/documents - Refresh the document list.
async fn refresh_documents(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Html<String>, ErrorPage> {
    let session = lookup(&state, &headers, &id)?;
    session.fetch_documents(state.backend.as_ref()).await;
    Ok(render(&state, &headers, &session.snapshot()))
}

/// DELETE /sessions/:id/documents (or POST .../documents/clear) - Clear all.
async fn clear_documents(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Html<String>, ErrorPage> {
    let session = lookup(&state, &headers, &id)?;
    session.clear_documents(state.backend.as_ref()).await;
    Ok(render(&state, &headers, &session.snapshot()))
}

/// POST /sessions/:id/error/dismiss - Hide the error banner.
async fn dismiss_error(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Html<String>, ErrorPage> {
    let session = lookup(&state, &headers, &id)?;
    session.dismiss_error();
    Ok(render(&state, &headers, &session.snapshot()))
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /api/sessions/:id - Session state as JSON.
async fn api_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, StatusCode> {
    state
        .sessions
        .get(&id)
        .map(|session| Json(session.snapshot()))
        .ok_or(StatusCode::NOT_FOUND)
}

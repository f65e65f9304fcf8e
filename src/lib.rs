//! XYZ Virtual Assistant
//!
//! A browser chat UI for a document-aware agent. Users upload documents,
//! see what is indexed, and chat with an agent backend that may answer from
//! the documents or from web search.
//!
//! # Architecture
//!
//! - **Server**: Axum application rendering HTML, progressively enhanced with HTMX
//! - **Sessions**: One in-memory chat session per page load
//! - **Backend client**: Thin reqwest client for the agent backend's four endpoints
//!
//! # Modules
//!
//! - [`backend`]: Agent backend trait, HTTP client and wire types
//! - [`config`]: Layered configuration (defaults, YAML, env, CLI)
//! - [`server`]: Router, handlers and startup
//! - [`session`]: Chat session state and operations
//! - [`telemetry`]: Tracing subscriber setup
//! - [`ui`]: HTML rendering

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unused_async)]

pub mod backend;
pub mod config;
pub mod server;
pub mod session;
pub mod telemetry;
pub mod ui;

use std::sync::Arc;

use backend::AgentBackend;
use config::AppConfig;
use session::SessionStore;
use ui::PageContext;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Agent backend client.
    pub backend: Arc<dyn AgentBackend>,
    /// Live chat sessions, one per page load.
    pub sessions: SessionStore,
    /// Static values the templates need.
    pub page: Arc<PageContext>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.backend)
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Assemble state around an existing backend.
    pub fn new(backend: Arc<dyn AgentBackend>, config: Arc<AppConfig>) -> Self {
        let page = Arc::new(PageContext {
            title: config.ui.title.clone(),
            backend_url: config.backend.base_url.clone(),
        });
        Self {
            backend,
            sessions: SessionStore::new(),
            page,
            config,
        }
    }
}

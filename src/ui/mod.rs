//! Server-rendered UI.
//!
//! Markup is produced as plain HTML strings from a [`SessionSnapshot`]. Every
//! action re-renders the whole `#workspace` element; HTMX swaps it in place,
//! and without HTMX the forms post normally and get the full page back.
//!
//! # Structure
//!
//! - [`shell`]: document head, inline styles and client helpers
//! - [`workspace`]: header, error banner and the two-column layout
//! - [`documents`]: document panel (upload, clear, list, backend status)
//! - [`conversation`]: message history and the input form

pub mod conversation;
pub mod documents;
pub mod icons;
pub mod shell;
pub mod workspace;

use crate::session::SessionSnapshot;

/// File types offered by the upload picker. Not enforced server-side.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[".txt", ".md", ".pdf"];

/// Static settings the templates need besides session state.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Page and header title.
    pub title: String,
    /// Agent backend base URL, shown in the status panel.
    pub backend_url: String,
}

/// Render the full page for a session.
pub fn render_page(ctx: &PageContext, session: &SessionSnapshot) -> String {
    shell::html_shell(&ctx.title, &workspace::render(ctx, session))
}

/// Render only the `#workspace` fragment.
pub fn render_fragment(ctx: &PageContext, session: &SessionSnapshot) -> String {
    workspace::render(ctx, session)
}

/// Page shown for an unknown or expired session id.
pub fn render_missing_session(ctx: &PageContext) -> String {
    shell::html_shell(&ctx.title, &render_missing_fragment())
}

/// The expired-session notice as a `#workspace` replacement.
pub fn render_missing_fragment() -> String {
    r#"<div id="workspace" class="card header">
            <p>This chat session has expired. <a href="/">Start a new one</a>.</p>
        </div>"#
        .to_string()
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// URL of a per-session route.
pub(crate) fn session_path(session_id: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        format!("/sessions/{session_id}")
    } else {
        format!("/sessions/{session_id}/{suffix}")
    }
}

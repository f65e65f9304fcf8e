//! Document panel: upload, clear, list and backend status.

use super::icons::Icon;
use super::{ACCEPTED_EXTENSIONS, PageContext, escape, session_path};
use crate::session::SessionSnapshot;

/// Tools the agent backend is known to offer, as `(icon, label, class)`.
const AVAILABLE_TOOLS: &[(Icon, &str, &str)] = &[
    (Icon::Database, "Vector Store (ChromaDB)", "tool--store"),
    (Icon::Globe, "Tavily Web Search", "tool--search"),
];

pub fn render(ctx: &PageContext, session: &SessionSnapshot) -> String {
    let state = &session.state;
    let items: String = state
        .documents
        .iter()
        .map(|name| format!(r#"<li title="{name}">{name}</li>"#, name = escape(name)))
        .collect();
    let tools: String = AVAILABLE_TOOLS
        .iter()
        .map(|(icon, label, class)| {
            format!(
                r#"<div class="tool {class}">{}<span>{label}</span></div>"#,
                icon.render("")
            )
        })
        .collect();
    let (dot, status) = if state.loading {
        ("dot is-busy", "Processing...")
    } else {
        ("dot", "Ready")
    };

    format!(
        r#"<aside class="card sidebar">
            <h3>{file_icon}Documents ({count})</h3>
            {upload}
            {clear}
            <ul class="documents">{items}</ul>
            <div class="section">
                <h4>AVAILABLE TOOLS</h4>
                {tools}
            </div>
            <div class="section status">
                <h4>BACKEND STATUS</h4>
                <p>API: {api}</p>
                <div><span class="{dot}"></span><span>{status}</span></div>
            </div>
        </aside>"#,
        file_icon = Icon::FileText.render("icon-md"),
        count = state.documents.len(),
        upload = upload_form(session),
        clear = clear_form(session),
        api = escape(&ctx.backend_url),
    )
}

/// File picker that submits as soon as a file is chosen.
fn upload_form(session: &SessionSnapshot) -> String {
    let action = escape(&session_path(&session.id, "upload"));
    let uploading = session.state.uploading;
    let (label, label_class, disabled) = if uploading {
        ("Uploading...", "upload is-disabled", " disabled")
    } else {
        ("Upload Document", "upload", "")
    };
    format!(
        r##"<form method="post" action="{action}" enctype="multipart/form-data"
                hx-post="{action}" hx-encoding="multipart/form-data" hx-target="#workspace" hx-swap="outerHTML">
            <label class="{label_class}">
                {icon}<span>{label}</span>
                <input type="file" name="file" accept="{accept}" onchange="this.form.requestSubmit()"{disabled}>
            </label>
            <noscript><button type="submit">Upload</button></noscript>
        </form>"##,
        icon = Icon::Upload.render(""),
        accept = ACCEPTED_EXTENSIONS.join(","),
    )
}

/// "Clear All" control; only offered when there is something to clear.
fn clear_form(session: &SessionSnapshot) -> String {
    if session.state.documents.is_empty() {
        return String::new();
    }
    let action = escape(&session_path(&session.id, "documents/clear"));
    let hx_delete = escape(&session_path(&session.id, "documents"));
    format!(
        r##"<form method="post" action="{action}" hx-delete="{hx_delete}" hx-target="#workspace" hx-swap="outerHTML">
            <button type="submit" class="clear">{icon}Clear All</button>
        </form>"##,
        icon = Icon::Trash.render(""),
    )
}

//! The swappable `#workspace` element.

use super::icons::Icon;
use super::{PageContext, conversation, documents, escape, session_path};
use crate::session::SessionSnapshot;

/// Header, banner and both panels.
pub fn render(ctx: &PageContext, session: &SessionSnapshot) -> String {
    format!(
        r#"<div id="workspace" data-session-id="{id}">
    {header}
    {banner}
    <div class="layout">
        {sidebar}
        {chat}
    </div>
</div>"#,
        id = escape(&session.id),
        header = header(ctx, session.state.documents.len()),
        banner = banner(session),
        sidebar = documents::render(ctx, session),
        chat = conversation::render(session),
    )
}

fn header(ctx: &PageContext, document_count: usize) -> String {
    format!(
        r#"<header class="card header">
        <div class="brand">
            <div class="brand-mark">{bot}</div>
            <div>
                <h1>{title}</h1>
                <p>AI Agent with LangChain, Vector Store &amp; Tavily Search</p>
            </div>
        </div>
        <div class="doc-count">{db}<span>{document_count} documents</span></div>
    </header>"#,
        bot = Icon::Bot.render("icon-lg"),
        db = Icon::Database.render("icon-md"),
        title = escape(&ctx.title),
    )
}

/// Dismissible error banner; empty when there is no error.
fn banner(session: &SessionSnapshot) -> String {
    let Some(error) = &session.state.error else {
        return String::new();
    };
    let action = escape(&session_path(&session.id, "error/dismiss"));
    format!(
        r##"<div class="banner" role="alert">
        {alert}
        <p>{error}</p>
        <form method="post" action="{action}" hx-post="{action}" hx-target="#workspace" hx-swap="outerHTML">
            <button type="submit" aria-label="Dismiss">{close}</button>
        </form>
    </div>"##,
        alert = Icon::AlertCircle.render("icon-md"),
        close = Icon::X.render("icon-md"),
        error = escape(error),
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::session::SessionState;

    fn snapshot(state: SessionState) -> SessionSnapshot {
        SessionSnapshot {
            id: "s1".into(),
            created_at: Utc::now(),
            last_activity: Utc::now(),
            state,
        }
    }

    fn ctx() -> PageContext {
        PageContext {
            title: "XYZ Virtual Assistant".into(),
            backend_url: "http://localhost:8000".into(),
        }
    }

    #[test]
    fn banner_only_when_error_set() {
        let html = render(&ctx(), &snapshot(SessionState::default()));
        assert!(!html.contains("role=\"alert\""));
        assert!(html.contains("0 documents"));

        let state = SessionState {
            error: Some("Query failed: <boom>".into()),
            ..SessionState::default()
        };
        let html = render(&ctx(), &snapshot(state));
        assert!(html.contains("role=\"alert\""));
        assert!(html.contains("Query failed: &lt;boom&gt;"));
        assert!(html.contains("/sessions/s1/error/dismiss"));
        assert!(html.contains(&Icon::X.render("icon-md")));
    }
}

//! Conversation panel: message history and input form.

use super::icons::Icon;
use super::{escape, session_path};
use crate::session::{Message, MessageKind, SessionSnapshot};

pub fn render(session: &SessionSnapshot) -> String {
    let state = &session.state;
    let body = if state.messages.is_empty() {
        welcome()
    } else {
        state.messages.iter().map(message).collect()
    };

    format!(
        r#"<section class="card chat">
            <div id="messages" class="messages" aria-live="polite" aria-label="Chat messages">
                {body}
                {processing}
                <div id="messages-end"></div>
            </div>
            {composer}
        </section>"#,
        processing = processing(state.loading),
        composer = composer(session),
    )
}

fn welcome() -> String {
    format!(
        r#"<div class="welcome">
            {icon}
            <strong>Welcome to XYZ Virtual Assistant</strong>
            <p>I'm powered by LangChain agents with access to your documents (vector store)
            and real-time web search via Tavily API. Upload documents and ask me anything!</p>
        </div>"#,
        icon = Icon::Bot.render("icon-xl"),
    )
}

/// One message bubble with its avatar and, for bot replies, the tool tags.
pub fn message(message: &Message) -> String {
    let kind = message.kind.as_str();
    let icon = match message.kind {
        MessageKind::User => Icon::User,
        MessageKind::Bot | MessageKind::System => Icon::Bot,
    };
    let tools = if message.tools().is_empty() {
        String::new()
    } else {
        let tags: String = message
            .tools()
            .iter()
            .map(|tool| format!(r#"<span class="tag">{}</span>"#, escape(tool)))
            .collect();
        format!(r#"<div class="tools"><p>Tools used:</p><div>{tags}</div></div>"#)
    };

    format!(
        r#"<div class="message-row message-row--{kind}" data-message-id="{id}">
                <div class="message">
                    <div class="avatar avatar--{kind}">{avatar}</div>
                    <div class="bubble bubble--{kind}">
                        <p class="content">{content}</p>{tools}
                    </div>
                </div>
            </div>"#,
        id = message.id,
        avatar = icon.render("icon-md"),
        content = escape(&message.content),
    )
}

/// Processing bubble: always visible while a query is in flight, otherwise
/// the HTMX request indicator.
fn processing(loading: bool) -> String {
    let class = if loading {
        "message-row"
    } else {
        "message-row htmx-indicator"
    };
    format!(
        r#"<div id="processing" class="{class}">
                <div class="processing">{loader}<span>Agent is processing your request...</span></div>
            </div>"#,
        loader = Icon::Loader.render("icon-md"),
    )
}

fn composer(session: &SessionSnapshot) -> String {
    let state = &session.state;
    let action = escape(&session_path(&session.id, "query"));
    let input_disabled = if state.loading { " disabled" } else { "" };
    let send_disabled = if state.loading || state.input.trim().is_empty() {
        " disabled"
    } else {
        ""
    };
    format!(
        r##"<div class="composer">
                <form method="post" action="{action}" hx-post="{action}" hx-target="#workspace" hx-swap="outerHTML"
                      hx-indicator="#processing" hx-disabled-elt="find input, find button"
                      hx-on::before-request="xyz.echo(this)">
                    <input type="text" name="query" value="{value}" placeholder="Ask me anything..."
                           autocomplete="off" autofocus oninput="xyz.toggle(this)"{input_disabled}>
                    <button type="submit" aria-label="Send"{send_disabled}>{send}</button>
                </form>
                <p class="credits">Powered by LangChain • OpenAI GPT-4 • ChromaDB • Tavily Search</p>
            </div>"##,
        value = escape(&state.input),
        send = Icon::Send.render("icon-md"),
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

    fn msg(id: u64, kind: MessageKind, content: &str, tools: Option<&[&str]>) -> Message {
        Message {
            id,
            kind,
            content: content.into(),
            tools_used: tools.map(|t| t.iter().map(ToString::to_string).collect()),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn empty_history_shows_welcome() {
        let html = render(&snapshot(SessionState::default()));
        assert!(html.contains("Welcome to XYZ Virtual Assistant"));
        assert!(html.contains("htmx-indicator"));
        assert!(html.contains("action=\"/sessions/s1/query\""));
    }

    #[test]
    fn bot_reply_renders_tool_tags() {
        let html = message(&msg(
            2,
            MessageKind::Bot,
            "XYZ is...",
            Some(&["Tavily Web Search"]),
        ));
        assert!(html.contains("message-row--bot"));
        assert!(html.contains("XYZ is..."));
        assert!(html.contains("Tools used:"));
        assert!(html.contains(r#"<span class="tag">Tavily Web Search</span>"#));
    }

    #[test]
    fn empty_tool_list_renders_no_section() {
        let html = message(&msg(2, MessageKind::Bot, "plain", Some(&[])));
        assert!(!html.contains("Tools used:"));
    }

    #[test]
    fn content_is_escaped() {
        let html = message(&msg(1, MessageKind::User, "<script>x</script>", None));
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>x"));
    }

    #[test]
    fn loading_shows_processing_and_disables_input() {
        let state = SessionState {
            loading: true,
            messages: vec![msg(1, MessageKind::User, "hi", None)],
            ..SessionState::default()
        };
        let html = render(&snapshot(state));
        assert!(!html.contains("Welcome to XYZ"));
        assert!(!html.contains("htmx-indicator"));
        assert!(html.contains("Agent is processing your request..."));
        assert!(html.contains("autofocus oninput=\"xyz.toggle(this)\" disabled>"));
    }
}

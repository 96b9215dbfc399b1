//! HTML templates for the web layer.
//!
//! Templates are embedded and registered once into a shared handlebars
//! registry. Handlebars escapes interpolated values, so user questions and
//! model answers render as text, not markup.

use crate::error::{PrataError, Result};
use crate::session::ChatTurn;
use handlebars::Handlebars;
use std::sync::OnceLock;

const BASE_STYLE: &str = r#"
    body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
    form { margin: 1rem 0; }
    input[type=text] { width: 70%; padding: 0.4rem; }
    button { padding: 0.4rem 0.8rem; }
    .turn { margin: 0.75rem 0; padding: 0.5rem 0.75rem; border-radius: 0.5rem; }
    .turn.user { background: #eef2ff; }
    .turn.chatbot { background: #f0fdf4; }
    .error { color: #991b1b; }
    .muted { color: #6b7280; font-size: 0.9rem; }
"#;

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Prata</title><style>{{style}}</style></head>
<body>
  <h1>Prata</h1>
  <p>Paste a YouTube video URL and chat with its transcript.</p>
  <form method="post" action="/">
    <input type="text" name="video_url" placeholder="https://www.youtube.com/watch?v=..." required>
    <button type="submit">Start chatting</button>
  </form>
</body>
</html>"#;

const CHAT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Prata Chat</title><style>{{style}}</style></head>
<body>
  <h1>{{#if title}}{{title}}{{else}}Chat{{/if}}</h1>
  <p class="muted">{{video_url}} &middot; <a href="/">change video</a></p>

  {{#each history}}
  <div class="turn {{#if (eq speaker "User")}}user{{else}}chatbot{{/if}}">
    <strong>{{speaker}}:</strong> {{text}}
  </div>
  {{/each}}

  <form method="post" action="/chat">
    <input type="text" name="user_question" placeholder="Ask a question about the video" required>
    <button type="submit">Ask</button>
  </form>

  {{#if history}}
  <form method="post" action="/delete-chat-history">
    <button type="submit">Delete chat history</button>
  </form>
  {{/if}}
</body>
</html>"#;

const ERROR_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Prata</title><style>{{style}}</style></head>
<body>
  <h1 class="error">Sorry, something went wrong</h1>
  <p>{{message}}</p>
  <p><a href="/">Back to start</a></p>
</body>
</html>"#;

/// Shared template registry, built on first use.
fn registry() -> &'static Handlebars<'static> {
    static REGISTRY: OnceLock<Handlebars<'static>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut handlebars = Handlebars::new();
        handlebars
            .register_template_string("index", INDEX_TEMPLATE)
            .expect("index template is valid");
        handlebars
            .register_template_string("chat", CHAT_TEMPLATE)
            .expect("chat template is valid");
        handlebars
            .register_template_string("error", ERROR_TEMPLATE)
            .expect("error template is valid");
        handlebars
    })
}

/// Render the URL submission form.
pub fn render_index() -> Result<String> {
    registry()
        .render("index", &serde_json::json!({ "style": BASE_STYLE }))
        .map_err(|e| PrataError::Template(e.to_string()))
}

/// Render the chat page with the full conversation history.
pub fn render_chat(
    video_url: &str,
    title: Option<&str>,
    history: &[ChatTurn],
) -> Result<String> {
    registry()
        .render(
            "chat",
            &serde_json::json!({
                "style": BASE_STYLE,
                "video_url": video_url,
                "title": title,
                "history": history,
            }),
        )
        .map_err(|e| PrataError::Template(e.to_string()))
}

/// Render the generic error page.
pub fn render_error(message: &str) -> String {
    registry()
        .render(
            "error",
            &serde_json::json!({ "style": BASE_STYLE, "message": message }),
        )
        .unwrap_or_else(|_| format!("Sorry, something went wrong: {}", message))
}

//! Web layer for Prata.
//!
//! Three HTML routes glue the session cookie, the transcript pipeline, and
//! the conversational chain together. Internal errors are logged server-side
//! and translated into a generic error page at this boundary.

mod routes;
pub mod templates;

use crate::chain::{Chain, ConversationalChain};
use crate::config::{Prompts, Settings};
use crate::error::PrataError;
use crate::orchestrator::Orchestrator;
use axum::extract::FromRef;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::Key;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Built-in signing secret used when no real secret is configured.
///
/// Sessions signed with this key are forgeable; `AppState::new` warns when
/// it is in use.
const INSECURE_FALLBACK_SECRET: &str = "prata-insecure-fallback-secret-do-not-use-in-production";

/// Shared application state, constructed once at startup and passed into
/// every handler. No process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub chain: Arc<dyn Chain>,
    pub cookie_name: Arc<str>,
    key: Key,
}

impl AppState {
    /// Build application state from settings with default components.
    pub fn new(settings: Settings) -> Self {
        let prompts = Prompts::default();
        let chain: Arc<dyn Chain> = Arc::new(ConversationalChain::new(&settings.chain, prompts));
        let orchestrator = Arc::new(Orchestrator::new(settings.clone()));
        Self::with_components(&settings, orchestrator, chain)
    }

    /// Build application state with custom components.
    pub fn with_components(
        settings: &Settings,
        orchestrator: Arc<Orchestrator>,
        chain: Arc<dyn Chain>,
    ) -> Self {
        let secret = resolve_secret(settings.session.secret.as_deref());

        Self {
            orchestrator,
            chain,
            cookie_name: settings.session.cookie_name.as_str().into(),
            key: signing_key(&secret),
        }
    }
}

/// Required by `SignedCookieJar` to find the signing key in state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.key.clone()
    }
}

/// Resolve the configured session secret, falling back when it is missing
/// or blank. A blank secret in the TOML file is treated the same as none.
fn resolve_secret(configured: Option<&str>) -> String {
    match configured.map(str::trim) {
        Some(secret) if !secret.is_empty() => secret.to_string(),
        _ => {
            warn!(
                "No session secret configured (PRATA_SECRET_KEY); \
                 using an insecure built-in fallback"
            );
            INSECURE_FALLBACK_SECRET.to_string()
        }
    }
}

/// Derive a cookie signing key from a secret of any length.
fn signing_key(secret: &str) -> Key {
    // An empty secret would never reach the key length below
    let secret = if secret.is_empty() {
        INSECURE_FALLBACK_SECRET
    } else {
        secret
    };

    let mut bytes = secret.as_bytes().to_vec();
    while bytes.len() < 64 {
        bytes.extend_from_slice(secret.as_bytes());
    }
    Key::derive_from(&bytes)
}

/// Error type at the web boundary.
///
/// Logs the internal error and renders the generic error page; internal
/// detail never reaches the browser.
pub struct WebError(PrataError);

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        // Always log the real error
        tracing::error!("Request failed: {}", self.0);

        let status = match &self.0 {
            PrataError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PrataError::TranscriptUnavailable(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Html(templates::render_error(self.0.user_message()))).into_response()
    }
}

impl From<PrataError> for WebError {
    fn from(err: PrataError) -> Self {
        Self(err)
    }
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::home_page).post(routes::submit_url))
        .route("/chat", get(routes::chat_page).post(routes::ask_question))
        .route("/delete-chat-history", post(routes::delete_chat_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! HTTP route handlers.

use super::{templates, AppState, WebError};
use crate::chain::Chain;
use crate::error::PrataError;
use crate::session::{ChatTurn, Session};
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;
use tracing::{info, instrument};

#[derive(Deserialize)]
pub struct UrlForm {
    video_url: String,
}

#[derive(Deserialize)]
pub struct QuestionForm {
    user_question: String,
}

/// `GET /`: render the URL submission form.
pub async fn home_page() -> Result<Html<String>, WebError> {
    Ok(Html(templates::render_index()?))
}

/// `POST /`: store the submitted URL in the session and redirect to `/chat`.
#[instrument(skip_all)]
pub async fn submit_url(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<UrlForm>,
) -> Result<(SignedCookieJar, Redirect), WebError> {
    let video_url = form.video_url.trim().to_string();
    if video_url.is_empty() {
        return Err(PrataError::InvalidInput("empty video URL".to_string()).into());
    }

    let mut session = Session::from_jar(&jar, &state.cookie_name);
    info!("Video URL submitted");
    session.video_url = Some(video_url);

    Ok((session.store(jar, &state.cookie_name), Redirect::to("/chat")))
}

/// `GET /chat`: render the conversation for the session's video.
///
/// Redirects to `/` when no video URL has been submitted yet. Ensures the
/// transcript index exists (building it on first visit).
#[instrument(skip_all)]
pub async fn chat_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let session = Session::from_jar(&jar, &state.cookie_name);
    let Some(video_url) = session.video_url.clone() else {
        return Ok(Redirect::to("/").into_response());
    };

    let index = state
        .orchestrator
        .index_for(&video_url)
        .await?
        .ok_or_else(|| {
            PrataError::TranscriptUnavailable("transcript produced no chunks".to_string())
        })?;

    let html = templates::render_chat(&video_url, index.title(), &session.chat_history)?;
    Ok(Html(html).into_response())
}

/// `POST /chat`: answer a question and append both turns to the history.
#[instrument(skip_all)]
pub async fn ask_question(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<QuestionForm>,
) -> Result<Response, WebError> {
    let mut session = Session::from_jar(&jar, &state.cookie_name);
    let Some(video_url) = session.video_url.clone() else {
        return Ok(Redirect::to("/").into_response());
    };

    let question = form.user_question.trim().to_string();
    if question.is_empty() {
        return Ok(Redirect::to("/chat").into_response());
    }

    let index = state
        .orchestrator
        .index_for(&video_url)
        .await?
        .ok_or_else(|| {
            PrataError::TranscriptUnavailable("transcript produced no chunks".to_string())
        })?;

    // The chain condenses against the history as it stood before this question
    let prior_history = session.chat_history.clone();
    session.push_turn(ChatTurn::user(question.clone()));

    let answer = state.chain.run(&index, &question, &prior_history).await?;
    session.push_turn(ChatTurn::chatbot(answer));

    let html = templates::render_chat(&video_url, index.title(), &session.chat_history)?;
    Ok((session.store(jar, &state.cookie_name), Html(html)).into_response())
}

/// `POST /delete-chat-history`: clear the history, keep the video URL.
#[instrument(skip_all)]
pub async fn delete_chat_history(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> (SignedCookieJar, Redirect) {
    let mut session = Session::from_jar(&jar, &state.cookie_name);
    session.clear_history();
    info!("Chat history cleared");

    (session.store(jar, &state.cookie_name), Redirect::to("/chat"))
}

//! Browser session state carried in a signed cookie.
//!
//! The session is the only state in the app: the submitted video URL plus
//! the accumulated chat history, serialized as JSON into a server-signed
//! cookie. Nothing survives a cleared cookie or a browser change.

use axum_extra::extract::cookie::{Cookie, SignedCookieJar};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Who produced a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Chatbot,
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speaker::User => write!(f, "User"),
            Speaker::Chatbot => write!(f, "Chatbot"),
        }
    }
}

/// One immutable turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn chatbot(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Chatbot,
            text: text.into(),
        }
    }
}

/// Per-browser session state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// The submitted video URL, once the home form has been posted.
    pub video_url: Option<String>,
    /// Conversation turns in submission order.
    pub chat_history: Vec<ChatTurn>,
}

impl Session {
    /// Read the session from the signed cookie jar.
    ///
    /// A missing cookie or one that fails to parse yields a fresh session;
    /// the signature check itself is the jar's job.
    pub fn from_jar(jar: &SignedCookieJar, cookie_name: &str) -> Self {
        match jar.get(cookie_name) {
            Some(cookie) => serde_json::from_str(cookie.value()).unwrap_or_else(|e| {
                warn!("Discarding unparseable session cookie: {}", e);
                Session::default()
            }),
            None => Session::default(),
        }
    }

    /// Write the session back into the jar, returning the updated jar.
    pub fn store(&self, jar: SignedCookieJar, cookie_name: &str) -> SignedCookieJar {
        let value = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        let cookie = Cookie::build((cookie_name.to_string(), value))
            .path("/")
            .http_only(true)
            .build();
        jar.add(cookie)
    }

    /// Append a turn to the chat history.
    pub fn push_turn(&mut self, turn: ChatTurn) {
        self.chat_history.push(turn);
    }

    /// Clear the chat history, keeping the video URL.
    pub fn clear_history(&mut self) {
        self.chat_history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Key;

    #[test]
    fn test_cookie_round_trip() {
        let key = Key::generate();
        let jar = SignedCookieJar::new(key);

        let mut session = Session {
            video_url: Some("https://youtu.be/abc123def45".to_string()),
            chat_history: Vec::new(),
        };
        session.push_turn(ChatTurn::user("What is said?"));
        session.push_turn(ChatTurn::chatbot("Hello world is said."));

        let jar = session.store(jar, "prata_session");
        let restored = Session::from_jar(&jar, "prata_session");

        assert_eq!(restored, session);
        assert_eq!(restored.chat_history.len(), 2);
        assert_eq!(restored.chat_history[0].speaker, Speaker::User);
        assert_eq!(restored.chat_history[1].speaker, Speaker::Chatbot);
    }

    #[test]
    fn test_missing_cookie_yields_default() {
        let jar = SignedCookieJar::new(Key::generate());
        let session = Session::from_jar(&jar, "prata_session");
        assert!(session.video_url.is_none());
        assert!(session.chat_history.is_empty());
    }

    #[test]
    fn test_history_alternation_over_cycles() {
        let mut session = Session::default();
        for i in 0..3 {
            session.push_turn(ChatTurn::user(format!("question {}", i)));
            session.push_turn(ChatTurn::chatbot(format!("answer {}", i)));
        }

        assert_eq!(session.chat_history.len(), 6);
        for (i, turn) in session.chat_history.iter().enumerate() {
            let expected = if i % 2 == 0 { Speaker::User } else { Speaker::Chatbot };
            assert_eq!(turn.speaker, expected);
        }

        session.clear_history();
        assert!(session.chat_history.is_empty());
    }
}

//! Error types for Prata.

use thiserror::Error;

/// Library-level error type for Prata operations.
#[derive(Error, Debug)]
pub enum PrataError {
    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Chain error: {0}")]
    Chain(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl PrataError {
    /// Generic message shown to end users at the web boundary.
    ///
    /// Internal error detail is logged server-side and never rendered,
    /// so variants map to broad, safe descriptions here.
    pub fn user_message(&self) -> &'static str {
        match self {
            PrataError::TranscriptUnavailable(_) => {
                "We couldn't retrieve a transcript for this video. \
                 It may be private, unavailable, or have no captions."
            }
            PrataError::InvalidInput(_) => "That doesn't look like a valid YouTube video URL.",
            _ => "Something went wrong while processing your request. Please try again.",
        }
    }
}

/// Result type alias for Prata operations.
pub type Result<T> = std::result::Result<T, PrataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_detail() {
        let err = PrataError::OpenAI("api key sk-secret was rejected".to_string());
        assert!(!err.user_message().contains("sk-secret"));

        let err = PrataError::TranscriptUnavailable("no caption tracks".to_string());
        assert!(err.user_message().contains("transcript"));
    }
}

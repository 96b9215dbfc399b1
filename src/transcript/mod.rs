//! Transcript loading for Prata.
//!
//! Provides a trait-based interface for transcript sources. YouTube is the
//! only source today, but the seam keeps the web layer testable without
//! network access.

mod youtube;

pub use youtube::YoutubeTranscriptLoader;

use crate::error::Result;
use async_trait::async_trait;

/// A fetched transcript for one video.
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Video ID the transcript belongs to.
    pub video_id: String,
    /// Video title, when the source exposes one.
    pub title: Option<String>,
    /// Full transcript text.
    pub text: String,
}

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptLoader: Send + Sync {
    /// Fetch the transcript for a video URL.
    ///
    /// Fails with `TranscriptUnavailable` when the URL is malformed, the
    /// video is private or missing, or it carries no caption tracks.
    async fn load(&self, video_url: &str) -> Result<Transcript>;
}

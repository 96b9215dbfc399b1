//! Pipeline orchestrator for Prata.
//!
//! Coordinates transcript fetch, splitting, and index building, with a
//! per-video cache in front so a chat session pays the embedding cost once.

use crate::config::Settings;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::Result;
use crate::index::{IndexCache, TranscriptIndex};
use crate::splitter::split_transcript;
use crate::transcript::{TranscriptLoader, YoutubeTranscriptLoader};
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for the Prata pipeline.
pub struct Orchestrator {
    settings: Settings,
    loader: Arc<dyn TranscriptLoader>,
    embedder: Arc<dyn Embedder>,
    cache: IndexCache,
}

impl Orchestrator {
    /// Create a new orchestrator with default components.
    pub fn new(settings: Settings) -> Self {
        let embedder = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        ));

        Self {
            settings,
            loader: Arc::new(YoutubeTranscriptLoader::new()),
            embedder,
            cache: IndexCache::new(),
        }
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        loader: Arc<dyn TranscriptLoader>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            settings,
            loader,
            embedder,
            cache: IndexCache::new(),
        }
    }

    /// Get the index for a video URL, building and caching it on first use.
    ///
    /// Returns `Ok(None)` when the transcript splits into no chunks; the
    /// caller decides how to surface that to the user.
    #[instrument(skip(self), fields(url = %video_url))]
    pub async fn index_for(&self, video_url: &str) -> Result<Option<Arc<TranscriptIndex>>> {
        if let Some(index) = self.cache.get(video_url) {
            return Ok(Some(index));
        }

        let transcript = self.loader.load(video_url).await?;
        let chunks = split_transcript(&transcript.text, &self.settings.chunking)?;

        match TranscriptIndex::build(
            transcript.video_id,
            transcript.title,
            chunks,
            self.embedder.clone(),
        )
        .await?
        {
            Some(index) => {
                let index = Arc::new(index);
                self.cache.insert(video_url, index.clone());
                info!("Built and cached index ({} chunks)", index.len());
                Ok(Some(index))
            }
            None => Ok(None),
        }
    }

    /// Drop the cached index for a video URL.
    pub fn invalidate(&self, video_url: &str) -> bool {
        self.cache.invalidate(video_url)
    }
}

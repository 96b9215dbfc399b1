//! In-memory similarity index over transcript chunks.
//!
//! Each chunk is embedded once at build time; retrieval embeds the query and
//! ranks chunks by cosine similarity. Indexes are cached per video URL by
//! [`cache::IndexCache`] instead of being rebuilt on every request.

pub mod cache;

pub use cache::IndexCache;

use crate::embedding::Embedder;
use crate::error::Result;
use crate::splitter::TranscriptChunk;
use std::sync::Arc;
use tracing::{debug, instrument};

/// A chunk paired with its embedding.
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub chunk: TranscriptChunk,
    pub embedding: Vec<f32>,
}

/// A retrieval hit with its similarity score.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub chunk: TranscriptChunk,
    pub score: f32,
}

/// Embedding index for one video's transcript.
pub struct TranscriptIndex {
    video_id: String,
    title: Option<String>,
    entries: Vec<IndexedChunk>,
    embedder: Arc<dyn Embedder>,
}

impl TranscriptIndex {
    /// Build an index from transcript chunks.
    ///
    /// Returns `Ok(None)` when there are no chunks to index; embedding
    /// failures propagate as errors rather than producing a null index.
    #[instrument(skip_all, fields(video_id = %video_id, chunks = chunks.len()))]
    pub async fn build(
        video_id: String,
        title: Option<String>,
        chunks: Vec<TranscriptChunk>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Option<Self>> {
        if chunks.is_empty() {
            debug!("No chunks to index");
            return Ok(None);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexedChunk { chunk, embedding })
            .collect::<Vec<_>>();

        debug!("Indexed {} chunks", entries.len());
        Ok(Some(Self {
            video_id,
            title,
            entries,
            embedder,
        }))
    }

    /// Video ID this index was built from.
    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Video title, when the transcript source exposed one.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Retrieve the top-k chunks for a query, ordered by descending similarity.
    #[instrument(skip(self, query), fields(k = k))]
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        let query_embedding = self.embedder.embed(query).await?;

        let mut results: Vec<RetrievedChunk> = self
            .entries
            .iter()
            .map(|entry| RetrievedChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(&query_embedding, &entry.embedding),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        Ok(results)
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Deterministic embedder for tests: maps text onto a 3-dim vector
    /// from keyword occurrences.
    pub(crate) struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let lower = text.to_lowercase();
            Ok(vec![
                lower.matches("hello").count() as f32,
                lower.matches("world").count() as f32,
                1.0,
            ])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::with_capacity(texts.len());
            for t in texts {
                out.push(self.embed(t).await?);
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    fn chunk(content: &str, order: i32) -> TranscriptChunk {
        TranscriptChunk {
            content: content.to_string(),
            start_offset: 0,
            end_offset: content.chars().count(),
            order,
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);

        // Mismatched or empty inputs score zero
        assert_eq!(cosine_similarity(&a, &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[tokio::test]
    async fn test_empty_chunks_build_none() {
        let index = TranscriptIndex::build("vid00000001".to_string(), None, Vec::new(), Arc::new(StubEmbedder))
            .await
            .unwrap();
        assert!(index.is_none());
    }

    #[tokio::test]
    async fn test_retrieve_orders_by_similarity() {
        let chunks = vec![
            chunk("hello hello hello", 0),
            chunk("world world", 1),
            chunk("nothing relevant", 2),
        ];
        let index = TranscriptIndex::build("vid00000001".to_string(), None, chunks, Arc::new(StubEmbedder))
            .await
            .unwrap()
            .expect("index should build");

        assert_eq!(index.len(), 3);

        let results = index.retrieve("hello", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "hello hello hello");
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn test_retrieve_caps_at_k() {
        let chunks = vec![chunk("hello", 0), chunk("world", 1)];
        let index = TranscriptIndex::build("vid00000001".to_string(), None, chunks, Arc::new(StubEmbedder))
            .await
            .unwrap()
            .unwrap();

        let results = index.retrieve("hello world", 10).await.unwrap();
        assert_eq!(results.len(), 2);
    }
}

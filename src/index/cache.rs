//! Per-video cache of transcript indexes.
//!
//! Keyed by video URL so a chat session rebuilds its index at most once,
//! not on every page load.

use super::TranscriptIndex;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Cache of built indexes keyed by video URL.
pub struct IndexCache {
    indexes: RwLock<HashMap<String, Arc<TranscriptIndex>>>,
}

impl IndexCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            indexes: RwLock::new(HashMap::new()),
        }
    }

    /// Look up the index for a video URL.
    pub fn get(&self, video_url: &str) -> Option<Arc<TranscriptIndex>> {
        let indexes = self.indexes.read().unwrap();
        indexes.get(video_url).cloned()
    }

    /// Store the index for a video URL.
    pub fn insert(&self, video_url: &str, index: Arc<TranscriptIndex>) {
        let mut indexes = self.indexes.write().unwrap();
        indexes.insert(video_url.to_string(), index);
    }

    /// Drop the cached index for a video URL, if present.
    pub fn invalidate(&self, video_url: &str) -> bool {
        let mut indexes = self.indexes.write().unwrap();
        indexes.remove(video_url).is_some()
    }

    /// Number of cached indexes.
    pub fn len(&self) -> usize {
        let indexes = self.indexes.read().unwrap();
        indexes.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for IndexCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::StubEmbedder;
    use crate::splitter::TranscriptChunk;

    async fn sample_index() -> Arc<TranscriptIndex> {
        let chunks = vec![TranscriptChunk {
            content: "hello world".to_string(),
            start_offset: 0,
            end_offset: 11,
            order: 0,
        }];
        Arc::new(
            TranscriptIndex::build("vid00000001".to_string(), None, chunks, Arc::new(StubEmbedder))
                .await
                .unwrap()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_insert_get_invalidate() {
        let cache = IndexCache::new();
        let url = "https://youtu.be/abc123def45";

        assert!(cache.get(url).is_none());

        cache.insert(url, sample_index().await);
        assert!(cache.get(url).is_some());
        assert_eq!(cache.len(), 1);

        assert!(cache.invalidate(url));
        assert!(cache.get(url).is_none());
        assert!(!cache.invalidate(url));
        assert!(cache.is_empty());
    }
}

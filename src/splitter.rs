//! Transcript splitting into overlapping fixed-size chunks.
//!
//! Pure text manipulation; the chunks feed the embedding index.

use crate::config::ChunkingSettings;
use crate::error::{PrataError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A contiguous span of transcript text.
///
/// Offsets are character positions into the original transcript, so adjacent
/// chunks overlap by the configured amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptChunk {
    /// Text content of this chunk.
    pub content: String,
    /// Start offset in the transcript (characters).
    pub start_offset: usize,
    /// End offset in the transcript (characters, exclusive).
    pub end_offset: usize,
    /// Order of this chunk in the transcript.
    pub order: i32,
}

/// Split transcript text into overlapping chunks.
///
/// An empty transcript yields an empty sequence. Fails only on invalid
/// configuration (overlap must be smaller than the chunk size).
pub fn split_transcript(text: &str, config: &ChunkingSettings) -> Result<Vec<TranscriptChunk>> {
    if config.chunk_size == 0 || config.chunk_overlap >= config.chunk_size {
        return Err(PrataError::InvalidInput(format!(
            "chunk_overlap ({}) must be smaller than chunk_size ({})",
            config.chunk_overlap, config.chunk_size
        )));
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        debug!("Empty transcript, nothing to split");
        return Ok(Vec::new());
    }

    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut order = 0i32;

    loop {
        let end = (start + config.chunk_size).min(chars.len());
        chunks.push(TranscriptChunk {
            content: chars[start..end].iter().collect(),
            start_offset: start,
            end_offset: end,
            order,
        });

        if end == chars.len() {
            break;
        }
        start = end - config.chunk_overlap;
        order += 1;
    }

    debug!("Split {} chars into {} chunks", chars.len(), chunks.len());
    Ok(chunks)
}

//! YouTube transcript loader.
//!
//! Scrapes the watch page for the player response, picks the first caption
//! track, and parses the timedtext XML it points at. No API key required.

use super::{Transcript, TranscriptLoader};
use crate::error::{PrataError, Result};
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, instrument};

/// YouTube transcript loader.
pub struct YoutubeTranscriptLoader {
    client: reqwest::Client,
    video_id_regex: Regex,
    caption_line_regex: Regex,
}

impl YoutubeTranscriptLoader {
    pub fn new() -> Self {
        // Matches various YouTube URL formats and bare video IDs
        let video_id_regex = Regex::new(
            r"(?x)
            (?:
                # Full YouTube URLs
                (?:https?://)?
                (?:www\.)?
                (?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            # Bare video ID (11 characters)
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("Invalid regex");

        let caption_line_regex =
            Regex::new(r#"<text start="([^"]+)" dur="([^"]+)"[^>]*>([^<]*)</text>"#)
                .expect("Invalid regex");

        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            video_id_regex,
            caption_line_regex,
        }
    }

    /// Extract video ID from a YouTube URL or bare ID.
    pub fn extract_video_id(&self, input: &str) -> Option<String> {
        let caps = self.video_id_regex.captures(input.trim())?;

        // Try group 1 (URL format) then group 2 (bare ID)
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    }

    /// Pull the `ytInitialPlayerResponse` JSON out of the watch page HTML.
    fn extract_player_response(html: &str) -> Option<&str> {
        let start_marker = "ytInitialPlayerResponse = ";
        let end_marker = ";</script>";

        html.find(start_marker).map(|start_idx| {
            let start_pos = start_idx + start_marker.len();
            let sub_str = &html[start_pos..];
            let end_pos = sub_str.find(end_marker).unwrap_or(sub_str.len());
            &sub_str[..end_pos]
        })
    }

    /// Find the first caption track URL in the player response.
    fn caption_track_url(player_response: &serde_json::Value) -> Option<String> {
        player_response
            .get("captions")?
            .get("playerCaptionsTracklistRenderer")?
            .get("captionTracks")?
            .as_array()?
            .first()?
            .get("baseUrl")?
            .as_str()
            .map(|s| s.to_string())
    }

    /// Parse timedtext XML into plain transcript text.
    fn parse_caption_xml(&self, xml: &str) -> String {
        let mut lines = Vec::new();
        for cap in self.caption_line_regex.captures_iter(xml) {
            let text = html_escape::decode_html_entities(&cap[3]).into_owned();
            let text = text.trim().to_string();
            if !text.is_empty() {
                lines.push(text);
            }
        }
        lines.join(" ")
    }

    /// Fetch the video title via the oembed endpoint. Best effort.
    async fn fetch_title(&self, video_id: &str) -> Option<String> {
        let url = format!(
            "https://www.youtube.com/oembed?url=https://www.youtube.com/watch?v={}&format=json",
            video_id
        );
        self.client
            .get(&url)
            .send()
            .await
            .ok()?
            .json::<serde_json::Value>()
            .await
            .ok()?["title"]
            .as_str()
            .map(|s| s.to_string())
    }
}

impl Default for YoutubeTranscriptLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptLoader for YoutubeTranscriptLoader {
    #[instrument(skip(self), fields(url = %video_url))]
    async fn load(&self, video_url: &str) -> Result<Transcript> {
        let video_id = self.extract_video_id(video_url).ok_or_else(|| {
            PrataError::InvalidInput(format!("Not a YouTube URL or video ID: {}", video_url))
        })?;

        debug!("Fetching watch page for {}", video_id);
        let watch_url = format!("https://www.youtube.com/watch?v={}", video_id);
        let html = self
            .client
            .get(&watch_url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| {
                PrataError::TranscriptUnavailable(format!("Watch page fetch failed: {}", e))
            })?
            .text()
            .await?;

        let json_str = Self::extract_player_response(&html).ok_or_else(|| {
            PrataError::TranscriptUnavailable(format!(
                "No player data found for video {}",
                video_id
            ))
        })?;

        let player_response: serde_json::Value = serde_json::from_str(json_str).map_err(|e| {
            PrataError::TranscriptUnavailable(format!("Unparseable player data: {}", e))
        })?;

        let track_url = Self::caption_track_url(&player_response).ok_or_else(|| {
            PrataError::TranscriptUnavailable(format!(
                "No caption tracks for video {}",
                video_id
            ))
        })?;

        debug!("Downloading caption track");
        let xml = self.client.get(&track_url).send().await?.text().await?;

        let text = self.parse_caption_xml(&xml);
        if text.is_empty() {
            return Err(PrataError::TranscriptUnavailable(format!(
                "Caption track for video {} contained no text",
                video_id
            )));
        }

        let title = self.fetch_title(&video_id).await;
        debug!("Loaded transcript: {} chars", text.len());

        Ok(Transcript {
            video_id,
            title,
            text,
        })
    }
}

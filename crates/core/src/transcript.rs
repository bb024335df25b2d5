use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use yt_transcript_rs::{FetchedTranscript, api::YouTubeTranscriptApi};

use crate::error::{Result, VidsageError};

pub const DEFAULT_LANGUAGES: &[&str] = &["en", "en-US"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub segments: Vec<Segment>,
    pub language_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub duration: f64,
    pub text: String,
}

impl Transcript {
    /// Build a transcript from segments; the plain text joins non-blank segments with spaces.
    pub fn from_segments(segments: Vec<Segment>, language_code: impl Into<String>) -> Self {
        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            text,
            segments,
            language_code: language_code.into(),
        }
    }
}

impl From<FetchedTranscript> for Transcript {
    fn from(fetched: FetchedTranscript) -> Self {
        let segments = fetched
            .snippets
            .into_iter()
            .map(|snippet| Segment {
                start: snippet.start,
                duration: snippet.duration,
                text: snippet.text,
            })
            .collect();
        Transcript::from_segments(segments, fetched.language_code)
    }
}

/// Anything that can look up a transcript for a video id.
///
/// Implementations never fail: every problem means "no transcript".
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(&self, video_id: &str, languages: &[&str]) -> Option<Transcript>;
}

/// Caption tracks straight from YouTube.
#[derive(Clone)]
pub struct YouTubeTranscripts {
    api: YouTubeTranscriptApi,
}

impl YouTubeTranscripts {
    pub fn new() -> Result<Self> {
        Self::build(None)
    }

    /// Route caption requests through a caller-supplied HTTP client.
    pub fn with_http_client(client: reqwest::Client) -> Result<Self> {
        Self::build(Some(client))
    }

    fn build(client: Option<reqwest::Client>) -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, client).map_err(|e| {
            VidsageError::configuration(format!("Failed to initialize transcript client: {e}"))
        })?;
        Ok(Self { api })
    }
}

/// Captions without any spoken text count as no transcript.
fn non_empty(transcript: Transcript) -> Option<Transcript> {
    (!transcript.text.is_empty()).then_some(transcript)
}

#[async_trait]
impl TranscriptSource for YouTubeTranscripts {
    async fn fetch(&self, video_id: &str, languages: &[&str]) -> Option<Transcript> {
        let languages = if languages.is_empty() {
            DEFAULT_LANGUAGES
        } else {
            languages
        };

        match self.api.fetch_transcript(video_id, languages, false).await {
            Ok(fetched) => {
                let transcript = Transcript::from(fetched);
                debug!(
                    video_id,
                    segments = transcript.segments.len(),
                    language = %transcript.language_code,
                    "transcript fetched"
                );
                non_empty(transcript)
            }
            Err(e) => {
                // Disabled captions, missing languages and rate limiting all land here.
                warn!(video_id, error = %e, "transcript unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: f64, text: &str) -> Segment {
        Segment {
            start,
            duration: 1.5,
            text: text.to_string(),
        }
    }

    #[test]
    fn joins_segment_text_skipping_blank_segments() {
        let transcript = Transcript::from_segments(
            vec![
                segment(0.0, "hello"),
                segment(1.5, "  "),
                segment(3.0, "big world"),
            ],
            "en",
        );
        assert_eq!(transcript.text, "hello big world");
        assert_eq!(transcript.segments.len(), 3);
        assert_eq!(transcript.language_code, "en");
    }

    #[test]
    fn segment_text_is_joined_as_received() {
        let transcript =
            Transcript::from_segments(vec![segment(0.0, "[Music] "), segment(2.0, "go")], "en");
        assert_eq!(transcript.text, "[Music]  go");
    }

    #[test]
    fn empty_segments_give_empty_text() {
        let transcript = Transcript::from_segments(Vec::new(), "en");
        assert!(transcript.text.is_empty());
    }

    #[test]
    fn blank_transcript_counts_as_missing() {
        let blank = Transcript::from_segments(vec![segment(0.0, " ")], "en");
        assert!(non_empty(blank).is_none());

        let spoken = Transcript::from_segments(vec![segment(0.0, "hi")], "en");
        assert_eq!(non_empty(spoken).map(|t| t.text), Some("hi".to_string()));
    }

    #[tokio::test]
    async fn network_failure_degrades_to_none() {
        // Nothing listens on port 1, so every caption request fails to connect.
        let client = reqwest::Client::builder()
            .proxy(reqwest::Proxy::all("http://127.0.0.1:1").unwrap())
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap();
        let transcripts = YouTubeTranscripts::with_http_client(client).unwrap();

        assert!(transcripts.fetch("dQw4w9WgXcQ", &[]).await.is_none());
        assert!(transcripts.fetch("dQw4w9WgXcQ", &["de"]).await.is_none());
    }
}

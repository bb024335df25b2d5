//! YouTube Data API v3 client.
//! Docs: https://developers.google.com/youtube/v3

use std::{sync::LazyLock, time::Duration};

use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, VidsageError, envelope_message};

const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";
const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
pub const MAX_RESULTS_LIMIT: u32 = 50;

static URL_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v=|/v/|youtu\.be/|/shorts/)([\w-]{11})").expect("valid video id regex")
});
static RAW_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w-]{11})$").expect("valid raw id regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    pub published_at: String,
    pub view_count: Option<u64>,
    pub url: String,
    pub description: Option<String>,
}

impl Video {
    /// Placeholder used when the API has no record of `video_id`.
    pub fn unknown(video_id: &str) -> Self {
        Self {
            video_id: video_id.to_string(),
            title: video_id.to_string(),
            channel: String::new(),
            published_at: String::new(),
            view_count: None,
            url: watch_url(video_id),
            description: None,
        }
    }
}

pub fn watch_url(video_id: &str) -> String {
    format!("{WATCH_URL}{video_id}")
}

/// Accept a raw 11-character id or any common YouTube URL form.
pub fn extract_video_id(url_or_id: &str) -> Result<String> {
    let input = url_or_id.trim();
    [&*URL_ID_PATTERN, &*RAW_ID_PATTERN]
        .iter()
        .find_map(|pattern| pattern.captures(input))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| VidsageError::InvalidVideoId {
            input: url_or_id.to_string(),
        })
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: SearchId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
struct SearchId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(rename = "publishedAt", default)]
    published_at: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

impl VideoItem {
    fn into_video(self) -> Video {
        let view_count = self
            .statistics
            .and_then(|s| s.view_count)
            .and_then(|c| c.parse().ok());
        Video {
            url: watch_url(&self.id),
            video_id: self.id,
            title: self.snippet.title,
            channel: self.snippet.channel_title,
            published_at: self.snippet.published_at,
            view_count,
            description: self.snippet.description,
        }
    }
}

impl SearchItem {
    fn into_video(self) -> Option<Video> {
        let video_id = self.id.video_id?;
        Some(Video {
            url: watch_url(&video_id),
            video_id,
            title: self.snippet.title,
            channel: self.snippet.channel_title,
            published_at: self.snippet.published_at,
            view_count: None,
            description: self.snippet.description,
        })
    }
}

// ============================================================================
// Client
// ============================================================================

#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| VidsageError::configuration("YOUTUBE_API_KEY is missing"))?;

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: YOUTUBE_API_URL.to_string(),
        })
    }

    /// Send requests to another Data API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Most popular videos in `region` (ISO 3166-1 alpha-2).
    pub async fn trending(&self, region: &str, max_results: u32) -> Result<Vec<Video>> {
        let max_results = clamp_max_results(max_results);
        let response: ListResponse<VideoItem> = self
            .get(
                "videos",
                &[
                    ("part", "snippet,statistics,contentDetails"),
                    ("chart", "mostPopular"),
                    ("regionCode", region),
                    ("maxResults", max_results.as_str()),
                ],
            )
            .await?;

        Ok(response.items.into_iter().map(VideoItem::into_video).collect())
    }

    pub async fn search(
        &self,
        query: &str,
        max_results: u32,
        region: Option<&str>,
    ) -> Result<Vec<Video>> {
        let max_results = clamp_max_results(max_results);
        let mut params = vec![
            ("part", "snippet"),
            ("q", query),
            ("type", "video"),
            ("order", "relevance"),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(region) = region {
            params.push(("regionCode", region));
        }

        let response: ListResponse<SearchItem> = self.get("search", &params).await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(SearchItem::into_video)
            .collect())
    }

    /// Snippet and statistics for one video, `None` when the id is unknown.
    pub async fn video(&self, video_id: &str) -> Result<Option<Video>> {
        let response: ListResponse<VideoItem> = self
            .get("videos", &[("part", "snippet,statistics"), ("id", video_id)])
            .await?;

        Ok(response.items.into_iter().next().map(VideoItem::into_video))
    }

    async fn get<T>(&self, resource: &str, params: &[(&str, &str)]) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}/{resource}", self.base_url);
        debug!(%url, ?params, "youtube api request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VidsageError::YouTubeApi {
                status: status.as_u16(),
                message: envelope_message(&body),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

fn clamp_max_results(max_results: u32) -> String {
    max_results.clamp(1, MAX_RESULTS_LIMIT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn extracts_id_from_short_links() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abc").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/abcDEF12_-3").unwrap(),
            "abcDEF12_-3"
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/v/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn accepts_raw_id() {
        assert_eq!(extract_video_id(" dQw4w9WgXcQ ").unwrap(), "dQw4w9WgXcQ");
    }

    #[test]
    fn rejects_garbage() {
        for input in ["", "short", "https://example.com/watch", "dQw4w9WgXcQ-too-long"] {
            assert!(
                matches!(
                    extract_video_id(input),
                    Err(VidsageError::InvalidVideoId { .. })
                ),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn missing_api_key_is_configuration_error() {
        let err = YouTubeClient::new(None, Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, VidsageError::Configuration(_)));
        assert!(YouTubeClient::new(Some("  ".into()), Duration::from_secs(5)).is_err());
    }

    #[test]
    fn clamps_max_results_to_api_limits() {
        assert_eq!(clamp_max_results(0), "1");
        assert_eq!(clamp_max_results(10), "10");
        assert_eq!(clamp_max_results(500), "50");
    }

    #[test]
    fn unknown_video_falls_back_to_id() {
        let video = Video::unknown("dQw4w9WgXcQ");
        assert_eq!(video.title, "dQw4w9WgXcQ");
        assert_eq!(video.channel, "");
        assert_eq!(video.url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }
}

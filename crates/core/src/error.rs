use thiserror::Error;

#[derive(Error, Debug)]
pub enum VidsageError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model invocation failed ({provider}): {reason}")]
    ModelInvocation {
        provider: &'static str,
        reason: String,
    },

    #[error("YouTube API error ({status}): {message}")]
    YouTubeApi { status: u16, message: String },

    #[error("Could not extract video id from {input:?}")]
    InvalidVideoId { input: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl VidsageError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }

    pub fn model(provider: &'static str, reason: impl Into<String>) -> Self {
        Self::ModelInvocation {
            provider,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VidsageError>;

/// Pull `error.message` out of a JSON error envelope (Google and OpenAI share
/// this shape), or return the trimmed body when it has none.
pub(crate) fn envelope_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

//! Environment-driven settings.

use std::{path::PathBuf, time::Duration};

use tracing::debug;

pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_WATSONX_MODEL_ID: &str = "mistralai/mistral-small-3-1-24b-instruct-2503";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Process-wide settings. Built once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    pub youtube_api_key: Option<String>,
    /// Raw, lowercased provider name. Parsed when the model is first built.
    pub llm_provider: String,

    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,

    pub watsonx_url: Option<String>,
    pub watsonx_apikey: Option<String>,
    pub watsonx_project_id: Option<String>,
    pub watsonx_model_id: String,

    pub http_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    /// Load `.env` files, then read settings from the process environment.
    ///
    /// Variables already present in the environment are never overridden.
    pub fn load() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        if let Some(path) = user_env_file()
            && path.exists()
            && dotenvy::from_path(&path).is_ok()
        {
            debug!(path = %path.display(), "loaded user .env");
        }

        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let http_timeout = get("HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Self {
            youtube_api_key: get("YOUTUBE_API_KEY"),
            llm_provider: get("LLM_PROVIDER")
                .unwrap_or_else(|| DEFAULT_PROVIDER.to_string())
                .to_lowercase(),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            watsonx_url: get("WATSONX_URL"),
            watsonx_apikey: get("WATSONX_APIKEY"),
            watsonx_project_id: get("WATSONX_PROJECT_ID"),
            watsonx_model_id: get("WATSONX_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_WATSONX_MODEL_ID.to_string()),
            http_timeout: Duration::from_secs(http_timeout),
        }
    }
}

/// `<config_dir>/vidsage/.env`, e.g. `~/.config/vidsage/.env` on Linux.
pub fn user_env_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vidsage").join(".env"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings_from(pairs: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let settings = Settings::default();
        assert_eq!(settings.youtube_api_key, None);
        assert_eq!(settings.llm_provider, "openai");
        assert_eq!(settings.openai_model, DEFAULT_OPENAI_MODEL);
        assert_eq!(settings.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(settings.watsonx_model_id, DEFAULT_WATSONX_MODEL_ID);
        assert_eq!(settings.http_timeout, Duration::from_secs(60));
    }

    #[test]
    fn provider_is_lowercased() {
        let settings = settings_from(&[("LLM_PROVIDER", "WatsonX")]);
        assert_eq!(settings.llm_provider, "watsonx");
    }

    #[test]
    fn empty_values_count_as_unset() {
        let settings = settings_from(&[("OPENAI_API_KEY", "  "), ("OPENAI_MODEL", "")]);
        assert_eq!(settings.openai_api_key, None);
        assert_eq!(settings.openai_model, DEFAULT_OPENAI_MODEL);
    }

    #[test]
    fn reads_watsonx_settings() {
        let settings = settings_from(&[
            ("WATSONX_URL", "https://us-south.ml.cloud.ibm.com"),
            ("WATSONX_APIKEY", "key"),
            ("WATSONX_PROJECT_ID", "proj"),
        ]);
        assert_eq!(
            settings.watsonx_url.as_deref(),
            Some("https://us-south.ml.cloud.ibm.com")
        );
        assert_eq!(settings.watsonx_apikey.as_deref(), Some("key"));
        assert_eq!(settings.watsonx_project_id.as_deref(), Some("proj"));
    }

    #[test]
    fn invalid_timeout_falls_back_to_default() {
        assert_eq!(
            settings_from(&[("HTTP_TIMEOUT_SECS", "abc")]).http_timeout,
            Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)
        );
        assert_eq!(
            settings_from(&[("HTTP_TIMEOUT_SECS", "0")]).http_timeout,
            Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)
        );
        assert_eq!(
            settings_from(&[("HTTP_TIMEOUT_SECS", "5")]).http_timeout,
            Duration::from_secs(5)
        );
    }
}

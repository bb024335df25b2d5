use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    config::Settings,
    error::{Result, VidsageError, envelope_message},
    llm::{LanguageModel, TEMPERATURE},
    prompts::ChatPrompt,
};

const PROVIDER_NAME: &str = "OpenAI";

/// OpenAI chat-completions client.
pub struct OpenAiModel {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiModel {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.openai_api_key.clone().ok_or_else(|| {
            VidsageError::configuration("OPENAI_API_KEY is not set; required for the openai provider")
        })?;

        let http = Client::builder().timeout(settings.http_timeout).build()?;

        Ok(Self {
            http,
            api_key,
            model: settings.openai_model.clone(),
            base_url: settings.openai_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn invoke(&self, prompt: &ChatPrompt) -> Result<String> {
        let started = Instant::now();

        let response = self
            .http
            .post(self.completions_url())
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "system",
                        "content": prompt.system,
                    },
                    {
                        "role": "user",
                        "content": prompt.user,
                    },
                ],
                "temperature": TEMPERATURE,
            }))
            .send()
            .await
            .map_err(|e| VidsageError::model(PROVIDER_NAME, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VidsageError::model(
                PROVIDER_NAME,
                format!("HTTP {status}: {}", envelope_message(&body)),
            ));
        }

        let response = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| VidsageError::model(PROVIDER_NAME, format!("malformed response: {e}")))?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                VidsageError::model(
                    PROVIDER_NAME,
                    format!("response carried no message content: {response}"),
                )
            })?;

        debug!(
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            chars = content.len(),
            "openai completion finished"
        );

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_configuration_error() {
        let err = OpenAiModel::from_settings(&Settings::default()).err().unwrap();
        assert!(matches!(err, VidsageError::Configuration(_)));
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let settings = Settings {
            openai_api_key: Some("sk-test".to_string()),
            openai_base_url: "http://localhost:8080/v1/".to_string(),
            ..Settings::default()
        };
        let model = OpenAiModel::from_settings(&settings).unwrap();
        assert_eq!(
            model.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(model.model(), "gpt-4o-mini");
    }
}

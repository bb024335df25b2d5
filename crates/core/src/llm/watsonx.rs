use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    config::Settings,
    error::{Result, VidsageError},
    llm::{LanguageModel, TEMPERATURE},
    prompts::ChatPrompt,
};

const PROVIDER_NAME: &str = "watsonx";
const IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";
const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";
const API_VERSION: &str = "2023-05-29";
const MAX_NEW_TOKENS: u32 = 256;
/// Refresh the bearer token this long before IBM says it expires.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Deserialize)]
struct IamToken {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    results: Vec<GenerationResult>,
}

#[derive(Deserialize)]
struct GenerationResult {
    #[serde(default)]
    generated_text: String,
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// IBM watsonx.ai text-generation client.
pub struct WatsonxModel {
    http: Client,
    url: String,
    iam_url: String,
    apikey: String,
    project_id: String,
    model_id: String,
    token: Mutex<Option<CachedToken>>,
}

impl WatsonxModel {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let missing: Vec<&str> = [
            ("WATSONX_URL", settings.watsonx_url.is_none()),
            ("WATSONX_APIKEY", settings.watsonx_apikey.is_none()),
            ("WATSONX_PROJECT_ID", settings.watsonx_project_id.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        if !missing.is_empty() {
            return Err(VidsageError::configuration(format!(
                "Failed to initialize watsonx LLM: missing {}",
                missing.join(", ")
            )));
        }

        let http = Client::builder().timeout(settings.http_timeout).build()?;

        Ok(Self {
            http,
            url: settings
                .watsonx_url
                .clone()
                .unwrap_or_default()
                .trim_end_matches('/')
                .to_string(),
            iam_url: IAM_TOKEN_URL.to_string(),
            apikey: settings.watsonx_apikey.clone().unwrap_or_default(),
            project_id: settings.watsonx_project_id.clone().unwrap_or_default(),
            model_id: settings.watsonx_model_id.clone(),
            token: Mutex::new(None),
        })
    }

    /// Point token exchange at a different IAM endpoint.
    pub fn with_iam_url(mut self, iam_url: impl Into<String>) -> Self {
        self.iam_url = iam_url.into();
        self
    }

    fn generation_url(&self) -> String {
        format!("{}/ml/v1/text/generation?version={API_VERSION}", self.url)
    }

    async fn bearer_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref()
            && Instant::now() < token.refresh_at
        {
            return Ok(token.value.clone());
        }

        debug!("requesting watsonx IAM token");
        let response = self
            .http
            .post(&self.iam_url)
            .header("Accept", "application/json")
            .form(&[("grant_type", IAM_GRANT_TYPE), ("apikey", self.apikey.as_str())])
            .send()
            .await
            .map_err(|e| VidsageError::model(PROVIDER_NAME, format!("IAM token request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VidsageError::model(
                PROVIDER_NAME,
                format!("IAM token request returned HTTP {status}: {}", body.trim()),
            ));
        }

        let token: IamToken = response
            .json()
            .await
            .map_err(|e| VidsageError::model(PROVIDER_NAME, format!("malformed IAM token: {e}")))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_REFRESH_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });

        Ok(token.access_token)
    }
}

#[async_trait]
impl LanguageModel for WatsonxModel {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn invoke(&self, prompt: &ChatPrompt) -> Result<String> {
        let started = Instant::now();
        let token = self.bearer_token().await?;

        let response = self
            .http
            .post(self.generation_url())
            .bearer_auth(token)
            .json(&serde_json::json!({
                "model_id": self.model_id,
                "project_id": self.project_id,
                "input": prompt.to_completion_input(),
                "parameters": {
                    "max_new_tokens": MAX_NEW_TOKENS,
                    "temperature": TEMPERATURE,
                },
            }))
            .send()
            .await
            .map_err(|e| VidsageError::model(PROVIDER_NAME, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VidsageError::model(
                PROVIDER_NAME,
                format!("HTTP {status}: {}", body.trim()),
            ));
        }

        let generation: GenerationResponse = response
            .json()
            .await
            .map_err(|e| VidsageError::model(PROVIDER_NAME, format!("malformed response: {e}")))?;

        let text = generation
            .results
            .into_iter()
            .next()
            .map(|r| r.generated_text)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| VidsageError::model(PROVIDER_NAME, "response carried no generated text"))?;

        debug!(
            model = %self.model_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            chars = text.len(),
            "watsonx generation finished"
        );

        Ok(text)
    }
}

//! Model invocation: one capability, two interchangeable backends.

pub mod openai;
pub mod watsonx;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::info;

use crate::{
    config::Settings,
    error::Result,
    prompts::ChatPrompt,
    provider::Provider,
};

pub use openai::OpenAiModel;
pub use watsonx::WatsonxModel;

/// Sampling temperature shared by both backends.
pub const TEMPERATURE: f64 = 0.3;

/// Opaque text-in/text-out generation capability.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Send a rendered prompt and return the generated text verbatim.
    async fn invoke(&self, prompt: &ChatPrompt) -> Result<String>;
}

/// Construct the model configured by `settings.llm_provider`.
pub fn build_model(settings: &Settings) -> Result<Arc<dyn LanguageModel>> {
    let provider: Provider = settings.llm_provider.parse()?;
    info!(provider = provider.as_str(), "building language model client");

    let model: Arc<dyn LanguageModel> = match provider {
        Provider::Openai => Arc::new(OpenAiModel::from_settings(settings)?),
        Provider::Watsonx => Arc::new(WatsonxModel::from_settings(settings)?),
    };
    Ok(model)
}

type ModelFactory = Box<dyn Fn() -> Result<Arc<dyn LanguageModel>> + Send + Sync>;

/// Defers model construction until first use and builds it at most once.
///
/// A failed construction is not cached; the next `get` tries again.
pub struct LazyModel {
    cell: OnceCell<Arc<dyn LanguageModel>>,
    factory: ModelFactory,
}

impl LazyModel {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn LanguageModel>> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    pub fn from_settings(settings: Settings) -> Self {
        Self::new(move || build_model(&settings))
    }

    pub async fn get(&self) -> Result<Arc<dyn LanguageModel>> {
        self.cell
            .get_or_try_init(|| async { (self.factory)() })
            .await
            .map(Arc::clone)
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

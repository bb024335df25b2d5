//! Summary, hashtags and follow-up ideas for a single video.
//!
//! The three branches form a fixed graph: `hashtags` needs the title plus the
//! summary produced by the same call, `ideas` needs only the title. `ideas`
//! therefore runs alongside the `summary -> hashtags` chain.

use std::{sync::Arc, time::Instant};

use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, debug_span};

use crate::{
    error::{Result, VidsageError},
    llm::LanguageModel,
    prompts::{hashtags_prompt, ideas_prompt, summary_prompt},
};

/// Inputs for one analysis. The transcript may be empty or partial.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoContext {
    pub title: String,
    pub channel: String,
    pub transcript: String,
}

impl VideoContext {
    pub fn new(
        title: impl Into<String>,
        channel: impl Into<String>,
        transcript: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            channel: channel.into(),
            transcript: transcript.into(),
        }
    }
}

/// All three artifacts, produced together or not at all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub hashtags: String,
    pub ideas: String,
}

#[derive(Clone)]
pub struct Analyzer {
    model: Arc<dyn LanguageModel>,
}

impl Analyzer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    /// Run the whole graph. Any branch failure fails the call; unfinished
    /// branches are dropped.
    pub async fn analyze(&self, context: &VideoContext) -> Result<AnalysisResult> {
        let started = Instant::now();

        let summary_then_hashtags = async {
            let summary = self.summarize(context).await?;
            let hashtags = self.hashtags(&context.title, &summary).await?;
            Ok::<_, VidsageError>((summary, hashtags))
        };

        let ((summary, hashtags), ideas) =
            tokio::try_join!(summary_then_hashtags, self.ideas(&context.title))?;

        debug!(
            title = %context.title,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis finished"
        );

        Ok(AnalysisResult {
            summary,
            hashtags,
            ideas,
        })
    }

    pub async fn summarize(&self, context: &VideoContext) -> Result<String> {
        let prompt = summary_prompt(context);
        self.model
            .invoke(&prompt)
            .instrument(debug_span!("summary", transcript_chars = context.transcript.len()))
            .await
    }

    pub async fn hashtags(&self, title: &str, summary: &str) -> Result<String> {
        let prompt = hashtags_prompt(title, summary);
        self.model
            .invoke(&prompt)
            .instrument(debug_span!("hashtags"))
            .await
    }

    pub async fn ideas(&self, title: &str) -> Result<String> {
        let prompt = ideas_prompt(title);
        self.model
            .invoke(&prompt)
            .instrument(debug_span!("ideas"))
            .await
    }
}

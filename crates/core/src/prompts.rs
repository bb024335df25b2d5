use serde::{Deserialize, Serialize};

use crate::analyzer::VideoContext;

static SUMMARY_SYSTEM_PROMPT: &str =
    "You are a helpful YouTube assistant. Summarize clearly and concisely.";

static HASHTAGS_SYSTEM_PROMPT: &str = "Generate 5-8 short, relevant hashtags for discoverability.";

static IDEAS_SYSTEM_PROMPT: &str = "Create catchy follow-up video ideas based on the content.";

/// A fully rendered two-part prompt: every placeholder is already substituted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
}

impl ChatPrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Flatten into a single completion-style string for text-generation endpoints.
    pub fn to_completion_input(&self) -> String {
        format!("System: {}\nHuman: {}", self.system, self.user)
    }
}

pub fn summary_prompt(context: &VideoContext) -> ChatPrompt {
    ChatPrompt::new(
        SUMMARY_SYSTEM_PROMPT,
        format!(
            "Video: {} by {}\n\nTranscript (may be partial):\n{}\n\nReturn a short summary (5-7 bullets) and a one-line takeaway.",
            context.title, context.channel, context.transcript
        ),
    )
}

pub fn hashtags_prompt(title: &str, summary: &str) -> ChatPrompt {
    ChatPrompt::new(
        HASHTAGS_SYSTEM_PROMPT,
        format!(
            "Video title: {title}\nSummary: {summary}\nReturn as a comma-separated line, no # symbol."
        ),
    )
}

pub fn ideas_prompt(title: &str) -> ChatPrompt {
    ChatPrompt::new(
        IDEAS_SYSTEM_PROMPT,
        format!("Give 3 title ideas for a follow-up video related to: {title}."),
    )
}

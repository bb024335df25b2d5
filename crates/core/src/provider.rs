use std::{fmt, str::FromStr};

use crate::error::VidsageError;

/// Language-model backend selected by `LLM_PROVIDER`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    Openai,
    Watsonx,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Openai => "OpenAI",
            Provider::Watsonx => "watsonx",
        }
    }

    /// Value accepted by `LLM_PROVIDER` for this provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Openai => "openai",
            Provider::Watsonx => "watsonx",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = VidsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::Openai),
            "watsonx" => Ok(Provider::Watsonx),
            other => Err(VidsageError::configuration(format!(
                "Unsupported LLM provider {other:?}; expected \"openai\" or \"watsonx\""
            ))),
        }
    }
}

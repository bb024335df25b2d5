//! Vidsage Core Library
//!
//! YouTube metadata and transcript retrieval, plus the summary / hashtags /
//! ideas prompt graph run against a configurable language model.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod format;
pub mod llm;
pub mod prompts;
pub mod provider;
pub mod transcript;
pub mod workflow;
pub mod youtube;

// Re-export commonly used items at crate root
pub use analyzer::{AnalysisResult, Analyzer, VideoContext};
pub use config::Settings;
pub use error::{Result, VidsageError};
pub use format::{format_timestamp, format_transcript_with_timestamps, format_view_count};
pub use llm::{LanguageModel, LazyModel, build_model};
pub use prompts::ChatPrompt;
pub use provider::Provider;
pub use transcript::{DEFAULT_LANGUAGES, Transcript, TranscriptSource, YouTubeTranscripts};
pub use workflow::{AnalysisOutcome, VideoAnalysis, analyze_video, resolve_video};
pub use youtube::{Video, YouTubeClient, extract_video_id};

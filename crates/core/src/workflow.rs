//! Per-video glue between metadata, transcripts and the analyzer.

use tracing::{debug, warn};

use crate::{
    analyzer::{AnalysisResult, Analyzer, VideoContext},
    error::{Result, VidsageError},
    transcript::TranscriptSource,
    youtube::{Video, YouTubeClient, extract_video_id},
};

#[derive(Debug)]
pub enum AnalysisOutcome {
    Completed(AnalysisResult),
    NoTranscript,
    Failed(VidsageError),
}

#[derive(Debug)]
pub struct VideoAnalysis {
    pub video: Video,
    pub outcome: AnalysisOutcome,
}

/// Turn a URL or raw id into video metadata.
///
/// An id the API does not know still resolves, titled by the id itself.
pub async fn resolve_video(youtube: &YouTubeClient, url_or_id: &str) -> Result<Video> {
    let video_id = extract_video_id(url_or_id)?;
    let video = youtube.video(&video_id).await?;
    if video.is_none() {
        debug!(%video_id, "no metadata returned; using id as title");
    }
    Ok(video.unwrap_or_else(|| Video::unknown(&video_id)))
}

/// Fetch the transcript and run the full analysis for one video.
///
/// Never fails: a missing transcript or a failed analysis is reported in the
/// outcome so batch callers can move on to the next video.
pub async fn analyze_video(
    video: &Video,
    transcripts: &dyn TranscriptSource,
    languages: &[&str],
    analyzer: &Analyzer,
) -> VideoAnalysis {
    let outcome = match transcripts.fetch(&video.video_id, languages).await {
        None => AnalysisOutcome::NoTranscript,
        Some(transcript) => {
            let context = VideoContext::new(&video.title, &video.channel, transcript.text);
            match analyzer.analyze(&context).await {
                Ok(result) => AnalysisOutcome::Completed(result),
                Err(e) => {
                    warn!(video_id = %video.video_id, error = %e, "analysis failed");
                    AnalysisOutcome::Failed(e)
                }
            }
        }
    };

    VideoAnalysis {
        video: video.clone(),
        outcome,
    }
}

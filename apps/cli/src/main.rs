use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use vidsage_core::{
    AnalysisOutcome, AnalysisResult, Analyzer, LazyModel, Provider, Settings, TranscriptSource,
    Video, VideoContext, YouTubeClient, YouTubeTranscripts, analyze_video,
    format_transcript_with_timestamps, format_view_count, resolve_video,
};

use crate::table::Table;

mod table;

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, ValueEnum)]
enum CliProvider {
    Openai,
    Watsonx,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Openai => Provider::Openai,
            CliProvider::Watsonx => Provider::Watsonx,
        }
    }
}

#[derive(Parser)]
#[command(name = "vidsage", version)]
#[command(
    about = "Browse trending and searched YouTube videos, fetch transcripts, and generate AI summaries, hashtags and ideas"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// LLM provider, overriding LLM_PROVIDER
    #[arg(short, long, global = true)]
    provider: Option<CliProvider>,

    /// Log more to stderr (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Show trending videos in a region, optionally summarizing the top ones
    Trending {
        /// ISO 3166-1 alpha-2 code, e.g. US, GB, IN
        #[arg(short, long, default_value = "US")]
        region: String,

        #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=50))]
        max_results: u32,

        /// Summarize the top N videos (requires an LLM)
        #[arg(short, long)]
        summarize: bool,

        /// How many videos to summarize with --summarize
        #[arg(short, long, default_value_t = 3)]
        top_n: usize,
    },

    /// Search YouTube for videos
    Search {
        query: String,

        /// Optional region code
        #[arg(short, long)]
        region: Option<String>,

        #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=50))]
        max_results: u32,
    },

    /// Fetch the transcript of one video by URL or id
    Transcript {
        url_or_id: String,

        /// Also print an LLM summary
        #[arg(short, long)]
        summarize: bool,

        /// Prefix each line with its start time
        #[arg(short, long)]
        timestamps: bool,

        /// Preferred caption languages, comma separated [default: en,en-US]
        #[arg(short, long, value_delimiter = ',')]
        languages: Vec<String>,
    },

    /// Summary, hashtags and ideas for one video
    Analyze {
        url_or_id: String,

        /// Preferred caption languages, comma separated [default: en,en-US]
        #[arg(short, long, value_delimiter = ',')]
        languages: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

struct App {
    youtube: YouTubeClient,
    transcripts: YouTubeTranscripts,
    model: LazyModel,
}

impl App {
    fn new(settings: Settings) -> Result<Self> {
        Ok(Self {
            youtube: YouTubeClient::new(settings.youtube_api_key.clone(), settings.http_timeout)?,
            transcripts: YouTubeTranscripts::new()?,
            model: LazyModel::from_settings(settings),
        })
    }

    /// Builds the language model on first use.
    async fn analyzer(&self) -> Result<Analyzer> {
        let model = self.model.get().await?;
        info!(provider = model.name(), "language model ready");
        Ok(Analyzer::new(model))
    }
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn rule(title: &str) {
    println!(
        "\n{} {} {}",
        style("──").dim(),
        style(title).bold(),
        style("─".repeat(60usize.saturating_sub(title.chars().count() + 4))).dim()
    );
}

fn print_analysis(title: &str, result: &AnalysisResult) {
    println!("\n{}", style(title).bold());
    println!("{}", style("Summary:").cyan());
    println!("{}", result.summary);
    println!("{} {}", style("Hashtags:").cyan(), result.hashtags);
    println!("{}", style("Ideas:").cyan());
    println!("{}", result.ideas);
}

fn video_table(videos: &[Video], with_views: bool) -> Table {
    let mut table = Table::new()
        .column("#", None)
        .column("Title", Some(50))
        .column("Channel", Some(24));
    if with_views {
        table = table.column("Views", None);
    }
    table = table.column("URL", None);

    for (i, video) in videos.iter().enumerate() {
        let mut cells = vec![
            (i + 1).to_string(),
            video.title.clone(),
            video.channel.clone(),
        ];
        if with_views {
            cells.push(format_view_count(video.view_count));
        }
        cells.push(video.url.clone());
        table.row(cells);
    }
    table
}

fn language_refs(languages: &[String]) -> Vec<&str> {
    languages.iter().map(String::as_str).collect()
}

async fn trending(
    app: &App,
    region: &str,
    max_results: u32,
    summarize: bool,
    top_n: usize,
) -> Result<()> {
    let spinner = create_spinner(&format!("Fetching trending videos in {region}..."));
    let videos = app.youtube.trending(region, max_results).await;
    spinner.finish_and_clear();
    let videos = videos?;

    println!("\n{}\n", style(format!("Trending in {region}")).cyan().bold());
    println!("{}", video_table(&videos, true).render());

    if !summarize {
        return Ok(());
    }

    rule("Summaries");
    let analyzer = app.analyzer().await?;
    for video in videos.iter().take(top_n) {
        let spinner = create_spinner(&format!("Analyzing {}...", video.title));
        let analysis = analyze_video(video, &app.transcripts, &[], &analyzer).await;
        spinner.finish_and_clear();

        match analysis.outcome {
            AnalysisOutcome::Completed(result) => print_analysis(&video.title, &result),
            AnalysisOutcome::NoTranscript => {
                println!("{} {}", style("No transcript for:").yellow(), video.title)
            }
            AnalysisOutcome::Failed(e) => eprintln!(
                "{} {}: {}",
                style("Warning:").yellow().bold(),
                video.title,
                e
            ),
        }
    }

    Ok(())
}

async fn search(app: &App, query: &str, region: Option<&str>, max_results: u32) -> Result<()> {
    let spinner = create_spinner(&format!("Searching for \"{query}\"..."));
    let videos = app.youtube.search(query, max_results, region).await;
    spinner.finish_and_clear();
    let videos = videos?;

    println!("\n{}\n", style(format!("Search: {query}")).cyan().bold());
    println!("{}", video_table(&videos, false).render());
    Ok(())
}

async fn transcript(
    app: &App,
    url_or_id: &str,
    summarize: bool,
    timestamps: bool,
    languages: &[String],
) -> Result<()> {
    let spinner = create_spinner("Fetching transcript...");
    let video = resolve_video(&app.youtube, url_or_id).await;
    let video = match video {
        Ok(video) => video,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };
    let fetched = app
        .transcripts
        .fetch(&video.video_id, &language_refs(languages))
        .await;
    spinner.finish_and_clear();

    let Some(transcript) = fetched else {
        bail!("No transcript available.");
    };

    rule(&format!("Transcript: {}", video.title));
    if timestamps {
        println!("{}", format_transcript_with_timestamps(&transcript));
    } else {
        println!("{}", transcript.text);
    }

    if summarize {
        let analyzer = app.analyzer().await?;
        let start = Instant::now();
        let spinner = create_spinner(&format!("Summarizing with {}...", analyzer.model_name()));
        let context = VideoContext::new(&video.title, &video.channel, transcript.text);
        let summary = analyzer.summarize(&context).await;
        spinner.finish_with_message(format!(
            "{} Summarized {}",
            style("✓").green().bold(),
            style(format!("[{}]", format_duration(start.elapsed()))).dim()
        ));

        rule("Summary");
        println!("{}", summary?);
    }

    Ok(())
}

async fn analyze(app: &App, url_or_id: &str, languages: &[String], json: bool) -> Result<()> {
    let spinner = create_spinner("Looking up video...");
    let video = resolve_video(&app.youtube, url_or_id).await;
    spinner.finish_and_clear();
    let video = video?;

    let analyzer = app.analyzer().await?;
    let start = Instant::now();
    let spinner = create_spinner(&format!(
        "Analyzing {} with {}...",
        video.title,
        analyzer.model_name()
    ));
    let analysis = analyze_video(&video, &app.transcripts, &language_refs(languages), &analyzer).await;
    spinner.finish_and_clear();

    let result = match analysis.outcome {
        AnalysisOutcome::Completed(result) => result,
        AnalysisOutcome::NoTranscript => bail!("No transcript available."),
        AnalysisOutcome::Failed(e) => return Err(e.into()),
    };
    info!(elapsed = %format_duration(start.elapsed()), "analysis complete");

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_analysis(&video.title, &result);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load();
    if let Some(provider) = cli.provider {
        settings.llm_provider = Provider::from(provider).as_str().to_string();
    }
    let app = App::new(settings)?;

    match cli.command {
        Command::Trending {
            region,
            max_results,
            summarize,
            top_n,
        } => trending(&app, &region, max_results, summarize, top_n).await,
        Command::Search {
            query,
            region,
            max_results,
        } => search(&app, &query, region.as_deref(), max_results).await,
        Command::Transcript {
            url_or_id,
            summarize,
            timestamps,
            languages,
        } => transcript(&app, &url_or_id, summarize, timestamps, &languages).await,
        Command::Analyze {
            url_or_id,
            languages,
            json,
        } => analyze(&app, &url_or_id, &languages, json).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

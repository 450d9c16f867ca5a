mod config;
mod pr;
mod ratelimit;
mod scenes;
mod script;
mod server;
mod storyboard;
mod summary;
mod timeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{debug, info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

use crate::summary::{OpenAiGenerator, SummaryGenerator};

/// PatchPlay: turns a GitHub Pull Request into the script and frame timeline
/// of a short animated video.
#[derive(Parser, Debug)]
#[command(name = "patchplay", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the video script for a PR and print its storyboard
    Analyze {
        /// GitHub Pull Request URL (e.g., https://github.com/org/repo/pull/42)
        ///
        /// Not required when --mock is used.
        pr_url: Option<String>,

        /// Optional output file path (markdown, or JSON with --json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print `{script, timeline}` as JSON instead of a storyboard
        #[arg(long)]
        json: bool,

        /// Use a built-in mock PR for demo purposes (no GitHub token needed)
        #[arg(long)]
        r#mock: bool,
    },

    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the animation parameters of one frame of a saved script
    Frame {
        /// Path to a video script JSON file, as returned by the API
        script: PathBuf,

        /// Absolute frame number on the video timeline
        frame: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_filter = match cli.command {
        Command::Serve { .. } => "patchplay=info,tower_http=info",
        _ => "warn",
    };
    init_tracing(default_filter);

    match cli.command {
        Command::Analyze {
            pr_url,
            output,
            json,
            r#mock,
        } => analyze(pr_url.as_deref(), output, json, r#mock).await,
        Command::Serve { host, port } => {
            let mut config = config::Config::load()?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            server::serve(&config).await?;
            Ok(())
        }
        Command::Frame { script, frame } => print_frame(&script, frame),
    }
}

/// `RUST_LOG` wins over the per-command default; `LOG_FORMAT=json` switches
/// to one JSON object per line.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn analyze(
    pr_url: Option<&str>,
    output: Option<PathBuf>,
    json: bool,
    mock: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("loading configuration");
    let config = config::Config::load()?;

    let pull_request = if mock {
        info!("using mock PR data for demo");
        build_mock_pr()?
    } else {
        let pr_url = pr_url.ok_or(
            "PR URL is required unless --mock is used. Usage: patchplay analyze <URL> or patchplay analyze --mock",
        )?;

        let span = info_span!("pr_fetch", pr_url = %pr_url);
        async {
            info!("parsing PR URL");
            let parsed_url = pr::parse_pr_url(pr_url)?;
            debug!(owner = %parsed_url.owner, repo = %parsed_url.repo, pr = parsed_url.pr_number, "parsed PR URL");

            info!("fetching pull request from GitHub");
            let client = pr::GitHubClient::new(&config.github);
            let fetched = client.fetch_pull_request(&parsed_url).await?;
            info!(files = fetched.files_changed, additions = fetched.additions, deletions = fetched.deletions, "fetched PR metadata");
            Ok::<_, pr::PrError>(fetched)
        }
        .instrument(span)
        .await?
    };

    let generator = OpenAiGenerator::from_config(&config.llm)?;
    if generator.is_none() {
        info!("no language model API key configured, using the fallback summary");
    }

    info!("generating summary");
    let video_script = summary::build_script(
        generator.as_ref().map(|g| g as &dyn SummaryGenerator),
        &pull_request,
    )
    .await;

    let video_timeline = timeline::compute_timeline(&video_script);
    info!(scenes = video_timeline.scenes.len(), total_frames = video_timeline.total_frames, "timeline composed");

    let format = if json {
        storyboard::Format::Json
    } else {
        storyboard::Format::Terminal
    };
    storyboard::output(&video_script, &video_timeline, format, output.as_deref())?;
    info!(vibe = %video_script.summary.vibe, "done");

    Ok(())
}

fn print_frame(path: &std::path::Path, frame: u64) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    let video_script: script::VideoScript = serde_json::from_str(&raw)?;
    let video_timeline = timeline::compute_timeline(&video_script);

    let rendered = scenes::render_frame(&video_timeline, frame).ok_or_else(|| {
        format!(
            "frame {} is past the end of the video ({} frames)",
            frame, video_timeline.total_frames
        )
    })?;
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}

/// Build a mock PullRequest from the embedded GitHub API fixtures.
/// This enables running the full pipeline without a GitHub token.
fn build_mock_pr() -> Result<pr::PullRequest, Box<dyn std::error::Error>> {
    let api: pr::ApiPullRequest = serde_json::from_str(include_str!("../tests/fixtures/sample_pr.json"))?;
    let files: Vec<pr::ChangedFile> = serde_json::from_str(include_str!("../tests/fixtures/sample_files.json"))?;
    Ok(pr::PullRequest::from_api("acme/app".to_string(), 42, api, files))
}

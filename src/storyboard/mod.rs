use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::script::VideoScript;
use crate::timeline::{SceneProps, ScenePlacement, Timeline};

#[derive(Debug, Error)]
pub enum StoryboardError {
    #[error("Failed to write storyboard file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to serialize storyboard: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Output flavor of a storyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Colored terminal listing
    Terminal,
    Markdown,
    /// `{script, timeline}` as pretty JSON
    Json,
}

#[derive(Serialize)]
struct StoryboardJson<'a> {
    script: &'a VideoScript,
    timeline: &'a Timeline,
}

/// Write the storyboard to stdout, or to `output_path` when given.
/// Terminal formatting is only used for stdout; files get markdown unless
/// JSON is requested.
#[instrument(skip(script, timeline), fields(pr = script.meta.pr_number, scenes = timeline.scenes.len()))]
pub fn output(
    script: &VideoScript,
    timeline: &Timeline,
    format: Format,
    output_path: Option<&Path>,
) -> Result<(), StoryboardError> {
    let rendered = match format {
        Format::Json => serde_json::to_string_pretty(&StoryboardJson { script, timeline })?,
        Format::Markdown => render_markdown(script, timeline),
        Format::Terminal if output_path.is_some() => render_markdown(script, timeline),
        Format::Terminal => {
            debug!("writing storyboard to terminal");
            print_terminal_storyboard(script, timeline);
            return Ok(());
        }
    };

    match output_path {
        Some(path) => {
            debug!(path = %path.display(), "writing storyboard to file");
            std::fs::write(path, rendered)?;
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

/// One-line description of what a scene shows.
fn scene_caption(placement: &ScenePlacement) -> String {
    match &placement.props {
        SceneProps::Intro(p) => format!("{} #{} by @{}", p.repo_name, p.pr_number, p.author),
        SceneProps::Headline(p) => format!("{} {}", p.emoji, p.headline),
        SceneProps::Bullet(p) => format!("[{}] {}", p.treatment, p.text),
        SceneProps::Outro(p) => format!(
            "{} files | +{} -{}",
            p.files_changed, p.additions, p.deletions
        ),
    }
}

fn frame_range(placement: &ScenePlacement) -> String {
    format!("{:>4}..{:<4}", placement.start_frame, placement.end_frame())
}

/// Print the storyboard to the terminal with colors:
///
/// org/repo #42: "Add OAuth2 login flow"
/// Author: alice | Vibe: feature | Tone: celebratory | Accent: #8b5cf6
///
/// ═══ Timeline: 510 frames (17.0s @ 30fps) ═══
///    0..90   intro     org/repo #42 by @alice
///   ...
fn print_terminal_storyboard(script: &VideoScript, timeline: &Timeline) {
    let meta = &script.meta;
    println!();
    println!(
        "{} #{}: \"{}\"",
        meta.repo_name.bold(),
        meta.pr_number,
        meta.pr_title
    );
    println!(
        "Author: {} | Vibe: {} | Tone: {} | Accent: {}",
        meta.author, script.summary.vibe, script.style.tone, script.style.accent_color
    );
    println!();

    println!(
        "═══ {} ═══",
        format!(
            "Timeline: {} frames ({:.1}s @ {}fps)",
            timeline.total_frames,
            timeline.duration_secs(),
            timeline.fps
        )
        .bold()
    );
    for placement in &timeline.scenes {
        println!(
            "  {} {:<9} {}",
            frame_range(placement).dimmed(),
            colorize_kind(placement),
            scene_caption(placement)
        );
    }
    println!();
}

fn render_markdown(script: &VideoScript, timeline: &Timeline) -> String {
    let meta = &script.meta;
    let mut md = String::new();
    md.push_str(&format!(
        "# {} #{}: \"{}\"\n\n",
        meta.repo_name, meta.pr_number, meta.pr_title
    ));
    md.push_str(&format!(
        "**Author:** {} | **Files changed:** {} | **+{} -{}**\n\n",
        meta.author, meta.files_changed, meta.additions, meta.deletions
    ));

    md.push_str(&format!("## {} {}\n\n", script.summary.emoji, script.summary.headline));
    md.push_str(&format!(
        "**Vibe:** {} | **Tone:** {} | **Accent:** `{}`\n\n",
        script.summary.vibe, script.style.tone, script.style.accent_color
    ));
    for bullet in &script.summary.bullets {
        md.push_str(&format!("- {}\n", bullet));
    }
    md.push('\n');

    md.push_str(&format!(
        "## Timeline: {} frames ({:.1}s @ {}fps)\n\n",
        timeline.total_frames,
        timeline.duration_secs(),
        timeline.fps
    ));
    md.push_str("| Frames | Scene | Content |\n|---|---|---|\n");
    for placement in &timeline.scenes {
        md.push_str(&format!(
            "| {}–{} | {} | {} |\n",
            placement.start_frame,
            placement.end_frame(),
            placement.kind(),
            scene_caption(placement).replace('|', "\\|")
        ));
    }
    md
}

/// Helper to colorize a scene kind for terminal output.
fn colorize_kind(placement: &ScenePlacement) -> colored::ColoredString {
    let label = placement.kind().to_string();
    match &placement.props {
        SceneProps::Intro(_) => label.cyan().bold(),
        SceneProps::Headline(_) => label.magenta().bold(),
        SceneProps::Bullet(_) => label.green(),
        SceneProps::Outro(_) => label.yellow().bold(),
    }
}

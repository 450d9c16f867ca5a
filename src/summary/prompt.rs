use tracing::debug;

use crate::pr::diff::condense_patch;
use crate::pr::PullRequest;

/// Longest PR description passed to the model, in characters.
const MAX_BODY_CHARS: usize = 2_000;
/// Files whose patches are included; the rest are listed by name only.
const MAX_PATCHED_FILES: usize = 15;
/// Changed lines kept per file patch.
const MAX_LINES_PER_FILE: usize = 40;
/// Hard cap on the whole user prompt, in characters.
const MAX_PROMPT_CHARS: usize = 24_000;

pub const SYSTEM_PROMPT: &str = "You turn GitHub pull requests into scripts for 20-second \
celebratory videos. Write for developers skimming a feed: concrete, upbeat, no filler. \
Return a short headline (at most 8 words) describing the user-visible outcome, the vibe of \
the change, 3 to 5 bullets of at most 10 words each in the order a reviewer would want to \
hear them, a single emoji that fits the change, a hex accent color matching its mood, and \
the tone of the video.";

/// Render the user message describing the PR.
pub fn build_user_prompt(pr: &PullRequest) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!("Repository: {}\n", pr.repo_name));
    prompt.push_str(&format!("PR #{}: {}\n", pr.number, pr.title));
    prompt.push_str(&format!("Author: {}\n", pr.author));
    prompt.push_str(&format!(
        "Stats: {} files changed, +{} -{}\n",
        pr.files_changed, pr.additions, pr.deletions
    ));

    if let Some(body) = pr.body.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        prompt.push_str("\nDescription:\n");
        prompt.push_str(&truncate_chars(body, MAX_BODY_CHARS));
        prompt.push('\n');
    }

    if !pr.files.is_empty() {
        prompt.push_str("\nChanged files:\n");
        for file in &pr.files {
            prompt.push_str(&format!(
                "- {} ({}, +{} -{})\n",
                file.filename,
                file.status.as_deref().unwrap_or("modified"),
                file.additions,
                file.deletions
            ));
        }

        prompt.push_str("\nChanges:\n");
        for file in pr.files.iter().filter(|f| f.patch.is_some()).take(MAX_PATCHED_FILES) {
            let Some(patch) = file.patch.as_deref() else {
                continue;
            };
            // A patch GitHub truncated mid-hunk may not parse; skip it rather
            // than lose the whole prompt.
            match condense_patch(patch, MAX_LINES_PER_FILE) {
                Ok(condensed) if !condensed.is_empty() => {
                    prompt.push_str(&format!("### {}\n{}", file.filename, condensed));
                }
                Ok(_) => {}
                Err(e) => debug!(file = %file.filename, error = %e, "skipping unparseable patch"),
            }
        }
    }

    truncate_chars(&prompt, MAX_PROMPT_CHARS)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

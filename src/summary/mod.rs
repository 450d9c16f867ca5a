pub mod openai;
pub mod prompt;

pub use openai::OpenAiGenerator;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::pr::PullRequest;
use crate::script::{fallback_summary, is_hex_color, Style, Summary, Tone, VideoScript, Vibe};

/// Most bullets a video carries; extra generated bullets are dropped.
pub const MAX_BULLETS: usize = 5;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Language model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Language model returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed language model output: {0}")]
    Malformed(String),
}

/// Anything that can condense a pull request into a summary and style.
/// Implementations make a single attempt; retry policy is not theirs.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    /// Human-readable name of the provider (e.g., "openai:gpt-4o-mini")
    fn name(&self) -> &str;

    async fn generate(&self, pr: &PullRequest) -> Result<(Summary, Style), SummaryError>;
}

/// The structured object a language model is asked to return.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSummary {
    pub headline: String,
    pub vibe: Vibe,
    pub bullets: Vec<String>,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub accent_color: String,
    pub tone: Tone,
}

impl GeneratedSummary {
    /// Validate and normalize model output. A missing headline or an empty
    /// bullet list is malformed; cosmetic gaps are filled from the vibe.
    pub fn into_parts(self) -> Result<(Summary, Style), SummaryError> {
        let headline = self.headline.trim().to_string();
        if headline.is_empty() {
            return Err(SummaryError::Malformed("empty headline".to_string()));
        }

        let bullets: Vec<String> = self
            .bullets
            .iter()
            .map(|b| b.trim())
            .filter(|b| !b.is_empty())
            .take(MAX_BULLETS)
            .map(str::to_string)
            .collect();
        if bullets.is_empty() {
            return Err(SummaryError::Malformed("no bullets".to_string()));
        }

        let emoji = match self.emoji.trim() {
            "" => self.vibe.default_emoji().to_string(),
            e => e.to_string(),
        };
        let accent_color = if is_hex_color(self.accent_color.trim()) {
            self.accent_color.trim().to_string()
        } else {
            self.vibe.default_accent().to_string()
        };

        Ok((
            Summary {
                headline,
                vibe: self.vibe,
                bullets,
                emoji,
            },
            Style {
                accent_color,
                tone: self.tone,
            },
        ))
    }
}

/// One generation attempt, downgraded to the static fallback on any error
/// or when no generator is configured. Never fails.
pub async fn generate_or_fallback(
    generator: Option<&dyn SummaryGenerator>,
    pr: &PullRequest,
) -> (Summary, Style) {
    let Some(generator) = generator else {
        info!("no summary generator configured, using fallback summary");
        return fallback_summary(&pr.meta());
    };

    match generator.generate(pr).await {
        Ok(parts) => {
            info!(generator = generator.name(), bullets = parts.0.bullets.len(), "summary generated");
            parts
        }
        Err(e) => {
            warn!(generator = generator.name(), error = %e, "summary generation failed, using fallback");
            fallback_summary(&pr.meta())
        }
    }
}

/// Assemble the complete video script for a fetched pull request.
pub async fn build_script(generator: Option<&dyn SummaryGenerator>, pr: &PullRequest) -> VideoScript {
    let (summary, style) = generate_or_fallback(generator, pr).await;
    VideoScript {
        meta: pr.meta(),
        summary,
        style,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::script::{FALLBACK_ACCENT, FALLBACK_BULLETS};

    /// Helper to create a minimal PullRequest for testing.
    pub fn test_pull_request() -> PullRequest {
        PullRequest {
            repo_name: "org/repo".to_string(),
            number: 1,
            title: "Test PR".to_string(),
            body: None,
            author: "testuser".to_string(),
            author_avatar: "https://example.com/testuser.png".to_string(),
            files_changed: 0,
            additions: 0,
            deletions: 0,
            files: vec![],
        }
    }

    pub struct StaticGenerator;

    #[async_trait]
    impl SummaryGenerator for StaticGenerator {
        fn name(&self) -> &str {
            "static"
        }

        async fn generate(&self, _pr: &PullRequest) -> Result<(Summary, Style), SummaryError> {
            Ok((
                Summary {
                    headline: "Tests pass again".to_string(),
                    vibe: Vibe::Fix,
                    bullets: vec!["Fixes flaky test".to_string(), "Adds retry".to_string()],
                    emoji: "🩹".to_string(),
                },
                Style {
                    accent_color: "#22c55e".to_string(),
                    tone: Tone::Relief,
                },
            ))
        }
    }

    pub struct FailingGenerator;

    #[async_trait]
    impl SummaryGenerator for FailingGenerator {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(&self, _pr: &PullRequest) -> Result<(Summary, Style), SummaryError> {
            Err(SummaryError::Malformed("boom".to_string()))
        }
    }

    fn generated(bullets: Vec<&str>) -> GeneratedSummary {
        GeneratedSummary {
            headline: "  Login with OAuth2  ".to_string(),
            vibe: Vibe::Feature,
            bullets: bullets.into_iter().map(str::to_string).collect(),
            emoji: "🔐".to_string(),
            accent_color: "#123abc".to_string(),
            tone: Tone::Celebratory,
        }
    }

    #[test]
    fn test_into_parts_normalizes() {
        let (summary, style) = generated(vec!["one", " ", "two "]).into_parts().unwrap();
        assert_eq!(summary.headline, "Login with OAuth2");
        assert_eq!(summary.bullets, vec!["one", "two"]);
        assert_eq!(style.accent_color, "#123abc");
    }

    #[test]
    fn test_into_parts_caps_bullets() {
        let (summary, _) = generated(vec!["1", "2", "3", "4", "5", "6", "7"]).into_parts().unwrap();
        assert_eq!(summary.bullets.len(), MAX_BULLETS);
        assert_eq!(summary.bullets[4], "5");
    }

    #[test]
    fn test_into_parts_rejects_empty() {
        assert!(generated(vec![]).into_parts().is_err());
        let mut no_headline = generated(vec!["one"]);
        no_headline.headline = "   ".to_string();
        assert!(no_headline.into_parts().is_err());
    }

    #[test]
    fn test_into_parts_fills_cosmetics_from_vibe() {
        let mut g = generated(vec!["one"]);
        g.vibe = Vibe::Docs;
        g.emoji = String::new();
        g.accent_color = "blue".to_string();
        let (summary, style) = g.into_parts().unwrap();
        assert_eq!(summary.emoji, Vibe::Docs.default_emoji());
        assert_eq!(style.accent_color, Vibe::Docs.default_accent());
    }

    #[tokio::test]
    async fn test_generator_output_is_used() {
        let pr = test_pull_request();
        let (summary, style) = generate_or_fallback(Some(&StaticGenerator), &pr).await;
        assert_eq!(summary.headline, "Tests pass again");
        assert_eq!(style.tone, Tone::Relief);
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let pr = test_pull_request();
        let (summary, style) = generate_or_fallback(Some(&FailingGenerator), &pr).await;
        assert_eq!(summary.headline, "Test PR");
        assert_eq!(summary.bullets, FALLBACK_BULLETS.to_vec());
        assert_eq!(style.accent_color, FALLBACK_ACCENT);
    }

    #[tokio::test]
    async fn test_missing_generator_falls_back() {
        let pr = test_pull_request();
        let script = build_script(None, &pr).await;
        assert_eq!(script.meta.repo_name, "org/repo");
        assert_eq!(script.summary.bullets, FALLBACK_BULLETS.to_vec());
    }
}

use serde::{Deserialize, Serialize};

/// The complete input to composition: PR metadata, the generated summary,
/// and its visual style. Serialized with the same camelCase keys the API returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoScript {
    pub meta: Meta,
    pub summary: Summary,
    pub style: Style,
}

/// Pull request metadata shown in the intro and outro scenes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// "owner/name"
    pub repo_name: String,
    pub pr_number: u64,
    pub pr_title: String,
    /// Author's GitHub login
    pub author: String,
    pub author_avatar: String,
    pub files_changed: u64,
    pub additions: u64,
    pub deletions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub headline: String,
    pub vibe: Vibe,
    /// Rendered first to last, one bullet scene each.
    pub bullets: Vec<String>,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub accent_color: String,
    pub tone: Tone,
}

/// What kind of change the PR is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vibe {
    Feature,
    Fix,
    Refactor,
    Docs,
    Chore,
    #[serde(other)]
    Unknown,
}

impl Vibe {
    pub const ALL: [Vibe; 5] = [Vibe::Feature, Vibe::Fix, Vibe::Refactor, Vibe::Docs, Vibe::Chore];

    pub fn as_str(self) -> &'static str {
        match self {
            Vibe::Feature => "feature",
            Vibe::Fix => "fix",
            Vibe::Refactor => "refactor",
            Vibe::Docs => "docs",
            Vibe::Chore => "chore",
            Vibe::Unknown => "unknown",
        }
    }

    /// Accent used when the generated color is missing or not a hex color.
    pub fn default_accent(self) -> &'static str {
        match self {
            Vibe::Feature | Vibe::Unknown => FALLBACK_ACCENT,
            Vibe::Fix => "#22c55e",
            Vibe::Refactor => "#3b82f6",
            Vibe::Docs => "#f59e0b",
            Vibe::Chore => "#64748b",
        }
    }

    pub fn default_emoji(self) -> &'static str {
        match self {
            Vibe::Feature | Vibe::Unknown => FALLBACK_EMOJI,
            Vibe::Fix => "🐛",
            Vibe::Refactor => "🧹",
            Vibe::Docs => "📚",
            Vibe::Chore => "🔧",
        }
    }
}

impl std::fmt::Display for Vibe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emotional register of the video. Currently carried to the headline scene
/// without affecting its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Celebratory,
    Relief,
    Technical,
    Minor,
    #[serde(other)]
    Unknown,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::Celebratory, Tone::Relief, Tone::Technical, Tone::Minor];

    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Celebratory => "celebratory",
            Tone::Relief => "relief",
            Tone::Technical => "technical",
            Tone::Minor => "minor",
            Tone::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const FALLBACK_ACCENT: &str = "#8b5cf6";
pub const FALLBACK_EMOJI: &str = "✨";
pub const FALLBACK_BULLETS: [&str; 3] = [
    "Code changes to improve the project",
    "Check out the PR for the full details",
    "Thanks for contributing!",
];

/// The summary used whenever generation fails or no generator is configured.
pub fn fallback_summary(meta: &Meta) -> (Summary, Style) {
    let summary = Summary {
        headline: meta.pr_title.clone(),
        vibe: Vibe::Feature,
        bullets: FALLBACK_BULLETS.iter().map(|b| b.to_string()).collect(),
        emoji: FALLBACK_EMOJI.to_string(),
    };
    let style = Style {
        accent_color: FALLBACK_ACCENT.to_string(),
        tone: Tone::Celebratory,
    };
    (summary, style)
}

/// `#rgb` or `#rrggbb`.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[cfg(test)]
pub(crate) fn sample_script(bullets: usize) -> VideoScript {
    VideoScript {
        meta: Meta {
            repo_name: "org/repo".to_string(),
            pr_number: 42,
            pr_title: "Add OAuth2 login flow".to_string(),
            author: "alice".to_string(),
            author_avatar: "https://avatars.githubusercontent.com/u/1".to_string(),
            files_changed: 7,
            additions: 320,
            deletions: 45,
        },
        summary: Summary {
            headline: "Users can now log in with OAuth2".to_string(),
            vibe: Vibe::Feature,
            bullets: (0..bullets).map(|i| format!("Bullet {}", i + 1)).collect(),
            emoji: "🔐".to_string(),
        },
        style: Style {
            accent_color: "#22c55e".to_string(),
            tone: Tone::Celebratory,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_serializes_camel_case() {
        let json = serde_json::to_value(sample_script(3)).unwrap();
        assert_eq!(json["meta"]["repoName"], "org/repo");
        assert_eq!(json["meta"]["prNumber"], 42);
        assert_eq!(json["meta"]["authorAvatar"], "https://avatars.githubusercontent.com/u/1");
        assert_eq!(json["summary"]["vibe"], "feature");
        assert_eq!(json["style"]["accentColor"], "#22c55e");
        assert_eq!(json["style"]["tone"], "celebratory");
    }

    #[test]
    fn test_unknown_enum_values_do_not_fail() {
        let vibe: Vibe = serde_json::from_str("\"party\"").unwrap();
        let tone: Tone = serde_json::from_str("\"grumpy\"").unwrap();
        assert_eq!(vibe, Vibe::Unknown);
        assert_eq!(tone, Tone::Unknown);
        assert_eq!(vibe.default_accent(), FALLBACK_ACCENT);
    }

    #[test]
    fn test_fallback_summary_uses_title() {
        let meta = sample_script(0).meta;
        let (summary, style) = fallback_summary(&meta);
        assert_eq!(summary.headline, "Add OAuth2 login flow");
        assert_eq!(summary.bullets, FALLBACK_BULLETS.to_vec());
        assert_eq!(style.accent_color, FALLBACK_ACCENT);
        assert_eq!(style.tone, Tone::Celebratory);
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#8b5cf6"));
        assert!(is_hex_color("#FFF"));
        assert!(!is_hex_color("8b5cf6"));
        assert!(!is_hex_color("#zzzzzz"));
        assert!(!is_hex_color("#12345"));
    }
}

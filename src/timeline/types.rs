use serde::Serialize;

use crate::script::Tone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    Intro,
    Headline,
    Bullet,
    Outro,
}

impl std::fmt::Display for SceneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneKind::Intro => write!(f, "intro"),
            SceneKind::Headline => write!(f, "headline"),
            SceneKind::Bullet => write!(f, "bullet"),
            SceneKind::Outro => write!(f, "outro"),
        }
    }
}

/// Entrance animation style for a bullet scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Treatment {
    /// Slides in from the left next to an accent badge.
    SlideIn,
    /// Springs up from half size with an accent glow.
    ScaleIn,
    /// Rises into place, then an accent underline grows beneath it.
    Underline,
    /// An accent panel wipes across before the text fades in.
    Wipe,
}

impl std::fmt::Display for Treatment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Treatment::SlideIn => write!(f, "slide-in"),
            Treatment::ScaleIn => write!(f, "scale-in"),
            Treatment::Underline => write!(f, "underline"),
            Treatment::Wipe => write!(f, "wipe"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroProps {
    pub repo_name: String,
    pub pr_number: u64,
    pub author: String,
    pub author_avatar: String,
    pub accent_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineProps {
    pub headline: String,
    pub emoji: String,
    pub accent_color: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletProps {
    pub text: String,
    pub index: usize,
    pub treatment: Treatment,
    pub accent_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutroProps {
    pub repo_name: String,
    pub files_changed: u64,
    pub additions: u64,
    pub deletions: u64,
    pub accent_color: String,
    /// Needed to time the closing fade-out.
    pub duration_frames: u64,
}

/// Static inputs of one scene; the variant determines the scene kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SceneProps {
    Intro(IntroProps),
    Headline(HeadlineProps),
    Bullet(BulletProps),
    Outro(OutroProps),
}

/// A scene pinned to its window `[start_frame, start_frame + duration_frames)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePlacement {
    pub start_frame: u64,
    pub duration_frames: u64,
    pub props: SceneProps,
}

impl ScenePlacement {
    pub fn kind(&self) -> SceneKind {
        match self.props {
            SceneProps::Intro(_) => SceneKind::Intro,
            SceneProps::Headline(_) => SceneKind::Headline,
            SceneProps::Bullet(_) => SceneKind::Bullet,
            SceneProps::Outro(_) => SceneKind::Outro,
        }
    }

    /// First frame after this scene.
    pub fn end_frame(&self) -> u64 {
        self.start_frame + self.duration_frames
    }

    pub fn contains(&self, frame: u64) -> bool {
        frame >= self.start_frame && frame < self.end_frame()
    }
}

/// Ordered, gapless scene layout of a whole video.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub scenes: Vec<ScenePlacement>,
    pub total_frames: u64,
    pub fps: u32,
    pub width: u32,
    pub height: u32,
}

impl Timeline {
    /// The scene owning an absolute frame, with the frame relative to that
    /// scene's start. `None` past the end of the video.
    pub fn scene_at(&self, frame: u64) -> Option<(&ScenePlacement, u64)> {
        let idx = self.scenes.partition_point(|s| s.end_frame() <= frame);
        let scene = self.scenes.get(idx)?;
        scene.contains(frame).then(|| (scene, frame - scene.start_frame))
    }

    /// Video length in seconds at the timeline's frame rate.
    pub fn duration_secs(&self) -> f64 {
        self.total_frames as f64 / self.fps as f64
    }
}

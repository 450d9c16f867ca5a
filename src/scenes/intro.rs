use serde::Serialize;

use super::animation::{interpolate, interpolate_clamped, spring, Extrapolate, SpringConfig};
use crate::timeline::IntroProps;

/// Visual state of the intro scene on one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroFrame {
    pub repo_name: String,
    pub pr_number: u64,
    pub author: String,
    pub author_avatar: String,
    pub accent_color: String,
    /// Vertical offset of the repo title in pixels, settling at 0.
    pub title_offset_y: f64,
    pub title_opacity: f64,
    pub avatar_scale: f64,
}

const AVATAR_DELAY: f64 = 10.0;

pub fn render(frame: u64, fps: f64, props: &IntroProps) -> IntroFrame {
    let frame = frame as f64;
    let title_spring = spring(frame, fps, SpringConfig::damped(200.0));
    let avatar_spring = spring(frame - AVATAR_DELAY, fps, SpringConfig::damped(200.0));

    IntroFrame {
        repo_name: props.repo_name.clone(),
        pr_number: props.pr_number,
        author: props.author.clone(),
        author_avatar: props.author_avatar.clone(),
        accent_color: props.accent_color.clone(),
        title_offset_y: interpolate(
            title_spring,
            (0.0, 1.0),
            (100.0, 0.0),
            Extrapolate::Extend,
            Extrapolate::Extend,
        ),
        title_opacity: interpolate_clamped(frame, (0.0, 15.0), (0.0, 1.0)),
        avatar_scale: avatar_spring,
    }
}

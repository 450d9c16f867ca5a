use serde::Serialize;

use super::animation::{count_up, interpolate, interpolate_clamped, spring, Extrapolate, SpringConfig};
use crate::timeline::OutroProps;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutroFrame {
    pub repo_name: String,
    pub accent_color: String,
    pub stats_scale: f64,
    pub stats_opacity: f64,
    pub files: u64,
    pub additions: u64,
    pub deletions: u64,
    /// Whole-scene opacity; reaches 0 on the last frame.
    pub fade: f64,
}

/// Frames each counter takes to reach its value.
pub const COUNTER_WINDOW: f64 = 30.0;
pub const FILES_OFFSET: f64 = 0.0;
pub const ADDITIONS_OFFSET: f64 = 5.0;
pub const DELETIONS_OFFSET: f64 = 10.0;
/// Length of the closing fade-out.
pub const FADE_FRAMES: u64 = 20;

pub fn render(frame: u64, fps: f64, props: &OutroProps) -> OutroFrame {
    let last_frame = props.duration_frames.saturating_sub(1) as f64;
    let fade_start = props.duration_frames.saturating_sub(FADE_FRAMES) as f64;
    let frame = frame as f64;

    let stats_spring = spring(frame, fps, SpringConfig::damped(200.0));

    OutroFrame {
        repo_name: props.repo_name.clone(),
        accent_color: props.accent_color.clone(),
        stats_scale: interpolate(
            stats_spring,
            (0.0, 1.0),
            (0.8, 1.0),
            Extrapolate::Extend,
            Extrapolate::Extend,
        ),
        stats_opacity: interpolate_clamped(frame, (0.0, 15.0), (0.0, 1.0)),
        files: count_up(frame, FILES_OFFSET, COUNTER_WINDOW, props.files_changed),
        additions: count_up(frame, ADDITIONS_OFFSET, COUNTER_WINDOW, props.additions),
        deletions: count_up(frame, DELETIONS_OFFSET, COUNTER_WINDOW, props.deletions),
        fade: interpolate_clamped(frame, (fade_start, last_frame), (1.0, 0.0)),
    }
}

use serde::Serialize;

use super::animation::{interpolate, interpolate_clamped, spring, Extrapolate, SpringConfig};
use crate::script::Tone;
use crate::timeline::HeadlineProps;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineFrame {
    pub headline: String,
    pub emoji: String,
    pub accent_color: String,
    /// Passed through untouched; no tone-specific styling exists yet.
    pub tone: Tone,
    pub text_scale: f64,
    pub text_opacity: f64,
    pub emoji_scale: f64,
    pub emoji_rotation_deg: f64,
    /// Continuous bobbing offset in pixels.
    pub emoji_float_y: f64,
}

const EMOJI_DELAY: f64 = 15.0;

fn extend(input: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    interpolate(input, from, to, Extrapolate::Extend, Extrapolate::Extend)
}

pub fn render(frame: u64, fps: f64, props: &HeadlineProps) -> HeadlineFrame {
    let frame = frame as f64;

    let text_spring = spring(frame, fps, SpringConfig::damped(200.0).with_stiffness(100.0));
    let emoji_spring = spring(
        frame - EMOJI_DELAY,
        fps,
        SpringConfig::damped(100.0).with_stiffness(200.0),
    );

    HeadlineFrame {
        headline: props.headline.clone(),
        emoji: props.emoji.clone(),
        accent_color: props.accent_color.clone(),
        tone: props.tone,
        text_scale: extend(text_spring, (0.0, 1.0), (0.8, 1.0)),
        text_opacity: interpolate_clamped(frame, (0.0, 20.0), (0.0, 1.0)),
        emoji_scale: extend(emoji_spring, (0.0, 1.0), (0.0, 1.2)),
        emoji_rotation_deg: extend(emoji_spring, (0.0, 1.0), (-30.0, 0.0)),
        emoji_float_y: (frame * 0.1).sin() * 5.0,
    }
}

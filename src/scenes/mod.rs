pub mod animation;
pub mod bullet;
pub mod headline;
pub mod intro;
pub mod outro;

pub use bullet::{BulletFrame, TreatmentFrame};
pub use headline::HeadlineFrame;
pub use intro::IntroFrame;
pub use outro::OutroFrame;

use serde::Serialize;

use crate::timeline::{SceneKind, SceneProps, ScenePlacement, Timeline};

/// Visual parameters of a single scene on a single frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scene", rename_all = "lowercase")]
pub enum SceneFrame {
    Intro(IntroFrame),
    Headline(HeadlineFrame),
    Bullet(BulletFrame),
    Outro(OutroFrame),
}

/// Everything needed to draw one absolute frame of the video.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedFrame {
    pub frame: u64,
    pub kind: SceneKind,
    pub scene_start: u64,
    /// Frame relative to the start of the owning scene.
    pub local_frame: u64,
    pub params: SceneFrame,
}

/// Compute a scene's parameters at a frame of its own clock.
pub fn render_scene(placement: &ScenePlacement, local_frame: u64, fps: u32) -> SceneFrame {
    let fps = fps as f64;
    match &placement.props {
        SceneProps::Intro(props) => SceneFrame::Intro(intro::render(local_frame, fps, props)),
        SceneProps::Headline(props) => {
            SceneFrame::Headline(headline::render(local_frame, fps, props))
        }
        SceneProps::Bullet(props) => SceneFrame::Bullet(bullet::render(local_frame, fps, props)),
        SceneProps::Outro(props) => SceneFrame::Outro(outro::render(local_frame, fps, props)),
    }
}

/// Compute the parameters of an absolute frame. Depends only on the
/// arguments, so seeking straight to a frame equals playing up to it.
/// Returns `None` for frames past the end of the video.
pub fn render_frame(timeline: &Timeline, frame: u64) -> Option<RenderedFrame> {
    let (placement, local_frame) = timeline.scene_at(frame)?;
    Some(RenderedFrame {
        frame,
        kind: placement.kind(),
        scene_start: placement.start_frame,
        local_frame,
        params: render_scene(placement, local_frame, timeline.fps),
    })
}

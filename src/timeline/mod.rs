pub mod types;

pub use types::{
    BulletProps, HeadlineProps, IntroProps, OutroProps, SceneKind, ScenePlacement, SceneProps,
    Timeline, Treatment,
};

use crate::script::VideoScript;

/// Reference frame rate every duration below is expressed in.
pub const FPS: u32 = 30;
pub const WIDTH: u32 = 1920;
pub const HEIGHT: u32 = 1080;

/// 3s
pub const INTRO_DURATION: u64 = 90;
/// 3.5s
pub const HEADLINE_DURATION: u64 = 105;
/// 2.5s per bullet
pub const BULLET_DURATION: u64 = 75;
/// 3s
pub const OUTRO_DURATION: u64 = 90;

/// First frame of the first bullet scene.
pub const BULLETS_START: u64 = INTRO_DURATION + HEADLINE_DURATION;

/// Bullet treatments in rotation order.
pub const TREATMENTS: [Treatment; 4] = [
    Treatment::SlideIn,
    Treatment::ScaleIn,
    Treatment::Underline,
    Treatment::Wipe,
];

/// Total video length in frames for a given number of bullets.
pub fn compute_total_duration(bullet_count: usize) -> u64 {
    INTRO_DURATION + HEADLINE_DURATION + bullet_count as u64 * BULLET_DURATION + OUTRO_DURATION
}

/// Treatment for the bullet at `index`, rotating through [`TREATMENTS`].
pub fn treatment_for(index: usize) -> Treatment {
    TREATMENTS[index % TREATMENTS.len()]
}

/// Lay out every scene of the video back to back.
///
/// Each placement starts on the frame the previous one ends, so the scenes
/// partition `[0, total_frames)` exactly. An empty bullet list is valid: the
/// outro then follows the headline directly.
pub fn compute_timeline(script: &VideoScript) -> Timeline {
    let meta = &script.meta;
    let summary = &script.summary;
    let accent = &script.style.accent_color;

    let mut scenes = Vec::with_capacity(summary.bullets.len() + 3);
    let mut cursor = 0u64;
    let mut place = |duration_frames: u64, props: SceneProps| {
        scenes.push(ScenePlacement {
            start_frame: cursor,
            duration_frames,
            props,
        });
        cursor += duration_frames;
    };

    place(
        INTRO_DURATION,
        SceneProps::Intro(IntroProps {
            repo_name: meta.repo_name.clone(),
            pr_number: meta.pr_number,
            author: meta.author.clone(),
            author_avatar: meta.author_avatar.clone(),
            accent_color: accent.clone(),
        }),
    );

    place(
        HEADLINE_DURATION,
        SceneProps::Headline(HeadlineProps {
            headline: summary.headline.clone(),
            emoji: summary.emoji.clone(),
            accent_color: accent.clone(),
            tone: script.style.tone,
        }),
    );

    for (index, text) in summary.bullets.iter().enumerate() {
        place(
            BULLET_DURATION,
            SceneProps::Bullet(BulletProps {
                text: text.clone(),
                index,
                treatment: treatment_for(index),
                accent_color: accent.clone(),
            }),
        );
    }

    place(
        OUTRO_DURATION,
        SceneProps::Outro(OutroProps {
            repo_name: meta.repo_name.clone(),
            files_changed: meta.files_changed,
            additions: meta.additions,
            deletions: meta.deletions,
            accent_color: accent.clone(),
            duration_frames: OUTRO_DURATION,
        }),
    );

    Timeline {
        scenes,
        total_frames: compute_total_duration(summary.bullets.len()),
        fps: FPS,
        width: WIDTH,
        height: HEIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::sample_script;

    fn assert_contiguous(timeline: &Timeline) {
        let mut expected_start = 0;
        for scene in &timeline.scenes {
            assert_eq!(scene.start_frame, expected_start, "gap or overlap at {:?}", scene.kind());
            assert!(scene.duration_frames > 0);
            expected_start = scene.end_frame();
        }
        assert_eq!(expected_start, timeline.total_frames);
    }

    #[test]
    fn test_total_duration_formula() {
        for n in 0..50 {
            assert_eq!(compute_total_duration(n), 285 + 75 * n as u64);
        }
        assert_eq!(compute_total_duration(0), 285);
    }

    #[test]
    fn test_three_bullets() {
        let timeline = compute_timeline(&sample_script(3));
        assert_eq!(timeline.total_frames, 510);
        assert_eq!(timeline.scenes.len(), 6);

        let bullet_starts: Vec<u64> = timeline
            .scenes
            .iter()
            .filter(|s| s.kind() == SceneKind::Bullet)
            .map(|s| s.start_frame)
            .collect();
        assert_eq!(bullet_starts, vec![195, 270, 345]);
        assert_eq!(bullet_starts[0], BULLETS_START);

        let outro = timeline.scenes.last().unwrap();
        assert_eq!(outro.kind(), SceneKind::Outro);
        assert_eq!(outro.start_frame, 420);
        assert_eq!(outro.duration_frames, 90);
    }

    #[test]
    fn test_zero_bullets() {
        let timeline = compute_timeline(&sample_script(0));
        let kinds: Vec<SceneKind> = timeline.scenes.iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, vec![SceneKind::Intro, SceneKind::Headline, SceneKind::Outro]);
        assert_eq!(timeline.scenes[2].start_frame, 195);
        assert_eq!(timeline.total_frames, 285);
    }

    #[test]
    fn test_placements_are_contiguous_for_many_counts() {
        for n in [0, 1, 2, 3, 4, 5, 9, 40] {
            let timeline = compute_timeline(&sample_script(n));
            assert_eq!(timeline.scenes.len(), n + 3);
            assert_contiguous(&timeline);
        }
    }

    #[test]
    fn test_fixed_scene_positions() {
        let timeline = compute_timeline(&sample_script(2));
        assert_eq!((timeline.scenes[0].start_frame, timeline.scenes[0].duration_frames), (0, 90));
        assert_eq!((timeline.scenes[1].start_frame, timeline.scenes[1].duration_frames), (90, 105));
    }

    #[test]
    fn test_bullets_keep_order_and_rotate_treatments() {
        let timeline = compute_timeline(&sample_script(6));
        let bullets: Vec<&BulletProps> = timeline
            .scenes
            .iter()
            .filter_map(|s| match &s.props {
                SceneProps::Bullet(b) => Some(b),
                _ => None,
            })
            .collect();
        assert_eq!(bullets.len(), 6);
        for (i, bullet) in bullets.iter().enumerate() {
            assert_eq!(bullet.index, i);
            assert_eq!(bullet.text, format!("Bullet {}", i + 1));
            assert_eq!(bullet.treatment, TREATMENTS[i % 4]);
        }
        assert_eq!(bullets[4].treatment, Treatment::SlideIn);
        assert_eq!(bullets[5].treatment, Treatment::ScaleIn);
    }

    #[test]
    fn test_treatment_assignment_is_stable() {
        let first: Vec<Treatment> = (0..12).map(treatment_for).collect();
        let second: Vec<Treatment> = (0..12).map(treatment_for).collect();
        assert_eq!(first, second);
        assert_eq!(treatment_for(3), Treatment::Wipe);
        assert_eq!(treatment_for(7), Treatment::Wipe);
    }

    #[test]
    fn test_scene_at_owns_every_frame_once() {
        let timeline = compute_timeline(&sample_script(3));
        for frame in 0..timeline.total_frames {
            let (scene, local) = timeline.scene_at(frame).unwrap();
            assert!(scene.contains(frame));
            assert_eq!(scene.start_frame + local, frame);
            let owners = timeline.scenes.iter().filter(|s| s.contains(frame)).count();
            assert_eq!(owners, 1);
        }
        assert!(timeline.scene_at(timeline.total_frames).is_none());
    }

    #[test]
    fn test_scene_boundaries() {
        let timeline = compute_timeline(&sample_script(3));
        assert_eq!(timeline.scene_at(89).unwrap().0.kind(), SceneKind::Intro);
        assert_eq!(timeline.scene_at(90).unwrap().0.kind(), SceneKind::Headline);
        let (scene, local) = timeline.scene_at(270).unwrap();
        assert_eq!(scene.kind(), SceneKind::Bullet);
        assert_eq!(local, 0);
        let (scene, local) = timeline.scene_at(509).unwrap();
        assert_eq!(scene.kind(), SceneKind::Outro);
        assert_eq!(local, 89);
    }
}

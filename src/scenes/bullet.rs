use serde::Serialize;

use super::animation::{interpolate, interpolate_clamped, spring, Extrapolate, SpringConfig};
use crate::timeline::{BulletProps, Treatment};

/// Per-treatment animated values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "treatment", rename_all = "camelCase")]
pub enum TreatmentFrame {
    #[serde(rename_all = "camelCase")]
    SlideIn { offset_x: f64, opacity: f64 },
    #[serde(rename_all = "camelCase")]
    ScaleIn { scale: f64, opacity: f64 },
    #[serde(rename_all = "camelCase")]
    Underline {
        offset_y: f64,
        opacity: f64,
        /// Percentage of the text width covered by the underline.
        underline_width_pct: f64,
    },
    #[serde(rename_all = "camelCase")]
    Wipe {
        /// Percentage of the frame covered by the accent panel.
        reveal_pct: f64,
        text_opacity: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletFrame {
    pub text: String,
    pub index: usize,
    pub accent_color: String,
    pub visual: TreatmentFrame,
}

fn eased(progress: f64, to: (f64, f64)) -> f64 {
    interpolate(progress, (0.0, 1.0), to, Extrapolate::Extend, Extrapolate::Extend)
}

pub fn render(frame: u64, fps: f64, props: &BulletProps) -> BulletFrame {
    BulletFrame {
        text: props.text.clone(),
        index: props.index,
        accent_color: props.accent_color.clone(),
        visual: animate(props.treatment, frame as f64, fps),
    }
}

fn animate(treatment: Treatment, frame: f64, fps: f64) -> TreatmentFrame {
    match treatment {
        Treatment::SlideIn => {
            let progress = spring(frame, fps, SpringConfig::damped(200.0));
            TreatmentFrame::SlideIn {
                offset_x: eased(progress, (-400.0, 0.0)),
                opacity: interpolate_clamped(frame, (0.0, 15.0), (0.0, 1.0)),
            }
        }
        Treatment::ScaleIn => {
            let progress = spring(frame, fps, SpringConfig::damped(100.0).with_stiffness(200.0));
            TreatmentFrame::ScaleIn {
                scale: eased(progress, (0.5, 1.0)),
                opacity: interpolate_clamped(frame, (0.0, 10.0), (0.0, 1.0)),
            }
        }
        Treatment::Underline => {
            let progress = spring(frame, fps, SpringConfig::damped(200.0));
            TreatmentFrame::Underline {
                offset_y: eased(progress, (50.0, 0.0)),
                opacity: interpolate_clamped(frame, (0.0, 15.0), (0.0, 1.0)),
                underline_width_pct: interpolate_clamped(frame, (15.0, 40.0), (0.0, 100.0)),
            }
        }
        Treatment::Wipe => {
            let progress = spring(frame, fps, SpringConfig::damped(200.0));
            TreatmentFrame::Wipe {
                reveal_pct: eased(progress, (0.0, 50.0)),
                text_opacity: interpolate_clamped(frame, (10.0, 25.0), (0.0, 1.0)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::TREATMENTS;

    fn props(treatment: Treatment) -> BulletProps {
        BulletProps {
            text: "Adds retry support".to_string(),
            index: 0,
            treatment,
            accent_color: "#8b5cf6".to_string(),
        }
    }

    fn opacity(visual: &TreatmentFrame) -> f64 {
        match visual {
            TreatmentFrame::SlideIn { opacity, .. }
            | TreatmentFrame::ScaleIn { opacity, .. }
            | TreatmentFrame::Underline { opacity, .. } => *opacity,
            TreatmentFrame::Wipe { text_opacity, .. } => *text_opacity,
        }
    }

    #[test]
    fn test_treatment_variant_matches_props() {
        for treatment in TREATMENTS {
            let visual = render(0, 30.0, &props(treatment)).visual;
            let matches = matches!(
                (treatment, &visual),
                (Treatment::SlideIn, TreatmentFrame::SlideIn { .. })
                    | (Treatment::ScaleIn, TreatmentFrame::ScaleIn { .. })
                    | (Treatment::Underline, TreatmentFrame::Underline { .. })
                    | (Treatment::Wipe, TreatmentFrame::Wipe { .. })
            );
            assert!(matches, "{} rendered as {:?}", treatment, visual);
        }
    }

    #[test]
    fn test_every_treatment_is_visible_by_frame_25() {
        for treatment in TREATMENTS {
            for frame in 25..75 {
                let visual = render(frame, 30.0, &props(treatment)).visual;
                assert_eq!(opacity(&visual), 1.0, "{} not opaque at {}", treatment, frame);
            }
        }
    }

    #[test]
    fn test_entrances_settle() {
        match render(30, 30.0, &props(Treatment::SlideIn)).visual {
            TreatmentFrame::SlideIn { offset_x, .. } => assert!(offset_x.abs() < 1.0),
            other => panic!("unexpected {:?}", other),
        }
        match render(30, 30.0, &props(Treatment::ScaleIn)).visual {
            TreatmentFrame::ScaleIn { scale, .. } => assert!((scale - 1.0).abs() < 0.001),
            other => panic!("unexpected {:?}", other),
        }
        match render(74, 30.0, &props(Treatment::Underline)).visual {
            TreatmentFrame::Underline { offset_y, underline_width_pct, .. } => {
                assert!(offset_y.abs() < 0.01);
                assert_eq!(underline_width_pct, 100.0);
            }
            other => panic!("unexpected {:?}", other),
        }
        match render(74, 30.0, &props(Treatment::Wipe)).visual {
            TreatmentFrame::Wipe { reveal_pct, .. } => assert!((reveal_pct - 50.0).abs() < 0.01),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_wipe_text_waits_for_panel() {
        match render(5, 30.0, &props(Treatment::Wipe)).visual {
            TreatmentFrame::Wipe { reveal_pct, text_opacity } => {
                assert!(reveal_pct > 0.0);
                assert_eq!(text_opacity, 0.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_serializes_with_treatment_tag() {
        let json = serde_json::to_value(render(0, 30.0, &props(Treatment::Underline))).unwrap();
        assert_eq!(json["visual"]["treatment"], "underline");
        assert!(json["visual"]["underlineWidthPct"].is_number());
    }
}

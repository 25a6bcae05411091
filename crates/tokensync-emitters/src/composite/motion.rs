use super::{kotlin_float, number, CompositeKind};
use tokensync_conventions::DetectedConventions;
use tokensync_core::{TokenNode, TokenValue, TransitionValue};

/// Transitions, durations and easing curves
pub struct MotionKind;

#[derive(Debug, Clone, PartialEq)]
pub enum MotionValue {
    Transition(TransitionValue),
    /// Milliseconds
    Duration(f64),
    Easing([f64; 4]),
}

fn cubic_bezier(easing: &[f64; 4]) -> String {
    let [a, b, c, d] = (*easing).map(number);
    format!("cubic-bezier({}, {}, {}, {})", a, b, c, d)
}

fn swift_curve(easing: &[f64; 4]) -> String {
    let [a, b, c, d] = (*easing).map(number);
    format!("{}, {}, {}, {}", a, b, c, d)
}

fn kotlin_easing(easing: &[f64; 4]) -> String {
    let [a, b, c, d] = (*easing).map(kotlin_float);
    format!("CubicBezierEasing({}, {}, {}, {})", a, b, c, d)
}

impl CompositeKind for MotionKind {
    type Value = MotionValue;

    fn word(&self) -> &'static str {
        "motion"
    }

    fn classify(&self, _path: &[String], _node: &TokenNode, value: &TokenValue) -> Option<MotionValue> {
        match value {
            TokenValue::Transition(transition) => Some(MotionValue::Transition(transition.clone())),
            TokenValue::Duration(ms) => Some(MotionValue::Duration(*ms)),
            TokenValue::CubicBezier(easing) => Some(MotionValue::Easing(*easing)),
            _ => None,
        }
    }

    fn css(&self, value: &MotionValue, _conventions: &DetectedConventions) -> String {
        match value {
            MotionValue::Transition(t) => format!(
                "{}ms {} {}ms",
                number(t.duration_ms),
                cubic_bezier(&t.easing),
                number(t.delay_ms)
            ),
            MotionValue::Duration(ms) => format!("{}ms", number(*ms)),
            MotionValue::Easing(easing) => cubic_bezier(easing),
        }
    }

    fn swift(&self, value: &MotionValue) -> String {
        match value {
            MotionValue::Transition(t) => {
                let animation = format!(
                    "Animation.timingCurve({}, duration: {})",
                    swift_curve(&t.easing),
                    number(t.duration_ms / 1000.0)
                );
                if t.delay_ms > 0.0 {
                    format!("{}.delay({})", animation, number(t.delay_ms / 1000.0))
                } else {
                    animation
                }
            }
            MotionValue::Duration(ms) => format!("TimeInterval({})", number(ms / 1000.0)),
            MotionValue::Easing(easing) => format!("Animation.timingCurve({})", swift_curve(easing)),
        }
    }

    fn kotlin(&self, value: &MotionValue) -> String {
        match value {
            MotionValue::Transition(t) => format!(
                "tween<Float>(durationMillis = {}, delayMillis = {}, easing = {})",
                t.duration_ms.round() as i64,
                t.delay_ms.round() as i64,
                kotlin_easing(&t.easing)
            ),
            MotionValue::Duration(ms) => format!("{}", ms.round() as i64),
            MotionValue::Easing(easing) => kotlin_easing(easing),
        }
    }

    fn kotlin_imports(&self) -> &'static [&'static str] {
        &[
            "androidx.compose.animation.core.CubicBezierEasing",
            "androidx.compose.animation.core.tween",
        ]
    }
}

use eframe::egui::Vec2;

use super::store::{Body, NodeStore};

const MIN_STEP_SCALE: f32 = 0.25;
const MAX_STEP_SCALE: f32 = 3.0;
const REFERENCE_FRAME_RATE: f32 = 60.0;

/// How much simulated time one tick represents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) enum StepTiming {
    /// One unit step per displayed frame, whatever the frame rate.
    #[default]
    PerFrame,
    /// Steps scale with measured frame time relative to 60 Hz.
    Elapsed,
}

impl StepTiming {
    pub(in crate::app) fn label(self) -> &'static str {
        match self {
            Self::PerFrame => "Per frame",
            Self::Elapsed => "Elapsed time",
        }
    }

    pub(in crate::app) fn step_scale(self, elapsed_secs: f32) -> f32 {
        match self {
            Self::PerFrame => 1.0,
            Self::Elapsed if elapsed_secs.is_finite() => {
                (elapsed_secs * REFERENCE_FRAME_RATE).clamp(MIN_STEP_SCALE, MAX_STEP_SCALE)
            }
            Self::Elapsed => 1.0,
        }
    }
}

/// Applies accumulated velocity deltas, damps, then advances positions.
/// Pinned nodes keep their position and never gain velocity.
pub(super) fn integrate(
    store: &NodeStore,
    deltas: &[Vec2],
    damping: f32,
    step_scale: f32,
) -> Vec<Body> {
    let damping_factor = damping.powf(step_scale);

    store
        .nodes()
        .iter()
        .zip(store.bodies())
        .zip(deltas)
        .map(|((node, body), delta)| {
            if node.pinned {
                return Body {
                    position: body.position,
                    velocity: Vec2::ZERO,
                };
            }

            let velocity = (body.velocity + (*delta * step_scale)) * damping_factor;
            Body {
                position: body.position + (velocity * step_scale),
                velocity,
            }
        })
        .collect()
}

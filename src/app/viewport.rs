use eframe::egui::{Pos2, Vec2};

pub(super) const MIN_SCALE: f32 = 0.1;
pub(super) const MAX_SCALE: f32 = 4.0;
const ZOOM_STEP: f32 = 1.2;
const WHEEL_SENSITIVITY: f32 = 0.001;

/// Pan/zoom mapping from layout space to view space. Scale is clamped after
/// every mutation; nothing here touches simulation state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct ViewportTransform {
    pan: Vec2,
    scale: f32,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl ViewportTransform {
    pub(super) fn pan(&self) -> Vec2 {
        self.pan
    }

    pub(super) fn scale(&self) -> f32 {
        self.scale
    }

    pub(super) fn set_pan(&mut self, pan: Vec2) {
        if pan.is_finite() {
            self.pan = pan;
        }
    }

    fn set_scale(&mut self, scale: f32) {
        if !scale.is_nan() {
            self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        }
    }

    /// `delta_y` uses the browser convention: positive scrolls down and
    /// zooms out.
    pub(super) fn wheel(&mut self, delta_y: f32) {
        self.set_scale(self.scale - (delta_y * WHEEL_SENSITIVITY));
    }

    pub(super) fn zoom_in(&mut self) {
        self.set_scale(self.scale * ZOOM_STEP);
    }

    pub(super) fn zoom_out(&mut self) {
        self.set_scale(self.scale / ZOOM_STEP);
    }

    pub(super) fn fit(&mut self) {
        *self = Self::default();
    }

    pub(super) fn to_screen(&self, world: Vec2) -> Pos2 {
        ((world * self.scale) + self.pan).to_pos2()
    }

    pub(super) fn to_world(&self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.pan) / self.scale
    }
}

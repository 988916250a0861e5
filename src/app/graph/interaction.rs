use eframe::egui::{self, Pos2, Ui};

use super::super::interaction::InteractionEvent;
use super::super::projection::RenderProjection;
use super::super::render_utils::ViewBox;
use super::super::ViewModel;

/// egui's default line scroll speed, in points per wheel notch.
const POINTS_PER_NOTCH: f32 = 40.0;
/// Browser `deltaY` for one wheel notch.
const DOM_DELTA_PER_NOTCH: f32 = 100.0;

/// Converts an egui vertical scroll (points, wheel-up positive) into a
/// DOM-style `deltaY` (pixels, wheel-up negative).
fn dom_wheel_delta(scroll_points: f32) -> f32 {
    -scroll_points * (DOM_DELTA_PER_NOTCH / POINTS_PER_NOTCH)
}

impl ViewModel {
    /// Feeds this frame's canvas input to the controller. Returns true when
    /// the viewport moved and the projection is stale.
    pub(in crate::app) fn handle_graph_input(
        &mut self,
        ui: &Ui,
        response: &egui::Response,
        view_box: ViewBox,
        projection: &RenderProjection,
    ) -> bool {
        let before = (self.viewport.pan(), self.viewport.scale());

        if response.hovered() {
            let scroll = ui.input(|input| input.raw_scroll_delta.y);
            if scroll.abs() > f32::EPSILON {
                self.controller.wheel(dom_wheel_delta(scroll), &mut self.viewport);
            }
        }

        let (pressed, released, interact_pos, hover_pos) = ui.input(|input| {
            (
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.pointer.interact_pos(),
                input.pointer.hover_pos(),
            )
        });
        let pointer = interact_pos.map(|position| view_box.to_view(position));

        if pressed
            && response.hovered()
            && let Some(pointer) = pointer
        {
            self.controller.pointer_down(pointer, self.view_mode, &self.viewport);
        }

        if self.controller.is_dragging()
            && let Some(pointer) = pointer
        {
            self.controller.pointer_move(pointer, &mut self.viewport);
        }

        if released && self.controller.is_dragging() {
            // Without a position the release can never count as a click.
            let release_at = pointer.unwrap_or(Pos2::new(f32::NAN, f32::NAN));
            if let Some(event) = self.controller.pointer_up(release_at, projection) {
                self.apply_interaction_event(event);
            }
        }

        let hover = hover_pos
            .filter(|_| response.hovered())
            .map(|position| view_box.to_view(position));
        if let Some(event) = self.controller.hover(hover, projection) {
            self.apply_interaction_event(event);
        }

        if self.controller.is_dragging() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grabbing);
        } else if self.controller.hovered().is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        before != (self.viewport.pan(), self.viewport.scale())
    }

    pub(in crate::app) fn apply_interaction_event(&mut self, event: InteractionEvent) {
        match event {
            InteractionEvent::Hovered(id) => {
                tracing::trace!(hovered = ?id, "hover changed");
            }
            InteractionEvent::Selected(id) => {
                tracing::debug!(selected = ?id, "selection changed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::viewport::ViewportTransform;

    #[test]
    fn one_wheel_notch_matches_browser_zoom_step() {
        let mut viewport = ViewportTransform::default();
        viewport.wheel(dom_wheel_delta(POINTS_PER_NOTCH));
        assert!((viewport.scale() - 1.1).abs() < 1e-5);

        viewport.wheel(dom_wheel_delta(-POINTS_PER_NOTCH));
        assert!((viewport.scale() - 1.0).abs() < 1e-5);
    }
}

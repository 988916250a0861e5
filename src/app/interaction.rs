use eframe::egui::{Pos2, Vec2};

use super::projection::RenderProjection;
use super::viewport::ViewportTransform;

/// Pointer travel, in view units, below which a press/release is a click.
const CLICK_SLOP: f32 = 4.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) enum ViewMode {
    #[default]
    Graph,
    List,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum InteractionEvent {
    Hovered(Option<String>),
    Selected(Option<String>),
}

/// Turns pointer and wheel input into viewport changes and hover/selection
/// events. Never touches the node store.
#[derive(Default)]
pub(super) struct InteractionController {
    dragging: bool,
    drag_origin: Vec2,
    press_position: Option<Pos2>,
    hovered: Option<String>,
    selected: Option<String>,
}

impl InteractionController {
    pub(super) fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub(super) fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub(super) fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub(super) fn pointer_down(
        &mut self,
        pointer: Pos2,
        mode: ViewMode,
        viewport: &ViewportTransform,
    ) {
        if mode != ViewMode::Graph {
            return;
        }

        self.dragging = true;
        self.drag_origin = pointer.to_vec2() - viewport.pan();
        self.press_position = Some(pointer);
    }

    pub(super) fn pointer_move(&mut self, pointer: Pos2, viewport: &mut ViewportTransform) {
        if !self.dragging {
            return;
        }
        viewport.set_pan(pointer.to_vec2() - self.drag_origin);
    }

    /// Ends a drag. A release close to where the press started selects the
    /// node under the pointer instead (or clears the selection on empty space).
    pub(super) fn pointer_up(
        &mut self,
        pointer: Pos2,
        projection: &RenderProjection,
    ) -> Option<InteractionEvent> {
        self.dragging = false;
        let was_click = self
            .press_position
            .take()
            .is_some_and(|pressed| pressed.distance(pointer) < CLICK_SLOP);
        if !was_click {
            return None;
        }

        let hit = projection.hit_test(pointer).map(|node| node.id.clone());
        self.select(hit)
    }

    pub(super) fn wheel(&mut self, delta_y: f32, viewport: &mut ViewportTransform) {
        viewport.wheel(delta_y);
    }

    pub(super) fn hover(
        &mut self,
        pointer: Option<Pos2>,
        projection: &RenderProjection,
    ) -> Option<InteractionEvent> {
        let hit = pointer
            .and_then(|pointer| projection.hit_test(pointer))
            .map(|node| node.id.clone());
        if hit == self.hovered {
            return None;
        }

        self.hovered = hit.clone();
        Some(InteractionEvent::Hovered(hit))
    }

    pub(super) fn select(&mut self, id: Option<String>) -> Option<InteractionEvent> {
        if id == self.selected {
            return None;
        }

        self.selected = id.clone();
        Some(InteractionEvent::Selected(id))
    }

    /// Forgets per-dataset state when a new analysis replaces the nodes.
    pub(super) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;
    use crate::app::physics::fixtures::{record, store_from};
    use crate::app::projection::FilterSet;
    use crate::resources::ResourceKind;

    fn projection() -> RenderProjection {
        let mut store = store_from(
            vec![
                record("root", ResourceKind::Html, 0, None),
                record("leaf", ResourceKind::Js, 0, Some("root")),
            ],
            31,
        );
        store.place(1, vec2(600.0, 300.0));
        RenderProjection::build(&store, &FilterSet::all(), &ViewportTransform::default())
    }

    #[test]
    fn drag_tracks_pointer_exactly() {
        let mut controller = InteractionController::default();
        let mut viewport = ViewportTransform::default();
        viewport.set_pan(vec2(15.0, 5.0));

        controller.pointer_down(pos2(100.0, 100.0), ViewMode::Graph, &viewport);
        controller.pointer_move(pos2(160.0, 70.0), &mut viewport);
        assert_eq!(viewport.pan(), vec2(75.0, -25.0));
        controller.pointer_move(pos2(90.0, 110.0), &mut viewport);
        assert_eq!(viewport.pan(), vec2(5.0, 15.0));

        let event = controller.pointer_up(pos2(90.0, 110.0), &projection());
        assert_eq!(event, None);
        assert!(!controller.is_dragging());

        controller.pointer_move(pos2(500.0, 500.0), &mut viewport);
        assert_eq!(viewport.pan(), vec2(5.0, 15.0));
    }

    #[test]
    fn list_mode_never_drags() {
        let mut controller = InteractionController::default();
        let mut viewport = ViewportTransform::default();
        controller.pointer_down(pos2(10.0, 10.0), ViewMode::List, &viewport);
        controller.pointer_move(pos2(90.0, 90.0), &mut viewport);
        assert!(!controller.is_dragging());
        assert_eq!(viewport.pan(), Vec2::ZERO);
    }

    #[test]
    fn short_press_release_is_a_click() {
        let projection = projection();
        let mut controller = InteractionController::default();
        let mut viewport = ViewportTransform::default();

        controller.pointer_down(pos2(601.0, 300.0), ViewMode::Graph, &viewport);
        controller.pointer_move(pos2(602.0, 301.0), &mut viewport);
        let event = controller.pointer_up(pos2(602.0, 301.0), &projection);
        assert_eq!(event, Some(InteractionEvent::Selected(Some("leaf".to_owned()))));
        assert_eq!(controller.selected(), Some("leaf"));

        controller.pointer_down(pos2(602.0, 301.0), ViewMode::Graph, &viewport);
        assert_eq!(controller.pointer_up(pos2(602.0, 301.0), &projection), None);

        controller.pointer_down(pos2(20.0, 20.0), ViewMode::Graph, &viewport);
        let cleared = controller.pointer_up(pos2(20.0, 20.0), &projection);
        assert_eq!(cleared, Some(InteractionEvent::Selected(None)));
    }

    #[test]
    fn hover_events_only_fire_on_change() {
        let projection = projection();
        let mut controller = InteractionController::default();

        assert_eq!(
            controller.hover(Some(pos2(400.0, 300.0)), &projection),
            Some(InteractionEvent::Hovered(Some("root".to_owned())))
        );
        assert_eq!(controller.hover(Some(pos2(401.0, 301.0)), &projection), None);
        assert_eq!(
            controller.hover(None, &projection),
            Some(InteractionEvent::Hovered(None))
        );
        assert_eq!(controller.hovered(), None);
    }

    #[test]
    fn wheel_changes_scale_only() {
        let mut controller = InteractionController::default();
        let mut viewport = ViewportTransform::default();
        controller.wheel(-250.0, &mut viewport);
        assert!((viewport.scale() - 1.25).abs() < 1e-6);
        assert_eq!(viewport.pan(), Vec2::ZERO);
    }
}

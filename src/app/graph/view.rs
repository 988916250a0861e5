use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};

use crate::util::format_bytes;

use super::super::physics::quadtree_cells;
use super::super::projection::RenderProjection;
use super::super::render_utils::{
    ViewBox, circle_visible, dim_color, draw_background, kind_border, kind_fill,
};
use super::super::ViewModel;

const LINK_COLOR: Color32 = Color32::from_rgba_premultiplied(44, 49, 55, 77);
const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);

impl ViewModel {
    fn project(&self) -> Option<RenderProjection> {
        self.driver
            .store()
            .map(|store| RenderProjection::build(store, &self.filters, &self.viewport))
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let view_box = ViewBox::fit(rect);

        let Some(mut projection) = self.project() else {
            self.visible_node_count = 0;
            self.visible_link_count = 0;
            ui.label("No resources loaded.");
            return;
        };

        if self.handle_graph_input(ui, &response, view_box, &projection)
            && let Some(reprojected) = self.project()
        {
            projection = reprojected;
        }

        let scale = self.viewport.scale();
        draw_background(&painter, rect, view_box, self.viewport.pan(), scale);

        let Some(store) = self.driver.store() else {
            return;
        };
        if store.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No resources to display.",
                FontId::proportional(15.0),
                Color32::from_gray(200),
            );
            return;
        }

        if self.show_quadtree_overlay {
            quadtree_cells(store, &mut self.quadtree_cells);
            for cell in &self.quadtree_cells {
                let half = vec2(cell.half_extent, cell.half_extent);
                let min = view_box.to_pixels(self.viewport.to_screen(cell.center - half));
                let max = view_box.to_pixels(self.viewport.to_screen(cell.center + half));

                let alpha = if cell.is_leaf { 110 } else { 55 };
                let line_width: f32 =
                    (1.4_f32 - (cell.depth as f32 * 0.09_f32)).clamp(0.45_f32, 1.4_f32);
                painter.rect_stroke(
                    egui::Rect::from_min_max(min, max),
                    0.0,
                    Stroke::new(
                        line_width,
                        Color32::from_rgba_unmultiplied(106, 198, 255, alpha),
                    ),
                    egui::StrokeKind::Middle,
                );
            }
        }

        let matches = self
            .search_cache
            .matches(store, self.dataset_revision, &self.search);
        let search_active = !matches.is_empty();
        let selected = self.controller.selected();
        let hovered = self.controller.hovered();

        let selected_index = selected.and_then(|id| store.index_of_id(id));
        let link_width = view_box.length_to_pixels(scale).clamp(0.5, 2.5);
        for link in &projection.links {
            let stroke = if selected_index.is_some_and(|index| link.touches(index)) {
                Stroke::new(link_width * 1.8, SELECTED_COLOR)
            } else {
                Stroke::new(link_width, LINK_COLOR)
            };
            painter.line_segment(
                [view_box.to_pixels(link.from), view_box.to_pixels(link.to)],
                stroke,
            );
        }

        for node in &projection.nodes {
            let position = view_box.to_pixels(node.position);
            let radius = view_box.length_to_pixels(node.screen_radius);
            if !circle_visible(rect, position, radius) {
                continue;
            }

            let is_selected = selected == Some(node.id.as_str());
            let is_hovered = hovered == Some(node.id.as_str());
            let is_match = matches.contains(&node.index);

            let fill = if search_active && !is_match && !is_selected {
                dim_color(kind_fill(node.kind), 0.4)
            } else {
                kind_fill(node.kind)
            };
            painter.circle_filled(position, radius, fill);

            let border = if is_selected {
                Stroke::new(3.0, SELECTED_COLOR)
            } else if is_hovered {
                Stroke::new(2.0, Color32::WHITE)
            } else {
                Stroke::new(1.5, kind_border(node.kind))
            };
            painter.circle_stroke(position, radius, border);

            if is_match {
                painter.circle_stroke(position, radius + 4.0, Stroke::new(1.6, MATCH_COLOR));
            }

            if node.show_label {
                painter.text(
                    position,
                    Align2::CENTER_CENTER,
                    node.kind.tag(),
                    FontId::proportional((radius * 0.5).clamp(8.0, 14.0)),
                    Color32::WHITE,
                );
            }
        }

        self.visible_node_count = projection.nodes.len();
        self.visible_link_count = projection.links.len();

        if let Some(node) = hovered
            .and_then(|id| store.index_of_id(id))
            .and_then(|index| store.node(index))
        {
            let readout = format!(
                "{}  |  {}  |  {}",
                node.name,
                node.kind.label(),
                format_bytes(node.byte_size)
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                readout,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if let Some(pointer) = response.hover_pos() {
            let world = self.viewport.to_world(view_box.to_view(pointer));
            painter.text(
                rect.left_bottom() + vec2(10.0, -10.0),
                Align2::LEFT_BOTTOM,
                format!("{:.0}, {:.0}", world.x, world.y),
                FontId::monospace(11.0),
                Color32::from_gray(150),
            );
        }

        if response.dragged() {
            ui.ctx().request_repaint();
        }
    }
}

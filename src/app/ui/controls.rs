use eframe::egui::{self, Align, Layout, RichText, Ui};

use crate::util::format_bytes;

use super::super::interaction::ViewMode;
use super::super::physics::{SimulationParams, StepTiming};
use super::super::render_utils::kind_fill;
use super::super::viewport::{MAX_SCALE, MIN_SCALE};
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        egui::ScrollArea::vertical()
            .id_salt("controls_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.draw_summary(ui);
                ui.separator();
                self.draw_category_filters(ui);
                ui.separator();
                self.draw_view_controls(ui);
                ui.separator();
                self.draw_search(ui);
                ui.separator();
                self.draw_physics_controls(ui);
            });
    }

    fn draw_summary(&self, ui: &mut Ui) {
        ui.label(RichText::new("Summary").strong());
        ui.label(format!("Requests: {}", self.dataset.len()));
        ui.label(format!(
            "Resource size: {}",
            format_bytes(self.dataset.total_size())
        ));
        ui.label(format!(
            "Transferred: {}",
            format_bytes(self.dataset.total_transfer_size())
        ));
    }

    fn draw_category_filters(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Categories").strong());
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let label = if self.filters.is_all() {
                    "Hide all"
                } else {
                    "Show all"
                };
                if ui
                    .button(label)
                    .on_hover_text("Toggle every category at once.")
                    .clicked()
                {
                    self.filters.toggle_all();
                }
            });
        });

        if self.category_stats.is_empty() {
            ui.label("No resources.");
            return;
        }

        for stat in &self.category_stats {
            let active = self.filters.contains(stat.kind);
            let text = format!(
                "{}  {}  ·  {}  ·  {:.1}%",
                stat.kind.label(),
                stat.count,
                format_bytes(stat.size),
                stat.percentage
            );

            let clicked = ui
                .horizontal(|ui| {
                    let (swatch, _) =
                        ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                    ui.painter().circle_filled(swatch.center(), 5.0, kind_fill(stat.kind));
                    ui.selectable_label(active, text)
                        .on_hover_text("Show or hide this category in the graph and list.")
                        .clicked()
                })
                .inner;

            if clicked {
                self.filters.toggle(stat.kind);
            }
        }
    }

    fn draw_view_controls(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("View").strong());
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.view_mode, ViewMode::Graph, "Graph")
                .on_hover_text("Force-directed map of requests and their initiators.");
            ui.selectable_value(&mut self.view_mode, ViewMode::List, "List")
                .on_hover_text("Table of requests sorted by size.");
        });

        ui.add_enabled_ui(self.view_mode == ViewMode::Graph, |ui| {
            ui.horizontal(|ui| {
                if ui.button("−").on_hover_text("Zoom out").clicked() {
                    self.viewport.zoom_out();
                }
                if ui.button("+").on_hover_text("Zoom in").clicked() {
                    self.viewport.zoom_in();
                }
                if ui.button("Fit").on_hover_text("Reset pan and zoom").clicked() {
                    self.viewport.fit();
                }
                ui.label(format!(
                    "{:.0}%  ({:.0}–{:.0}%)",
                    self.viewport.scale() * 100.0,
                    MIN_SCALE * 100.0,
                    MAX_SCALE * 100.0
                ));
            });
        });
    }

    fn draw_search(&mut self, ui: &mut Ui) {
        ui.label("Search (file name or url)")
            .on_hover_text("Fuzzy-highlight matching resources without filtering them.");
        ui.text_edit_singleline(&mut self.search);

        if !self.search.trim().is_empty()
            && let Some(store) = self.driver.store()
        {
            let count = self
                .search_cache
                .matches(store, self.dataset_revision, &self.search)
                .len();
            ui.small(format!("{count} matching resources"));
        }
    }

    fn draw_physics_controls(&mut self, ui: &mut Ui) {
        ui.checkbox(&mut self.live_physics, "Live physics simulation")
            .on_hover_text("Continuously relax the layout while the window is open.");

        ui.checkbox(&mut self.show_fps_bar, "FPS Display")
            .on_hover_text("Show FPS and simulation step rate in the header.");

        ui.checkbox(&mut self.show_quadtree_overlay, "Show quadtree overlay")
            .on_hover_text("Draw the spatial index partitions over the graph canvas.");

        let mut timing = self.driver.timing();
        egui::ComboBox::from_label("Step timing")
            .selected_text(timing.label())
            .show_ui(ui, |ui| {
                ui.selectable_value(
                    &mut timing,
                    StepTiming::PerFrame,
                    StepTiming::PerFrame.label(),
                );
                ui.selectable_value(&mut timing, StepTiming::Elapsed, StepTiming::Elapsed.label());
            });
        if timing != self.driver.timing() {
            self.driver.set_timing(timing);
        }

        ui.collapsing("Physics tuning", |ui| {
            let params = self.driver.params_mut();
            ui.add(
                egui::Slider::new(&mut params.attraction_strength, 0.0..=0.2)
                    .text("Attraction")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Pull applied toward the initiator while beyond the ideal distance.");
            ui.add(
                egui::Slider::new(&mut params.ideal_distance_base, 20.0..=200.0)
                    .text("Ideal distance")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Base link length; each node adds its own radius.");
            ui.add(
                egui::Slider::new(&mut params.collision_padding, 0.0..=40.0)
                    .text("Padding")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Gap kept between neighbouring circles.");
            ui.add(
                egui::Slider::new(&mut params.repulsion_gain, 0.0..=3.0)
                    .text("Repulsion")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("How hard overlapping nodes are pushed apart.");
            ui.add(
                egui::Slider::new(&mut params.damping, 0.5..=0.99)
                    .text("Damping")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Fraction of velocity kept each step.");

            if ui.button("Reset tuning").clicked() {
                *params = SimulationParams::default();
            }
        });

        ui.horizontal(|ui| {
            if ui
                .button("Restart layout")
                .on_hover_text("Re-seed every node around the center and simulate again.")
                .clicked()
            {
                self.restart_layout();
            }
            if let Some(store) = self.driver.store() {
                ui.small(format!(
                    "steps {}  ·  energy {:.3}",
                    self.driver.steps(),
                    store.kinetic_energy()
                ));
            }
        });
    }
}

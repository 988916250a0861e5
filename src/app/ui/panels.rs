use std::collections::VecDeque;

use eframe::egui::{self, Align, Context, Layout};

use crate::resources::Dataset;
use crate::util::format_bytes;

use super::super::interaction::{InteractionController, ViewMode};
use super::super::physics::{SimulationDriver, SimulationParams, StepTiming};
use super::super::projection::FilterSet;
use super::super::search::SearchCache;
use super::super::viewport::ViewportTransform;
use super::super::{LaunchOptions, LoadRequest, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(
        dataset: Dataset,
        options: LaunchOptions,
        page_url: Option<&str>,
    ) -> Self {
        let timing = if options.elapsed_timing {
            StepTiming::Elapsed
        } else {
            StepTiming::PerFrame
        };
        let mut driver = SimulationDriver::new(SimulationParams::default(), timing, options.seed);
        let loop_token = Some(driver.load(&dataset));

        Self {
            category_stats: dataset.category_stats(),
            dataset,
            driver,
            loop_token,
            dataset_revision: 0,
            viewport: ViewportTransform::default(),
            controller: InteractionController::default(),
            filters: FilterSet::all(),
            view_mode: ViewMode::Graph,
            search: String::new(),
            url_input: page_url.unwrap_or_default().to_owned(),
            search_cache: SearchCache::default(),
            live_physics: true,
            show_quadtree_overlay: false,
            quadtree_cells: Vec::new(),
            show_fps_bar: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
            step_samples: VecDeque::new(),
            visible_node_count: 0,
            visible_link_count: 0,
        }
    }

    /// Swaps in a freshly collected dataset. The old simulation loop is
    /// retired before the new node store is built.
    pub(in crate::app) fn replace_dataset(&mut self, dataset: Dataset) {
        self.loop_token = Some(self.driver.load(&dataset));
        self.category_stats = dataset.category_stats();
        self.dataset = dataset;
        self.dataset_revision += 1;
        self.controller.reset();
        self.viewport.fit();
        self.quadtree_cells.clear();
        self.step_samples.clear();
    }

    pub(in crate::app) fn restart_layout(&mut self) {
        self.loop_token = Some(self.driver.load(&self.dataset));
        self.dataset_revision += 1;
        self.step_samples.clear();
    }

    fn advance_simulation(&mut self, ctx: &Context) {
        if !self.live_physics {
            return;
        }
        let Some(token) = self.loop_token else {
            return;
        };

        let elapsed = ctx.input(|input| input.stable_dt);
        if self.driver.tick(token, elapsed) {
            ctx.request_repaint();
        } else {
            self.loop_token = None;
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        load_request: &mut Option<LoadRequest>,
        is_loading: bool,
    ) {
        self.update_fps_counter(ctx);
        self.advance_simulation(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("wpo-analisa");
                    ui.separator();
                    ui.label(format!("source: {}", self.dataset.source_label));
                    ui.label(format!("resources: {}", self.dataset.len()));
                    ui.label(format!("total: {}", format_bytes(self.dataset.total_size())));
                    let url_field = ui.add(
                        egui::TextEdit::singleline(&mut self.url_input)
                            .hint_text("https://example.com")
                            .desired_width(260.0),
                    );
                    let submitted = url_field.lost_focus()
                        && ui.input(|input| input.key_pressed(egui::Key::Enter));
                    let can_analyze = !is_loading && !self.url_input.trim().is_empty();
                    let analyze_button =
                        ui.add_enabled(can_analyze, egui::Button::new("Analyze URL"));
                    if analyze_button.clicked() || (submitted && can_analyze) {
                        *load_request = Some(LoadRequest::AnalyzeUrl(self.url_input.clone()));
                    }

                    let reload_button = ui
                        .add_enabled(!is_loading, egui::Button::new("Reload"))
                        .on_hover_text("Re-run the current source.");
                    if reload_button.clicked() {
                        *load_request = Some(LoadRequest::Reload);
                    }
                    if is_loading {
                        ui.spinner();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.visible_graph_text());
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        if self.controller.selected().is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(340.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.view_mode {
            ViewMode::Graph => self.draw_graph(ui),
            ViewMode::List => self.draw_resource_list(ui),
        });
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if let Some(event) = self.controller.select(selected) {
            self.apply_interaction_event(event);
        }
    }
}

impl Drop for ViewModel {
    fn drop(&mut self) {
        self.driver.stop();
    }
}

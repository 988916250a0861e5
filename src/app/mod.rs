use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::resources::{CategoryStats, DataSource, Dataset, collect_dataset};

mod graph;
mod interaction;
mod physics;
mod projection;
mod render_utils;
mod search;
mod ui;
mod viewport;

use interaction::{InteractionController, ViewMode};
use physics::{LoopToken, QuadtreeCell, SimulationDriver};
use projection::FilterSet;
use search::SearchCache;
use viewport::ViewportTransform;

/// Simulation knobs chosen on the command line.
#[derive(Clone, Copy, Debug, Default)]
pub struct LaunchOptions {
    pub elapsed_timing: bool,
    pub seed: Option<u64>,
}

pub struct AnalyzerApp {
    source: DataSource,
    options: LaunchOptions,
    state: AppState,
    reload_rx: Option<Receiver<Result<Dataset, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Dataset, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

/// What the header asked for this frame.
enum LoadRequest {
    Reload,
    AnalyzeUrl(String),
}

impl AppState {
    fn worker_disconnected() -> Self {
        Self::Error("Background load worker disconnected".to_owned())
    }
}

struct ViewModel {
    dataset: Dataset,
    category_stats: Vec<CategoryStats>,
    driver: SimulationDriver,
    loop_token: Option<LoopToken>,
    dataset_revision: u64,
    viewport: ViewportTransform,
    controller: InteractionController,
    filters: FilterSet,
    view_mode: ViewMode,
    search: String,
    url_input: String,
    search_cache: SearchCache,
    live_physics: bool,
    show_quadtree_overlay: bool,
    quadtree_cells: Vec<QuadtreeCell>,
    show_fps_bar: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
    step_samples: VecDeque<(f64, u64)>,
    visible_node_count: usize,
    visible_link_count: usize,
}

impl AnalyzerApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: DataSource,
        options: LaunchOptions,
    ) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            options,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: DataSource) -> Receiver<Result<Dataset, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = collect_dataset(&source).map_err(|error| format!("{error:#}"));
            if let Err(error) = &result {
                tracing::error!(%error, "failed to collect resources");
            }
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: DataSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }
}

impl eframe::App for AnalyzerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(dataset)) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            dataset,
                            self.options,
                            self.source.page_url(),
                        ))));
                    }
                    Ok(Err(error)) => transition = Some(AppState::Error(error)),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::worker_disconnected());
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading(format!("Analyzing {}...", self.source.describe()));
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to analyze resources");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.source.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut load_request = None;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut load_request, is_reloading);

                if self.reload_rx.is_none() {
                    match load_request {
                        Some(LoadRequest::Reload) => {
                            self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                        }
                        Some(LoadRequest::AnalyzeUrl(input)) => {
                            if let Some(source) =
                                DataSource::for_page_url(&input, self.options.seed)
                            {
                                tracing::info!(
                                    source = %source.describe(),
                                    "starting new analysis"
                                );
                                self.source = source;
                                self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                            }
                        }
                        None => {}
                    }
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(dataset)) => model.replace_dataset(dataset),
                        Ok(Err(error)) => transition = Some(AppState::Error(error)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::worker_disconnected());
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

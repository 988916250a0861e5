mod app;
mod resources;
mod util;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use resources::DataSource;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON array of resource records to visualize.
    #[arg(long, conflicts_with = "report")]
    dataset: Option<PathBuf>,

    /// Saved PageSpeed Insights response or Lighthouse report.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Page url for the simulated resource set used when no file is given.
    #[arg(long, default_value = "https://example-shop.test")]
    url: String,

    /// Seed for layout jitter and simulated data.
    #[arg(long)]
    seed: Option<u64>,

    /// Scale each simulation step by measured frame time instead of one step per frame.
    #[arg(long)]
    elapsed_timing: bool,
}

impl Args {
    fn data_source(&self) -> DataSource {
        match (&self.dataset, &self.report) {
            (Some(path), _) => DataSource::DatasetFile(path.clone()),
            (None, Some(path)) => DataSource::ReportFile(path.clone()),
            (None, None) => DataSource::Mock {
                url: self.url.clone(),
                seed: self.seed,
            },
        }
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let source = args.data_source();
    let launch = app::LaunchOptions {
        elapsed_timing: args.elapsed_timing,
        seed: args.seed,
    };
    tracing::info!(source = %source.describe(), "starting analyzer");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "wpo-analisa",
        options,
        Box::new(move |cc| Ok(Box::new(app::AnalyzerApp::new(cc, source, launch)))),
    )
}

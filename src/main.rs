//! Data Visualizer - merge CSV files and plot any two columns
//!
//! Lists the CSV files found in the `data` directory next to the executable,
//! combines the selected ones and renders a chart from two of their columns.

mod charts;
mod config;
mod data;
mod gui;
mod session;
mod stats;

use config::AppConfig;
use eframe::egui;
use gui::DataVisualizerApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = AppConfig::default();
    log::info!("Data directory: {}", config.data_dir().display());

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("📊 Data Visualizer"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Data Visualizer",
        options,
        Box::new(|cc| Ok(Box::new(DataVisualizerApp::new(cc, config)))),
    )
}

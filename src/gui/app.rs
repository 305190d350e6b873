//! Data Visualizer Main Application
//! Main window with control panel and chart viewer.

use crate::config::AppConfig;
use crate::data::{DataLoader, FileCatalog, FileRef};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::session::{ChartState, Session};
use egui::SidePanel;

/// Main application window.
pub struct DataVisualizerApp {
    config: AppConfig,
    files: Vec<FileRef>,
    loader: DataLoader,
    session: Session,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DataVisualizerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let files = FileCatalog::list(&config.data_dir(), &config.extension);
        Self {
            files,
            loader: DataLoader::new(config.encoding),
            session: Session::new(),
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(config.preview_rows),
            config,
        }
    }

    /// Handle file tick/untick - rebuild the combined table
    fn handle_toggle_file(&mut self, index: usize) {
        let Some(file) = self.files.get(index) else {
            return;
        };

        self.session.toggle_file(file, &self.loader);
        self.chart_viewer.clear();

        let status = match &self.session.table {
            Some(df) => format!("Loaded {} rows, {} columns", df.height(), df.width()),
            None => "Ready".to_string(),
        };
        self.control_panel.set_status(&status);
    }

    /// Handle "Generate Plot"
    fn handle_generate(&mut self, ctx: &egui::Context) {
        self.session.generate(&self.config.chart);

        match &self.session.chart {
            ChartState::Displayed(chart) => {
                self.chart_viewer.set_chart(ctx, chart);
                self.control_panel.set_status(&chart.title);
            }
            ChartState::Failed(error) => {
                self.chart_viewer.clear();
                self.control_panel.set_status(&format!("Error: {}", error));
            }
            ChartState::Empty => {}
        }
    }
}

impl eframe::App for DataVisualizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, &self.files, &mut self.session);

                    match action {
                        ControlPanelAction::ToggleFile(index) => self.handle_toggle_file(index),
                        ControlPanelAction::Generate => self.handle_generate(ctx),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, &self.session);
        });
    }
}

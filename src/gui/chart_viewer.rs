//! Chart Viewer Widget
//! Central panel showing a preview of the combined table and the rendered chart.

use crate::charts::RenderedChart;
use crate::data::{column_names, format_cell};
use crate::session::{ChartState, Session};
use egui::{Color32, RichText, ScrollArea, TextureHandle, TextureOptions};
use polars::prelude::DataFrame;

/// Scrollable display area for the table preview and chart image.
pub struct ChartViewer {
    preview_rows: usize,
    texture: Option<TextureHandle>,
}

impl ChartViewer {
    pub fn new(preview_rows: usize) -> Self {
        Self {
            preview_rows,
            texture: None,
        }
    }

    /// Drop the uploaded chart image
    pub fn clear(&mut self) {
        self.texture = None;
    }

    /// Upload a freshly rendered chart as a texture
    pub fn set_chart(&mut self, ctx: &egui::Context, chart: &RenderedChart) {
        let image = egui::ColorImage::from_rgb(
            [chart.width as usize, chart.height as usize],
            &chart.pixels,
        );
        self.texture = Some(ctx.load_texture("chart", image, TextureOptions::LINEAR));
    }

    pub fn show(&mut self, ui: &mut egui::Ui, session: &Session) {
        let Some(table) = &session.table else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new("Combined Data:").size(14.0).strong());
                ui.add_space(5.0);
                self.draw_preview(ui, table);

                ui.add_space(15.0);

                match &session.chart {
                    ChartState::Empty => {}
                    ChartState::Displayed(_) => {
                        if let Some(texture) = &self.texture {
                            ui.image((texture.id(), texture.size_vec2()));
                        }
                    }
                    ChartState::Failed(error) => {
                        ui.label(
                            RichText::new(format!("Plot failed: {}", error))
                                .size(13.0)
                                .color(Color32::from_rgb(220, 53, 69)),
                        );
                    }
                }
            });
    }

    /// Draw the first rows of the table as a striped grid
    fn draw_preview(&self, ui: &mut egui::Ui, table: &DataFrame) {
        let head = table.head(Some(self.preview_rows));
        let columns = column_names(&head);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::horizontal().show(ui, |ui| {
                    egui::Grid::new("combined_preview")
                        .striped(true)
                        .min_col_width(55.0)
                        .spacing([12.0, 4.0])
                        .show(ui, |ui| {
                            ui.label(RichText::new("").size(11.0));
                            for name in &columns {
                                ui.label(RichText::new(name).strong().size(11.0));
                            }
                            ui.end_row();

                            for row in 0..head.height() {
                                ui.label(RichText::new(row.to_string()).size(11.0).color(Color32::GRAY));
                                for column in head.get_columns() {
                                    let text = column
                                        .get(row)
                                        .map(|v| format_cell(&v))
                                        .unwrap_or_default();
                                    ui.label(RichText::new(text).size(11.0));
                                }
                                ui.end_row();
                            }
                        });
                });
            });
    }
}

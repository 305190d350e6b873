//! Control Panel Widget
//! Left side panel with file selection, axis and chart settings.

use crate::charts::{AxisChoice, ChartKind};
use crate::data::FileRef;
use crate::session::Session;
use egui::{Color32, ComboBox, RichText, ScrollArea};

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// Left side control panel.
pub struct ControlPanel {
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        files: &[FileRef],
        session: &mut Session,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Data Visualizer")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== File Section =====
        ui.label(RichText::new("📁 Select files").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                if files.is_empty() {
                    ui.label(RichText::new("No files found").size(12.0).color(Color32::GRAY));
                    return;
                }
                ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
                    for (i, file) in files.iter().enumerate() {
                        let mut checked = session.is_selected(file);
                        if ui.checkbox(&mut checked, file.name.as_str()).changed() {
                            action = ControlPanelAction::ToggleFile(i);
                        }
                    }
                });
            });

        for error in &session.load_errors {
            ui.add_space(4.0);
            ui.label(RichText::new(error.message()).size(12.0).color(ERROR_COLOR));
        }

        // Axis and plot controls only exist for a non-empty table
        if session.table.is_none() {
            return action;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Plot Settings Section =====
        ui.label(RichText::new("🔧 Plot Settings").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 110.0;
        let combo_width = 150.0;
        let options = session.axis_options();

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Select the X-axis"));
            Self::axis_combo(ui, "x_axis", combo_width, &options, &mut session.x_axis);
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Select the Y-axis"));
            Self::axis_combo(ui, "y_axis", combo_width, &options, &mut session.y_axis);
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Type of plot"));
            ComboBox::from_id_salt("plot_type")
                .width(combo_width)
                .selected_text(session.kind.display_name())
                .show_ui(ui, |ui| {
                    for kind in ChartKind::ALL {
                        ui.selectable_value(&mut session.kind, kind, kind.display_name());
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Button =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("▶ Generate Plot").size(16.0))
                .min_size(egui::vec2(200.0, 35.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::Generate;
            }
        });

        ui.add_space(10.0);

        let status_color = if self.status.starts_with("Error") {
            ERROR_COLOR
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    fn axis_combo(
        ui: &mut egui::Ui,
        id: &str,
        width: f32,
        options: &[AxisChoice],
        selected: &mut Option<AxisChoice>,
    ) {
        let text = selected.as_ref().map(AxisChoice::label).unwrap_or("");
        ComboBox::from_id_salt(id)
            .width(width)
            .selected_text(text.to_string())
            .show_ui(ui, |ui| {
                for option in options {
                    let is_selected = selected.as_ref() == Some(option);
                    if ui.selectable_label(is_selected, option.label()).clicked() {
                        *selected = Some(option.clone());
                    }
                }
            });
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    ToggleFile(usize),
    Generate,
}

//! Session State
//! Everything one user has selected, plus the data derived from it.

use crate::charts::{AxisChoice, ChartKind, ChartPlan, RenderError, RenderedChart, StaticChartRenderer};
use crate::config::ChartStyle;
use crate::data::{column_names, DataLoader, FileRef, LoadError};
use polars::prelude::DataFrame;

/// What the chart area currently shows.
#[derive(Debug, Default)]
pub enum ChartState {
    #[default]
    Empty,
    Displayed(RenderedChart),
    Failed(String),
}

/// Session-scoped selections and the combined table built from them.
#[derive(Debug, Default)]
pub struct Session {
    /// Selected files in the order they were picked.
    pub selected: Vec<FileRef>,
    pub table: Option<DataFrame>,
    pub columns: Vec<String>,
    pub load_errors: Vec<LoadError>,
    pub x_axis: Option<AxisChoice>,
    pub y_axis: Option<AxisChoice>,
    pub kind: ChartKind,
    pub chart: ChartState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, file: &FileRef) -> bool {
        self.selected.iter().any(|f| f == file)
    }

    /// Add or remove a file and rebuild the combined table.
    pub fn toggle_file(&mut self, file: &FileRef, loader: &DataLoader) {
        if let Some(pos) = self.selected.iter().position(|f| f == file) {
            self.selected.remove(pos);
        } else {
            self.selected.push(file.clone());
        }
        self.reload(loader);
    }

    /// Replace the combined table with a fresh merge of the selection.
    pub fn reload(&mut self, loader: &DataLoader) {
        let outcome = loader.merge(&self.selected);
        self.load_errors = outcome.errors;
        self.table = outcome.table;
        self.chart = ChartState::Empty;

        let columns = self.table.as_ref().map(column_names).unwrap_or_default();
        if columns != self.columns {
            self.columns = columns;
            self.revalidate_axes();
        }
    }

    /// Axis options: every column followed by the "None" sentinel.
    pub fn axis_options(&self) -> Vec<AxisChoice> {
        self.columns
            .iter()
            .cloned()
            .map(AxisChoice::Column)
            .chain(std::iter::once(AxisChoice::None))
            .collect()
    }

    /// Reset axis choices that no longer name a column of the table.
    fn revalidate_axes(&mut self) {
        let default = self.columns.first().cloned().map(AxisChoice::Column);
        for axis in [&mut self.x_axis, &mut self.y_axis] {
            let still_valid = match axis {
                Some(AxisChoice::Column(name)) => self.columns.contains(name),
                Some(AxisChoice::None) => !self.columns.is_empty(),
                None => false,
            };
            if !still_valid {
                *axis = default.clone();
            }
        }
    }

    /// Build the plan for the current selection without drawing it.
    pub fn plan(&self) -> Option<Result<ChartPlan, RenderError>> {
        let table = self.table.as_ref()?;
        let x = self.x_axis.as_ref()?;
        let y = self.y_axis.as_ref()?;
        Some(self.kind.plan(table, x, y))
    }

    /// Render the current selection into the chart state.
    pub fn generate(&mut self, style: &ChartStyle) {
        let Some(result) = self.plan() else {
            return;
        };

        self.chart = match result.and_then(|plan| StaticChartRenderer::render(&plan, style)) {
            Ok(chart) => {
                log::info!("Rendered \"{}\"", chart.title);
                ChartState::Displayed(chart)
            }
            Err(e) => {
                log::error!("Plot failed: {}", e);
                ChartState::Failed(e.to_string())
            }
        };
    }
}

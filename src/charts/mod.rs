//! Charts module - Chart planning and rendering

mod kind;
mod renderer;

pub use kind::{AxisChoice, ChartGeometry, ChartKind, ChartPlan, RenderError};
pub use renderer::{RenderedChart, StaticChartRenderer};

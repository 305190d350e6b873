//! Stats module - Distribution and interval estimates for charts

mod density;
mod interval;

pub use density::{DensityEstimator, HistogramBin};
pub use interval::MeanEstimate;

//! Chart Kinds Module
//! Maps each chart kind to a plotting strategy that turns table columns
//! into drawable geometry and axis labels.

use crate::stats::{DensityEstimator, HistogramBin, MeanEstimate};
use polars::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),
    #[error("Column '{0}' has no values to plot")]
    NoData(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Drawing failed: {0}")]
    Drawing(String),
}

/// An axis selection: a column of the combined table or the "None" option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisChoice {
    Column(String),
    None,
}

impl AxisChoice {
    pub fn label(&self) -> &str {
        match self {
            AxisChoice::Column(name) => name,
            AxisChoice::None => "None",
        }
    }
}

/// The five supported chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Scatter,
    Distribution,
    Count,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Scatter,
        ChartKind::Distribution,
        ChartKind::Count,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::Line => "Line Plot",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Distribution => "Distribution Plot",
            ChartKind::Count => "Count Plot",
        }
    }

    fn strategy(self) -> &'static dyn PlotStrategy {
        match self {
            ChartKind::Line => &LinePlot,
            ChartKind::Bar => &BarChart,
            ChartKind::Scatter => &ScatterPlot,
            ChartKind::Distribution => &DistributionPlot,
            ChartKind::Count => &CountPlot,
        }
    }

    /// Build the chart plan for the given axes.
    pub fn plan(
        self,
        df: &DataFrame,
        x: &AxisChoice,
        y: &AxisChoice,
    ) -> Result<ChartPlan, RenderError> {
        let strategy = self.strategy();
        let geometry = strategy.geometry(df, x.label(), y.label())?;
        let y_label = strategy
            .y_label_override()
            .unwrap_or(y.label())
            .to_string();

        Ok(ChartPlan {
            title: format!("{} of {} vs {}", self.display_name(), y_label, x.label()),
            x_label: x.label().to_string(),
            y_label,
            geometry,
        })
    }
}

/// Everything the renderer needs to draw one chart.
#[derive(Debug, Clone)]
pub struct ChartPlan {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub geometry: ChartGeometry,
}

/// Drawable shapes in data coordinates. Categorical x axes place category
/// `i` at `x = i`.
#[derive(Debug, Clone)]
pub enum ChartGeometry {
    Line {
        points: Vec<(f64, f64)>,
        /// Confidence band as `(x, low, high)` for every x with two or more samples.
        band: Vec<(f64, f64, f64)>,
        categories: Option<Vec<String>>,
    },
    Scatter {
        points: Vec<(f64, f64)>,
        categories: Option<Vec<String>>,
    },
    Bars {
        categories: Vec<String>,
        heights: Vec<f64>,
        /// Error bar per bar as `(low, high)`; empty for counts.
        errors: Vec<Option<(f64, f64)>>,
    },
    Histogram {
        bins: Vec<HistogramBin>,
        /// Density curve scaled to histogram counts.
        density: Vec<(f64, f64)>,
    },
}

impl ChartGeometry {
    /// Category labels of the x axis, if it is categorical.
    pub fn categories(&self) -> Option<&[String]> {
        match self {
            ChartGeometry::Line { categories, .. } | ChartGeometry::Scatter { categories, .. } => {
                categories.as_deref()
            }
            ChartGeometry::Bars { categories, .. } => Some(categories),
            ChartGeometry::Histogram { .. } => None,
        }
    }

    pub fn x_bounds(&self) -> (f64, f64) {
        if let Some(categories) = self.categories() {
            return (-0.5, categories.len().max(1) as f64 - 0.5);
        }
        let xs: Vec<f64> = match self {
            ChartGeometry::Line { points, .. } | ChartGeometry::Scatter { points, .. } => {
                points.iter().map(|p| p.0).collect()
            }
            ChartGeometry::Histogram { bins, .. } => bins
                .iter()
                .flat_map(|b| [b.start, b.end])
                .collect(),
            ChartGeometry::Bars { .. } => Vec::new(),
        };
        padded_bounds(&xs, 0.05, false)
    }

    pub fn y_bounds(&self) -> (f64, f64) {
        match self {
            ChartGeometry::Line { points, band, .. } => {
                let ys: Vec<f64> = points
                    .iter()
                    .map(|p| p.1)
                    .chain(band.iter().flat_map(|b| [b.1, b.2]))
                    .collect();
                padded_bounds(&ys, 0.05, false)
            }
            ChartGeometry::Scatter { points, .. } => {
                let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
                padded_bounds(&ys, 0.05, false)
            }
            ChartGeometry::Bars { heights, errors, .. } => {
                let ys: Vec<f64> = heights
                    .iter()
                    .copied()
                    .chain(errors.iter().flatten().flat_map(|e| [e.0, e.1]))
                    .collect();
                padded_bounds(&ys, 0.05, true)
            }
            ChartGeometry::Histogram { bins, density } => {
                let ys: Vec<f64> = bins
                    .iter()
                    .map(|b| b.count as f64)
                    .chain(density.iter().map(|p| p.1))
                    .collect();
                padded_bounds(&ys, 0.05, true)
            }
        }
    }
}

fn padded_bounds(values: &[f64], pad: f64, include_zero: bool) -> (f64, f64) {
    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if include_zero {
        min = min.min(0.0);
        max = max.max(0.0);
    }
    if min == max {
        return (min - 0.5, max + 0.5);
    }
    let margin = (max - min) * pad;
    let low = if include_zero && min == 0.0 { 0.0 } else { min - margin };
    let high = if include_zero && max == 0.0 { 0.0 } else { max + margin };
    (low, high)
}

/// A column's values in plotting form.
enum AxisValues {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Boolean
            | DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

fn axis_values(df: &DataFrame, name: &str) -> Result<AxisValues, RenderError> {
    let column = df
        .column(name)
        .map_err(|_| RenderError::ColumnNotFound(name.to_string()))?;

    if is_numeric(column.dtype()) {
        let as_f64 = column.cast(&DataType::Float64)?;
        return Ok(AxisValues::Numeric(
            as_f64.f64()?.into_iter().map(|v| v.filter(|v| v.is_finite())).collect(),
        ));
    }

    let as_str = column.cast(&DataType::String)?;
    Ok(AxisValues::Categorical(
        as_str
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect(),
    ))
}

fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, RenderError> {
    match axis_values(df, name)? {
        AxisValues::Numeric(values) => Ok(values),
        AxisValues::Categorical(_) => Err(RenderError::NotNumeric(name.to_string())),
    }
}

/// Distinct x values of a column, each with a label and an axis position.
struct Categories {
    labels: Vec<String>,
    /// The value itself for numeric columns, the category index otherwise.
    positions: Vec<f64>,
    /// Category of each row, `None` for null cells.
    indices: Vec<Option<usize>>,
}

/// Numeric columns use their sorted distinct values; text columns keep the
/// order of first appearance.
fn categorize(values: &AxisValues) -> Categories {
    match values {
        AxisValues::Numeric(nums) => {
            let mut distinct: Vec<f64> = nums.iter().flatten().copied().collect();
            distinct.sort_by(f64::total_cmp);
            distinct.dedup();
            let indices = nums
                .iter()
                .map(|v| v.and_then(|v| distinct.binary_search_by(|d| d.total_cmp(&v)).ok()))
                .collect();
            Categories {
                labels: distinct.iter().map(|v| v.to_string()).collect(),
                positions: distinct,
                indices,
            }
        }
        AxisValues::Categorical(strings) => {
            let mut labels: Vec<String> = Vec::new();
            let mut lookup: HashMap<&str, usize> = HashMap::new();
            let indices = strings
                .iter()
                .map(|v| {
                    v.as_deref().map(|s| {
                        *lookup.entry(s).or_insert_with(|| {
                            labels.push(s.to_string());
                            labels.len() - 1
                        })
                    })
                })
                .collect();
            Categories {
                positions: (0..labels.len()).map(|i| i as f64).collect(),
                labels,
                indices,
            }
        }
    }
}

/// Mean and confidence interval of `ys` per category index.
fn category_estimates(
    n: usize,
    indices: &[Option<usize>],
    ys: &[Option<f64>],
) -> Vec<MeanEstimate> {
    let mut groups: Vec<Vec<f64>> = vec![Vec::new(); n];
    for (idx, y) in indices.iter().zip(ys) {
        if let (Some(i), Some(y)) = (idx, y) {
            groups[*i].push(*y);
        }
    }
    groups
        .iter()
        .map(|g| MeanEstimate::from_values(g))
        .collect()
}

/// Turns columns of the combined table into chart geometry.
pub trait PlotStrategy {
    /// Y axis label used instead of the selected y column.
    fn y_label_override(&self) -> Option<&'static str> {
        None
    }

    fn geometry(&self, df: &DataFrame, x: &str, y: &str) -> Result<ChartGeometry, RenderError>;
}

/// Mean y per distinct x, joined in x order, with a 95% confidence band.
pub struct LinePlot;

impl PlotStrategy for LinePlot {
    fn geometry(&self, df: &DataFrame, x: &str, y: &str) -> Result<ChartGeometry, RenderError> {
        let xs = axis_values(df, x)?;
        let ys = numeric_values(df, y)?;
        let categories = categorize(&xs);
        let estimates = category_estimates(categories.labels.len(), &categories.indices, &ys);

        let present: Vec<(f64, &MeanEstimate)> = categories
            .positions
            .iter()
            .copied()
            .zip(&estimates)
            .filter(|(_, e)| e.count > 0)
            .collect();
        let points = present.iter().map(|(x, e)| (*x, e.mean)).collect();
        let band = present
            .iter()
            .filter_map(|(x, e)| e.interval.map(|(low, high)| (*x, low, high)))
            .collect();

        Ok(ChartGeometry::Line {
            points,
            band,
            categories: matches!(xs, AxisValues::Categorical(_)).then_some(categories.labels),
        })
    }
}

/// One bar per x category, height is the mean y, with 95% error bars.
pub struct BarChart;

impl PlotStrategy for BarChart {
    fn geometry(&self, df: &DataFrame, x: &str, y: &str) -> Result<ChartGeometry, RenderError> {
        let xs = axis_values(df, x)?;
        let ys = numeric_values(df, y)?;
        let categories = categorize(&xs);
        let estimates = category_estimates(categories.labels.len(), &categories.indices, &ys);

        let heights = estimates
            .iter()
            .map(|e| if e.count > 0 { e.mean } else { 0.0 })
            .collect();
        let errors = estimates.iter().map(|e| e.interval).collect();
        Ok(ChartGeometry::Bars {
            categories: categories.labels,
            heights,
            errors,
        })
    }
}

/// One point per row with both values present.
pub struct ScatterPlot;

impl PlotStrategy for ScatterPlot {
    fn geometry(&self, df: &DataFrame, x: &str, y: &str) -> Result<ChartGeometry, RenderError> {
        let xs = axis_values(df, x)?;
        let ys = numeric_values(df, y)?;

        let (coords, categories): (Vec<Option<f64>>, Option<Vec<String>>) = match &xs {
            AxisValues::Numeric(values) => (values.clone(), None),
            AxisValues::Categorical(_) => {
                let categories = categorize(&xs);
                (
                    categories
                        .indices
                        .into_iter()
                        .map(|i| i.map(|i| i as f64))
                        .collect(),
                    Some(categories.labels),
                )
            }
        };

        let points = coords
            .into_iter()
            .zip(ys)
            .filter_map(|(x, y)| Some((x?, y?)))
            .collect();
        Ok(ChartGeometry::Scatter { points, categories })
    }
}

/// Histogram of x with a density curve; y is ignored.
pub struct DistributionPlot;

impl PlotStrategy for DistributionPlot {
    fn y_label_override(&self) -> Option<&'static str> {
        Some("Density")
    }

    fn geometry(&self, df: &DataFrame, x: &str, _y: &str) -> Result<ChartGeometry, RenderError> {
        let values: Vec<f64> = numeric_values(df, x)?.into_iter().flatten().collect();
        if values.is_empty() {
            return Err(RenderError::NoData(x.to_string()));
        }
        let bins = DensityEstimator::histogram(&values);

        // Scale the density so its area matches the histogram's total count.
        let scale = values.len() as f64 * bins.first().map(HistogramBin::width).unwrap_or(1.0);
        let density = DensityEstimator::kde(&values)
            .into_iter()
            .map(|(x, d)| (x, d * scale))
            .collect();

        Ok(ChartGeometry::Histogram { bins, density })
    }
}

/// Number of rows per distinct x value; y is ignored.
pub struct CountPlot;

impl PlotStrategy for CountPlot {
    fn y_label_override(&self) -> Option<&'static str> {
        Some("Count")
    }

    fn geometry(&self, df: &DataFrame, x: &str, _y: &str) -> Result<ChartGeometry, RenderError> {
        let xs = axis_values(df, x)?;
        let categories = categorize(&xs);
        let mut heights = vec![0.0; categories.labels.len()];
        for i in categories.indices.into_iter().flatten() {
            heights[i] += 1.0;
        }
        Ok(ChartGeometry::Bars {
            categories: categories.labels,
            heights,
            errors: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str) -> AxisChoice {
        AxisChoice::Column(name.to_string())
    }

    fn sample() -> DataFrame {
        df!(
            "day" => ["mon", "tue", "mon", "wed", "tue"],
            "hour" => [Some(1i64), Some(2), Some(2), None, Some(3)],
            "sales" => [Some(10.0), Some(20.0), Some(30.0), Some(40.0), None],
        )
        .expect("sample frame")
    }

    #[test]
    fn title_uses_display_name_and_columns() {
        let plan = ChartKind::Scatter
            .plan(&sample(), &column("hour"), &column("sales"))
            .unwrap();
        assert_eq!(plan.title, "Scatter Plot of sales vs hour");
        assert_eq!(plan.x_label, "hour");
        assert_eq!(plan.y_label, "sales");
    }

    #[test]
    fn distribution_always_labels_density() {
        for y in [column("sales"), column("day"), AxisChoice::None] {
            let plan = ChartKind::Distribution
                .plan(&sample(), &column("sales"), &y)
                .unwrap();
            assert_eq!(plan.y_label, "Density");
            assert_eq!(plan.title, "Distribution Plot of Density vs sales");
        }
    }

    #[test]
    fn count_always_labels_count() {
        for y in [column("sales"), AxisChoice::None] {
            let plan = ChartKind::Count.plan(&sample(), &column("day"), &y).unwrap();
            assert_eq!(plan.y_label, "Count");
            assert_eq!(plan.title, "Count Plot of Count vs day");
        }
    }

    #[test]
    fn count_follows_first_appearance() {
        let plan = ChartKind::Count
            .plan(&sample(), &column("day"), &AxisChoice::None)
            .unwrap();
        match plan.geometry {
            ChartGeometry::Bars { categories, heights, .. } => {
                assert_eq!(categories, vec!["mon", "tue", "wed"]);
                assert_eq!(heights, vec![2.0, 2.0, 1.0]);
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn bar_heights_are_category_means() {
        let plan = ChartKind::Bar
            .plan(&sample(), &column("day"), &column("sales"))
            .unwrap();
        match plan.geometry {
            ChartGeometry::Bars { categories, heights, .. } => {
                assert_eq!(categories, vec!["mon", "tue", "wed"]);
                assert_eq!(heights, vec![20.0, 20.0, 40.0]);
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn line_aggregates_sorted_numeric_x() {
        let df = df!(
            "x" => [3i64, 1, 2, 1],
            "y" => [30.0, 10.0, 20.0, 20.0],
        )
        .unwrap();
        let plan = ChartKind::Line.plan(&df, &column("x"), &column("y")).unwrap();
        match plan.geometry {
            ChartGeometry::Line { points, band, categories } => {
                assert!(categories.is_none());
                assert_eq!(points, vec![(1.0, 15.0), (2.0, 20.0), (3.0, 30.0)]);
                // Only x = 1 has enough samples for an interval.
                assert_eq!(band.len(), 1);
                let (x, low, high) = band[0];
                assert_eq!(x, 1.0);
                assert!(low < 15.0 && high > 15.0);
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn scatter_skips_missing_pairs() {
        let plan = ChartKind::Scatter
            .plan(&sample(), &column("hour"), &column("sales"))
            .unwrap();
        match plan.geometry {
            ChartGeometry::Scatter { points, .. } => {
                assert_eq!(points, vec![(1.0, 10.0), (2.0, 20.0), (2.0, 30.0)]);
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn distribution_counts_all_values() {
        let plan = ChartKind::Distribution
            .plan(&sample(), &column("sales"), &AxisChoice::None)
            .unwrap();
        match plan.geometry {
            ChartGeometry::Histogram { bins, density } => {
                assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 4);
                assert!(!density.is_empty());
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn none_axis_fails_inside_render() {
        let err = ChartKind::Line
            .plan(&sample(), &column("hour"), &AxisChoice::None)
            .unwrap_err();
        assert!(matches!(err, RenderError::ColumnNotFound(ref c) if c == "None"));
    }

    #[test]
    fn text_y_is_not_numeric() {
        let err = ChartKind::Line
            .plan(&sample(), &column("hour"), &column("day"))
            .unwrap_err();
        assert!(matches!(err, RenderError::NotNumeric(_)));
    }

    #[test]
    fn distribution_of_all_nulls_has_no_data() {
        let df = df!("v" => [None::<f64>, None]).unwrap();
        let err = ChartKind::Distribution
            .plan(&df, &column("v"), &AxisChoice::None)
            .unwrap_err();
        assert!(matches!(err, RenderError::NoData(ref c) if c == "v"));
    }

    #[test]
    fn bar_bounds_include_zero() {
        let geometry = ChartGeometry::Bars {
            categories: vec!["a".into(), "b".into()],
            heights: vec![2.0, 4.0],
            errors: vec![None, Some((3.0, 5.0))],
        };
        assert_eq!(geometry.x_bounds(), (-0.5, 1.5));
        let (low, high) = geometry.y_bounds();
        assert_eq!(low, 0.0);
        assert!(high > 5.0);
    }

    #[test]
    fn bar_errors_need_two_samples() {
        let plan = ChartKind::Bar
            .plan(&sample(), &column("day"), &column("sales"))
            .unwrap();
        match plan.geometry {
            ChartGeometry::Bars { errors, .. } => {
                assert_eq!(errors.len(), 3);
                let (low, high) = errors[0].expect("mon has two samples");
                assert!(low < 20.0 && high > 20.0);
                // tue has one non-null sale, wed has one.
                assert!(errors[1].is_none());
                assert!(errors[2].is_none());
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn count_has_no_error_bars() {
        let plan = ChartKind::Count
            .plan(&sample(), &column("day"), &AxisChoice::None)
            .unwrap();
        assert!(matches!(plan.geometry, ChartGeometry::Bars { ref errors, .. } if errors.is_empty()));
    }

    #[test]
    fn boolean_y_averages_as_numbers() {
        let df = df!(
            "group" => ["a", "a", "b"],
            "passed" => [true, false, true],
        )
        .unwrap();
        let plan = ChartKind::Bar
            .plan(&df, &column("group"), &column("passed"))
            .unwrap();
        match plan.geometry {
            ChartGeometry::Bars { heights, .. } => assert_eq!(heights, vec![0.5, 1.0]),
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn infinite_values_are_left_out_of_distribution() {
        let df = df!("v" => [1.0, 2.0, f64::INFINITY, 3.0, f64::NEG_INFINITY]).unwrap();
        let plan = ChartKind::Distribution
            .plan(&df, &column("v"), &AxisChoice::None)
            .unwrap();
        match plan.geometry {
            ChartGeometry::Histogram { bins, .. } => {
                assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
                assert!(bins.iter().all(|b| b.start.is_finite() && b.end.is_finite()));
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }
}

//! Static Chart Renderer
//! Draws a chart plan into an in-memory RGB image with plotters.
//!
//! Layout:
//! 1. Title: "{kind} of {y} vs {x}" centered
//! 2. Plot area with tick labels and light grid
//! 3. Axis descriptions below and left of the plot

use crate::charts::{ChartGeometry, ChartPlan, RenderError};
use crate::config::ChartStyle;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::RGBColor;

/// Pixels per inch used to turn point sizes into pixels.
const DPI: f64 = 100.0;
const FONT: &str = "sans-serif";
const MAX_TICKS: usize = 8;

// Colors
const SERIES: RGBColor = RGBColor(31, 119, 180); // Default series blue
const BAR_FILL: RGBColor = RGBColor(76, 114, 176);
const ERROR_BAR: RGBColor = RGBColor(60, 60, 60);
const HIST_FILL: RGBColor = RGBColor(141, 172, 210);
const GRID: RGBColor = RGBColor(220, 220, 220);

/// A rendered chart as a tightly packed RGB buffer.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a plan onto a canvas of the configured size.
    pub fn render(plan: &ChartPlan, style: &ChartStyle) -> Result<RenderedChart, RenderError> {
        let (width, height) = (style.width, style.height);
        let mut pixels = vec![255u8; (width * height * 3) as usize];

        {
            let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(drawing_error)?;
            Self::draw(&root, plan, style)?;
            root.present().map_err(drawing_error)?;
        }

        Ok(RenderedChart {
            title: plan.title.clone(),
            width,
            height,
            pixels,
        })
    }

    fn draw(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        plan: &ChartPlan,
        style: &ChartStyle,
    ) -> Result<(), RenderError> {
        let geometry = &plan.geometry;
        let (x_min, x_max) = geometry.x_bounds();
        let (y_min, y_max) = geometry.y_bounds();

        let categories: Option<Vec<String>> = geometry.categories().map(<[String]>::to_vec);
        // One label slot per category puts the key points on whole numbers.
        let x_labels = categories
            .as_ref()
            .map_or(MAX_TICKS, |labels| labels.len().max(1));

        let mut chart = ChartBuilder::on(root)
            .caption(&plan.title, (FONT, font_px(style.title_font_size)))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(55)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(drawing_error)?;

        let x_formatter = |v: &f64| match &categories {
            Some(labels) => category_label(labels, *v),
            None => format_tick(*v),
        };
        let y_formatter = |v: &f64| format_tick(*v);

        chart
            .configure_mesh()
            .x_desc(plan.x_label.as_str())
            .y_desc(plan.y_label.as_str())
            .axis_desc_style((FONT, font_px(style.label_font_size)))
            .label_style((FONT, font_px(style.tick_font_size)))
            .x_labels(x_labels)
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .y_labels(MAX_TICKS)
            .bold_line_style(GRID)
            .light_line_style(TRANSPARENT)
            .draw()
            .map_err(drawing_error)?;

        match geometry {
            ChartGeometry::Line { points, band, .. } => {
                if band.len() >= 2 {
                    let outline: Vec<(f64, f64)> = band
                        .iter()
                        .map(|&(x, _, high)| (x, high))
                        .chain(band.iter().rev().map(|&(x, low, _)| (x, low)))
                        .collect();
                    chart
                        .draw_series(std::iter::once(Polygon::new(
                            outline,
                            SERIES.mix(0.2).filled(),
                        )))
                        .map_err(drawing_error)?;
                }
                chart
                    .draw_series(LineSeries::new(points.iter().copied(), SERIES.stroke_width(2)))
                    .map_err(drawing_error)?;
            }
            ChartGeometry::Scatter { points, .. } => {
                chart
                    .draw_series(
                        points
                            .iter()
                            .map(|&p| Circle::new(p, 3, SERIES.mix(0.8).filled())),
                    )
                    .map_err(drawing_error)?;
            }
            ChartGeometry::Bars { heights, errors, .. } => {
                chart
                    .draw_series(heights.iter().enumerate().map(|(i, &h)| {
                        let x = i as f64;
                        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, h)], BAR_FILL.filled())
                    }))
                    .map_err(drawing_error)?;
                chart
                    .draw_series(errors.iter().zip(heights).enumerate().filter_map(
                        |(i, (error, &h))| {
                            error.map(|(low, high)| {
                                ErrorBar::new_vertical(
                                    i as f64,
                                    low,
                                    h,
                                    high,
                                    ERROR_BAR.stroke_width(2),
                                    8,
                                )
                            })
                        },
                    ))
                    .map_err(drawing_error)?;
            }
            ChartGeometry::Histogram { bins, density } => {
                chart
                    .draw_series(bins.iter().map(|b| {
                        Rectangle::new(
                            [(b.start, 0.0), (b.end, b.count as f64)],
                            HIST_FILL.filled(),
                        )
                    }))
                    .map_err(drawing_error)?;
                chart
                    .draw_series(bins.iter().map(|b| {
                        Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], WHITE)
                    }))
                    .map_err(drawing_error)?;
                chart
                    .draw_series(LineSeries::new(
                        density.iter().copied(),
                        SERIES.stroke_width(2),
                    ))
                    .map_err(drawing_error)?;
            }
        }

        Ok(())
    }
}

fn drawing_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

fn font_px(points: f64) -> f64 {
    points * DPI / 72.0
}

/// Label of the category nearest to `v`, empty between categories.
fn category_label(labels: &[String], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Format a tick value: integer when whole, else up to two decimals.
fn format_tick(v: f64) -> String {
    let abs = v.abs();
    if abs < 1e-9 {
        "0".to_string()
    } else if abs >= 1e6 || abs < 0.01 {
        format!("{:e}", v)
    } else if (v - v.round()).abs() < 1e-9 {
        format!("{:.0}", v)
    } else if abs >= 1.0 {
        format!("{:.1}", v)
    } else {
        format!("{:.2}", v)
    }
}

//! Density Estimation Module
//! Histogram binning and gaussian kernel density estimates for distribution plots.

use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// Number of evaluation points for the density curve.
pub const KDE_GRID_SIZE: usize = 200;

/// Upper bound on histogram bins, reached when outliers stretch the range.
pub const MAX_BINS: usize = 1000;

/// One histogram bin; `end` is inclusive only for the last bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

pub struct DensityEstimator;

impl DensityEstimator {
    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Bin edges using the smaller of the Sturges and Freedman-Diaconis widths.
    pub fn bin_edges(values: &[f64]) -> Vec<f64> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return Vec::new();
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = sorted.len() as f64;
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let range = max - min;

        if range == 0.0 {
            return vec![min - 0.5, min + 0.5];
        }

        let sturges = range / (n.log2() + 1.0);
        let iqr = Self::percentile(&sorted, 75.0) - Self::percentile(&sorted, 25.0);
        let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
        let width = if fd > 0.0 { fd.min(sturges) } else { sturges };
        let bins = ((range / width).ceil() as usize).clamp(1, MAX_BINS);

        (0..=bins)
            .map(|i| min + range * i as f64 / bins as f64)
            .collect()
    }

    /// Count values into automatically sized bins.
    pub fn histogram(values: &[f64]) -> Vec<HistogramBin> {
        let edges = Self::bin_edges(values);
        if edges.len() < 2 {
            return Vec::new();
        }

        let mut bins: Vec<HistogramBin> = edges
            .windows(2)
            .map(|w| HistogramBin {
                start: w[0],
                end: w[1],
                count: 0,
            })
            .collect();

        let first = edges[0];
        let last = edges[edges.len() - 1];
        let width = (last - first) / bins.len() as f64;

        for &v in values.iter().filter(|v| v.is_finite()) {
            let idx = (((v - first) / width).floor() as usize).min(bins.len() - 1);
            bins[idx].count += 1;
        }

        bins
    }

    /// Scott's rule bandwidth: sample standard deviation times n^(-1/5).
    pub fn scott_bandwidth(values: &[f64]) -> f64 {
        let n = values.len() as f64;
        values.iter().std_dev() * n.powf(-0.2)
    }

    /// Gaussian KDE evaluated on an even grid over the data range.
    ///
    /// Returns an empty curve when fewer than two distinct values exist.
    pub fn kde(values: &[f64]) -> Vec<(f64, f64)> {
        let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if values.len() < 2 {
            return Vec::new();
        }

        let bandwidth = Self::scott_bandwidth(&values);
        if !(bandwidth > 0.0) {
            return Vec::new();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let kernel = Normal::standard();
        let norm = values.len() as f64 * bandwidth;

        (0..KDE_GRID_SIZE)
            .map(|i| {
                let x = min + (max - min) * i as f64 / (KDE_GRID_SIZE - 1) as f64;
                let density = values
                    .iter()
                    .map(|&xi| kernel.pdf((x - xi) / bandwidth))
                    .sum::<f64>()
                    / norm;
                (x, density)
            })
            .collect()
    }
}

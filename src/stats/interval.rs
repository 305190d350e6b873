//! Interval Estimation Module
//! Group means with t-distribution confidence intervals for line and bar charts.

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Two-sided confidence level of the error bars and bands.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Mean of one group, with its confidence interval when it can be computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanEstimate {
    pub mean: f64,
    pub count: usize,
    /// `(low, high)`; `None` below two samples.
    pub interval: Option<(f64, f64)>,
}

impl MeanEstimate {
    /// Estimate the mean and its t-interval.
    ///
    /// An empty group has a NaN mean.
    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len();
        if n == 0 {
            return Self {
                mean: f64::NAN,
                count: 0,
                interval: None,
            };
        }

        let mean = values.iter().sum::<f64>() / n as f64;
        if n < 2 {
            return Self {
                mean,
                count: n,
                interval: None,
            };
        }

        let var = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let se = (var / n as f64).sqrt();

        let interval = StudentsT::new(0.0, 1.0, (n - 1) as f64)
            .ok()
            .map(|dist| dist.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0))
            .map(|t| (mean - t * se, mean + t * se));

        Self {
            mean,
            count: n,
            interval,
        }
    }
}

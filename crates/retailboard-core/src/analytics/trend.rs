//! Linear trend estimation (price elasticity)
//!
//! Ordinary least squares fit of `y = slope * x + intercept`, with R² to
//! judge how much of the variance the line explains.

use serde::Serialize;

use crate::error::{CoreError, Result};

/// Fitted first-degree model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination, 0.0 when `y` is constant
    pub r_squared: f64,
    /// Smallest observed `x`
    pub x_min: f64,
    /// Largest observed `x`
    pub x_max: f64,
    /// Number of points used for the fit
    pub points: usize,
}

impl LinearTrend {
    /// Fit a line through paired samples
    ///
    /// # Errors
    /// - `InvalidColumn` when the columns differ in length or hold non-finite values
    /// - `InsufficientData` with fewer than 2 points or when every `x` is equal
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(CoreError::invalid_column(
                "trend input",
                "y",
                format!("length {} does not match x length {}", ys.len(), xs.len()),
            ));
        }
        if xs.len() < 2 {
            return Err(CoreError::insufficient(
                "linear trend",
                format!("need at least 2 points, got {}", xs.len()),
            ));
        }
        if let Some(v) = xs.iter().chain(ys).find(|v| !v.is_finite()) {
            return Err(CoreError::invalid_column(
                "trend input",
                "x/y",
                format!("non-finite value {}", v),
            ));
        }

        let x_min = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let x_max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // Judged on the raw values; centered sums of equal inexact x are not exactly 0
        if x_min == x_max {
            return Err(CoreError::insufficient(
                "linear trend",
                "x has zero variance, slope is undefined",
            ));
        }

        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;

        // Centered sums keep the fit stable for large prices
        let sxx: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
        let sxy: f64 = xs
            .iter()
            .zip(ys)
            .map(|(x, y)| (x - mean_x) * (y - mean_y))
            .sum();

        if sxx <= f64::EPSILON * xs.iter().map(|x| x * x).sum::<f64>() {
            return Err(CoreError::insufficient(
                "linear trend",
                "x has zero variance, slope is undefined",
            ));
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;

        let ss_tot: f64 = ys.iter().map(|y| (y - mean_y).powi(2)).sum();
        let ss_res: f64 = xs
            .iter()
            .zip(ys)
            .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
            .sum();
        let r_squared = if ss_tot > 0.0 {
            (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Ok(Self {
            slope,
            intercept,
            r_squared,
            x_min,
            x_max,
            points: xs.len(),
        })
    }

    /// Predicted `y` for `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Endpoints of the trend line across the observed `x` range
    pub fn line(&self) -> [(f64, f64); 2] {
        [
            (self.x_min, self.predict(self.x_min)),
            (self.x_max, self.predict(self.x_max)),
        ]
    }
}

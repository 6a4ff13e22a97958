//! Descriptive statistics shared by the calculators
//!
//! Quantiles use linear interpolation between order statistics: the value at
//! fraction `q` sits at position `q * (n - 1)` of the sorted sample.

use serde::Serialize;

use crate::error::{CoreError, Result};

/// Headline summary of one numeric column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Summarize a sample, `None` when it is empty
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let total: f64 = values.iter().sum();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            count: values.len(),
            total,
            mean: total / values.len() as f64,
            min,
            max,
        })
    }
}

/// Arithmetic mean, `None` for an empty sample
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Quantile with linear interpolation, `q` in `[0, 1]`
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Median (the 0.5 quantile)
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Extract a numeric column, rejecting NaN and infinities
pub(crate) fn finite_column<T>(
    rows: &[T],
    table: &str,
    column: &str,
    value: impl Fn(&T) -> f64,
) -> Result<Vec<f64>> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let v = value(row);
            if v.is_finite() {
                Ok(v)
            } else {
                Err(CoreError::invalid_column(
                    table,
                    column,
                    format!("non-finite value {} at row {}", v, idx),
                ))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_linear_interpolation() {
        let scores: Vec<f64> = (1..=10).map(|i| (i * 10) as f64).collect();
        assert_eq!(quantile(&scores, 0.25), Some(32.5));
        assert_eq!(quantile(&scores, 0.75), Some(77.5));
        assert_eq!(median(&scores), Some(55.0));
    }

    #[test]
    fn test_quantile_unsorted_input() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
    }

    #[test]
    fn test_quantile_single_value_degenerates() {
        assert_eq!(quantile(&[7.0], 0.25), Some(7.0));
        assert_eq!(quantile(&[7.0], 0.75), Some(7.0));
    }

    #[test]
    fn test_empty_sample() {
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
        assert!(ColumnSummary::compute(&[]).is_none());
    }

    #[test]
    fn test_column_summary() {
        let summary = ColumnSummary::compute(&[4.0, 1.0, 7.0]).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total, 12.0);
        assert_eq!(summary.mean, 4.0);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 7.0);
    }

    #[test]
    fn test_finite_column_rejects_nan() {
        let rows = [1.0, f64::NAN];
        let err = finite_column(&rows, "t", "v", |v| *v).unwrap_err();
        assert!(matches!(err, CoreError::InvalidColumn { .. }));
    }
}

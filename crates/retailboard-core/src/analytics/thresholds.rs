//! Median and quartile threshold classification
//!
//! Labels each row of a numeric column against median or quartile cut
//! points, and composes two independent thresholds into an explicit subset
//! ("high revenue AND high stock risk").

use serde::Serialize;

use super::stats::{finite_column, median, quantile};
use crate::error::{CoreError, Result};

/// Classification mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThresholdMode {
    /// Above / below the median
    MedianSplit,
    /// Top cohort (>= P75) / bottom cohort (<= P25)
    QuartileSplit,
}

/// Cut points used for a classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CutPoints {
    Median(f64),
    Quartiles { p25: f64, p75: f64 },
}

/// Per-row label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThresholdLabel {
    /// Strictly above the median
    Above,
    /// At or below the median
    Below,
    /// `>= P75`
    TopCohort,
    /// `<= P25`
    BottomCohort,
    /// Both `>= P75` and `<= P25` (tiny or degenerate samples)
    BothCohorts,
    /// Strictly between the quartiles
    Unlabeled,
}

impl ThresholdLabel {
    pub fn is_top(&self) -> bool {
        matches!(self, Self::TopCohort | Self::BothCohorts)
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, Self::BottomCohort | Self::BothCohorts)
    }
}

/// Labels aligned with the input rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub mode: ThresholdMode,
    pub cut_points: CutPoints,
    pub labels: Vec<ThresholdLabel>,
}

impl Classification {
    /// Indices of rows carrying a label that satisfies `pred`
    pub fn indices(&self, pred: impl Fn(&ThresholdLabel) -> bool) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| pred(l))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Classify rows by one numeric column
///
/// Fewer than 4 rows are tolerated: the quartiles collapse onto the same or
/// adjacent values, and a row may land in both cohorts.
pub fn classify<T>(
    rows: &[T],
    column: &str,
    value: impl Fn(&T) -> f64,
    mode: ThresholdMode,
) -> Result<Classification> {
    if rows.is_empty() {
        return Err(CoreError::empty("threshold classification"));
    }

    let values = finite_column(rows, "threshold input", column, value)?;

    let (cut_points, labels) = match mode {
        ThresholdMode::MedianSplit => {
            let (m, labels) = median_split(&values)?;
            (CutPoints::Median(m), labels)
        }
        ThresholdMode::QuartileSplit => {
            let (p25, p75) = quartiles(&values)?;
            let labels = values
                .iter()
                .map(|&v| match (v >= p75, v <= p25) {
                    (true, true) => ThresholdLabel::BothCohorts,
                    (true, false) => ThresholdLabel::TopCohort,
                    (false, true) => ThresholdLabel::BottomCohort,
                    (false, false) => ThresholdLabel::Unlabeled,
                })
                .collect();
            (CutPoints::Quartiles { p25, p75 }, labels)
        }
    };

    Ok(Classification {
        mode,
        cut_points,
        labels,
    })
}

fn median_split(values: &[f64]) -> Result<(f64, Vec<ThresholdLabel>)> {
    let m = median(values).ok_or(CoreError::empty("median split"))?;
    let labels = values
        .iter()
        .map(|&v| {
            if v > m {
                ThresholdLabel::Above
            } else {
                ThresholdLabel::Below
            }
        })
        .collect();
    Ok((m, labels))
}

/// `(P25, P75)` of a non-empty sample
pub(crate) fn quartiles(values: &[f64]) -> Result<(f64, f64)> {
    match (quantile(values, 0.25), quantile(values, 0.75)) {
        (Some(p25), Some(p75)) => Ok((p25, p75)),
        _ => Err(CoreError::empty("quartile split")),
    }
}

/// Rows whose labels satisfy both predicates, in input order
///
/// The classifications may use different columns and modes, e.g. a quartile
/// split on revenue ANDed with a median split on stock risk.
///
/// # Errors
/// `InvalidArgument` when a classification was built over a different number
/// of rows.
pub fn select_both<T: Clone>(
    rows: &[T],
    first: (&Classification, impl Fn(&ThresholdLabel) -> bool),
    second: (&Classification, impl Fn(&ThresholdLabel) -> bool),
) -> Result<Vec<T>> {
    for (name, classification) in [("first", first.0), ("second", second.0)] {
        if classification.labels.len() != rows.len() {
            return Err(CoreError::InvalidArgument {
                name: "classification",
                reason: format!(
                    "{} classification has {} labels for {} rows",
                    name,
                    classification.labels.len(),
                    rows.len()
                ),
            });
        }
    }

    Ok(rows
        .iter()
        .zip(first.0.labels.iter().zip(&second.0.labels))
        .filter(|(_, (a, b))| (first.1)(*a) && (second.1)(*b))
        .map(|(row, _)| row.clone())
        .collect())
}

/// Rows strictly above the median on both columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundSelection<T> {
    pub first_median: f64,
    pub second_median: f64,
    pub rows: Vec<T>,
}

/// Intersect two median-split conditions and return the matching rows
pub fn above_both_medians<T: Clone>(
    rows: &[T],
    first: (&str, fn(&T) -> f64),
    second: (&str, fn(&T) -> f64),
) -> Result<CompoundSelection<T>> {
    if rows.is_empty() {
        return Err(CoreError::empty("compound threshold"));
    }

    let (first_median, first_labels) =
        median_split(&finite_column(rows, "compound threshold", first.0, first.1)?)?;
    let (second_median, second_labels) =
        median_split(&finite_column(rows, "compound threshold", second.0, second.1)?)?;

    let selected = rows
        .iter()
        .zip(first_labels.iter().zip(&second_labels))
        .filter(|(_, (a, b))| **a == ThresholdLabel::Above && **b == ThresholdLabel::Above)
        .map(|(row, _)| row.clone())
        .collect();

    Ok(CompoundSelection {
        first_median,
        second_median,
        rows: selected,
    })
}

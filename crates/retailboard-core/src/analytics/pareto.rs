//! Pareto (80/20) curve analysis
//!
//! Builds the cumulative contribution curve over entities sorted by
//! contribution and answers "what share do the top `f` of entities hold".

use serde::Serialize;

use super::stats::finite_column;
use crate::error::{CoreError, Result};
use crate::models::Contribution;

/// Fraction used for the canonical 80/20 check
pub const DEFAULT_PARETO_FRACTION: f64 = 0.2;

/// One point of the curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParetoPoint<T> {
    pub row: T,
    /// Running share of the total up to and including this row, in `[0, 100]`
    pub cumulative_percentage: f64,
}

/// How concentrated contribution is in the top fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParetoStrength {
    /// Top fraction holds at least 75%
    Strong,
    /// Top fraction holds at least 60%
    Moderate,
    /// Contribution is spread out
    Weak,
}

impl ParetoStrength {
    pub fn from_share(share_pct: f64) -> Self {
        if share_pct >= 75.0 {
            Self::Strong
        } else if share_pct >= 60.0 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Weak => "weak",
        }
    }
}

/// Cumulative contribution curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParetoCurve<T> {
    pub points: Vec<ParetoPoint<T>>,
    pub total: f64,
}

/// Share held by the top fraction of entities
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParetoCheck {
    pub fraction: f64,
    /// 0-based row index closing the top fraction
    pub rank_index: usize,
    /// Number of entities in the top fraction (`rank_index + 1`)
    pub entity_count: usize,
    pub total_entities: usize,
    pub cumulative_percentage: f64,
    pub strength: ParetoStrength,
}

impl<T> ParetoCurve<T> {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest row index `i` with `(i + 1) / N >= fraction`
    ///
    /// # Errors
    /// `InvalidArgument` unless `0 < fraction <= 1`.
    pub fn rank_at_fraction(&self, fraction: f64) -> Result<usize> {
        rank_at_fraction(self.points.len(), fraction)
    }

    /// Cumulative share held by the top `fraction` of entities
    pub fn check(&self, fraction: f64) -> Result<ParetoCheck> {
        let rank_index = self.rank_at_fraction(fraction)?;
        let cumulative_percentage = self.points[rank_index].cumulative_percentage;

        Ok(ParetoCheck {
            fraction,
            rank_index,
            entity_count: rank_index + 1,
            total_entities: self.points.len(),
            cumulative_percentage,
            strength: ParetoStrength::from_share(cumulative_percentage),
        })
    }

    /// Rows inside the top `fraction`
    pub fn head(&self, fraction: f64) -> Result<&[ParetoPoint<T>]> {
        let rank_index = self.rank_at_fraction(fraction)?;
        Ok(&self.points[..=rank_index])
    }
}

/// Smallest row index `i` in a table of `n` rows with `(i + 1) / n >= fraction`
pub fn rank_at_fraction(n: usize, fraction: f64) -> Result<usize> {
    if n == 0 {
        return Err(CoreError::empty("pareto rank"));
    }
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(CoreError::InvalidArgument {
            name: "fraction",
            reason: format!("expected 0 < fraction <= 1, got {}", fraction),
        });
    }

    let total = n as f64;
    Ok((0..n)
        .find(|&i| (i + 1) as f64 / total >= fraction)
        .unwrap_or(n - 1))
}

/// Build the cumulative curve
///
/// Rows are re-sorted by contribution, descending and stable, so an
/// already-sorted view passes through unchanged. A zero total yields 0 for
/// every cumulative percentage.
pub fn pareto_curve<T>(rows: &[T], table: &str) -> Result<ParetoCurve<T>>
where
    T: Contribution + Clone,
{
    if rows.is_empty() {
        return Err(CoreError::empty("pareto curve"));
    }

    let values = finite_column(rows, table, "contribution", |r| r.contribution())?;
    if let Some((pos, v)) = values.iter().enumerate().find(|(_, v)| **v < 0.0) {
        return Err(CoreError::invalid_column(
            table,
            "contribution",
            format!("negative value {} for '{}'", v, rows[pos].label()),
        ));
    }

    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let total: f64 = values.iter().sum();
    let mut running = 0.0;
    let points = order
        .into_iter()
        .map(|idx| {
            running += values[idx];
            let cumulative_percentage = if total > 0.0 {
                (running / total * 100.0).min(100.0)
            } else {
                0.0
            };
            ParetoPoint {
                row: rows[idx].clone(),
                cumulative_percentage,
            }
        })
        .collect();

    Ok(ParetoCurve { points, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParetoRow;

    fn product(id: usize, revenue: f64) -> ParetoRow {
        ParetoRow {
            product_id: format!("P{:03}", id),
            product_name: format!("Product {}", id),
            revenue,
        }
    }

    fn skewed(n: usize) -> Vec<ParetoRow> {
        (0..n)
            .map(|i| product(i, 1000.0 / ((i + 1) * (i + 1)) as f64))
            .collect()
    }

    #[test]
    fn test_cumulative_monotone_and_ends_at_100() {
        let curve = pareto_curve(&skewed(50), "revenue_curve").unwrap();
        let pcts: Vec<f64> = curve.points.iter().map(|p| p.cumulative_percentage).collect();

        assert!(pcts.windows(2).all(|w| w[0] <= w[1]));
        assert!((pcts[pcts.len() - 1] - 100.0).abs() < 1e-9);
        assert!(pcts.iter().all(|p| (0.0..=100.0).contains(p)));
    }

    #[test]
    fn test_rank_at_fraction_ten_rows() {
        assert_eq!(rank_at_fraction(10, 0.2).unwrap(), 1);
        assert_eq!(rank_at_fraction(10, 1.0).unwrap(), 9);
        assert_eq!(rank_at_fraction(10, 0.05).unwrap(), 0);
        assert_eq!(rank_at_fraction(3, 0.2).unwrap(), 0);
    }

    #[test]
    fn test_rank_at_fraction_rejects_bad_input() {
        assert!(rank_at_fraction(0, 0.2).unwrap_err().is_empty_input());
        assert!(matches!(
            rank_at_fraction(10, 0.0),
            Err(CoreError::InvalidArgument { .. })
        ));
        assert!(matches!(
            rank_at_fraction(10, 1.5),
            Err(CoreError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_check_strength() {
        let curve = pareto_curve(&skewed(10), "revenue_curve").unwrap();
        let check = curve.check(0.2).unwrap();
        assert_eq!(check.rank_index, 1);
        assert_eq!(check.entity_count, 2);
        assert_eq!(check.strength, ParetoStrength::Strong);
        assert_eq!(curve.head(0.2).unwrap().len(), 2);

        let flat: Vec<_> = (0..10).map(|i| product(i, 10.0)).collect();
        let check = pareto_curve(&flat, "revenue_curve").unwrap().check(0.2).unwrap();
        assert!((check.cumulative_percentage - 20.0).abs() < 1e-9);
        assert_eq!(check.strength, ParetoStrength::Weak);
    }

    #[test]
    fn test_unsorted_input_is_sorted_descending() {
        let rows = vec![product(1, 5.0), product(2, 50.0), product(3, 45.0)];
        let curve = pareto_curve(&rows, "revenue_curve").unwrap();
        let ids: Vec<_> = curve.points.iter().map(|p| p.row.product_id.as_str()).collect();
        assert_eq!(ids, vec!["P002", "P003", "P001"]);
        assert_eq!(curve.points[0].cumulative_percentage, 50.0);
    }

    #[test]
    fn test_zero_total() {
        let rows = vec![product(1, 0.0), product(2, 0.0)];
        let curve = pareto_curve(&rows, "revenue_curve").unwrap();
        assert!(curve.points.iter().all(|p| p.cumulative_percentage == 0.0));
    }

    #[test]
    fn test_empty_table() {
        let rows: Vec<ParetoRow> = vec![];
        assert!(pareto_curve(&rows, "revenue_curve").unwrap_err().is_empty_input());
    }

    #[test]
    fn test_strength_bands() {
        assert_eq!(ParetoStrength::from_share(80.0), ParetoStrength::Strong);
        assert_eq!(ParetoStrength::from_share(75.0), ParetoStrength::Strong);
        assert_eq!(ParetoStrength::from_share(60.0), ParetoStrength::Moderate);
        assert_eq!(ParetoStrength::from_share(59.9), ParetoStrength::Weak);
    }
}

//! Performance segmentation into star and underperformer cohorts
//!
//! Thresholds are inclusive quartiles of `performance_score`. With few
//! distinct scores a product can qualify for both cohorts; that overlap is
//! reported as-is.

use serde::Serialize;

use super::stats::{finite_column, mean};
use super::thresholds::quartiles;
use crate::error::{CoreError, Result};
use crate::models::ScoredProductRow;

/// Default maximum cohort size
pub const DEFAULT_COHORT_CAP: usize = 20;

/// A capped cohort with its headline averages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cohort {
    pub products: Vec<ScoredProductRow>,
    /// Rows that met the threshold before the cap was applied
    pub qualifying: usize,
    pub mean_score: f64,
    pub mean_revenue: f64,
}

impl Cohort {
    fn from_rows(products: Vec<ScoredProductRow>, qualifying: usize) -> Self {
        let scores: Vec<f64> = products.iter().map(|p| p.performance_score).collect();
        let revenues: Vec<f64> = products.iter().map(|p| p.revenue).collect();
        Self {
            mean_score: mean(&scores).unwrap_or(0.0),
            mean_revenue: mean(&revenues).unwrap_or(0.0),
            products,
            qualifying,
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Stars and underperformers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segmentation {
    pub p25: f64,
    pub p75: f64,
    /// Score >= P75, highest first
    pub stars: Cohort,
    /// Score <= P25, lowest first
    pub underperformers: Cohort,
}

impl Segmentation {
    /// Product ids present in both cohorts
    pub fn overlap(&self) -> Vec<&str> {
        self.stars
            .products
            .iter()
            .filter(|s| {
                self.underperformers
                    .products
                    .iter()
                    .any(|u| u.product_id == s.product_id)
            })
            .map(|s| s.product_id.as_str())
            .collect()
    }
}

/// Split products into capped star and underperformer cohorts
///
/// A cap larger than a cohort returns every qualifying row; nothing is padded.
pub fn segment_performance(rows: &[ScoredProductRow], cap: usize) -> Result<Segmentation> {
    if rows.is_empty() {
        return Err(CoreError::empty("performance segmentation"));
    }

    let scores = finite_column(rows, "performance_ranked", "performance_score", |r| {
        r.performance_score
    })?;
    finite_column(rows, "performance_ranked", "revenue", |r| r.revenue)?;
    let (p25, p75) = quartiles(&scores)?;

    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let stars: Vec<usize> = order.iter().copied().filter(|&i| scores[i] >= p75).collect();
    let mut under: Vec<usize> = order.iter().copied().filter(|&i| scores[i] <= p25).collect();
    under.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let take = |idx: &[usize]| -> Vec<ScoredProductRow> {
        idx.iter().take(cap).map(|&i| rows[i].clone()).collect()
    };

    Ok(Segmentation {
        p25,
        p75,
        stars: Cohort::from_rows(take(&stars), stars.len()),
        underperformers: Cohort::from_rows(take(&under), under.len()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(id: &str, score: f64, revenue: f64) -> ScoredProductRow {
        ScoredProductRow {
            product_id: id.to_string(),
            product_name: format!("{} name", id),
            performance_score: score,
            revenue,
        }
    }

    fn ten() -> Vec<ScoredProductRow> {
        (1..=10)
            .map(|i| scored(&format!("P{}", i), (i * 10) as f64, (i * 1000) as f64))
            .collect()
    }

    #[test]
    fn test_quartile_cohorts() {
        let seg = segment_performance(&ten(), DEFAULT_COHORT_CAP).unwrap();
        assert_eq!(seg.p25, 32.5);
        assert_eq!(seg.p75, 77.5);

        let stars: Vec<f64> = seg.stars.products.iter().map(|p| p.performance_score).collect();
        let under: Vec<f64> = seg
            .underperformers
            .products
            .iter()
            .map(|p| p.performance_score)
            .collect();
        assert_eq!(stars, vec![100.0, 90.0, 80.0]);
        assert_eq!(under, vec![10.0, 20.0, 30.0]);
        assert_eq!(seg.stars.mean_score, 90.0);
        assert_eq!(seg.underperformers.mean_revenue, 2000.0);
        assert!(seg.overlap().is_empty());
    }

    #[test]
    fn test_cap_truncates_after_sorting() {
        let seg = segment_performance(&ten(), 2).unwrap();
        assert_eq!(seg.stars.len(), 2);
        assert_eq!(seg.stars.qualifying, 3);
        assert_eq!(seg.stars.products[0].product_id, "P10");
        assert_eq!(seg.underperformers.products[0].product_id, "P1");
        assert_eq!(seg.underperformers.products[1].product_id, "P2");
    }

    #[test]
    fn test_degenerate_scores_overlap() {
        let rows = vec![scored("A", 5.0, 1.0), scored("B", 5.0, 2.0), scored("C", 5.0, 3.0)];
        let seg = segment_performance(&rows, DEFAULT_COHORT_CAP).unwrap();
        assert_eq!(seg.stars.len(), 3);
        assert_eq!(seg.underperformers.len(), 3);
        assert_eq!(seg.overlap(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(segment_performance(&[], 20).unwrap_err().is_empty_input());
    }
}

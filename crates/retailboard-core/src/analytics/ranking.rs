//! Ranking and market share
//!
//! Sorts a table by its contribution column (descending, stable on ties) and
//! appends share-of-total and deviation-from-mean columns.

use serde::Serialize;

use super::stats::{finite_column, ColumnSummary};
use crate::error::{CoreError, Result};
use crate::models::Contribution;

/// Sort direction for ranked product lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortOrder {
    /// Largest metric first
    #[default]
    Descending,
    /// Smallest metric first (bar charts read bottom-up)
    Ascending,
}

/// One input row with its derived ranking columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow<T> {
    /// 1-based rank after sorting
    pub rank: usize,
    pub row: T,
    /// `100 * C / sum(C)`, 0 when the total is 0
    pub share_pct: f64,
    /// `100 * (C - mean) / mean`, 0 when the mean is 0
    pub vs_avg_pct: f64,
}

/// Ranked table plus headline metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking<T> {
    pub rows: Vec<RankedRow<T>>,
    pub summary: ColumnSummary,
}

impl<T> Ranking<T> {
    /// Highest contributor
    pub fn top(&self) -> Option<&RankedRow<T>> {
        self.rows.first()
    }

    /// Lowest contributor ("needs attention")
    pub fn bottom(&self) -> Option<&RankedRow<T>> {
        self.rows.last()
    }
}

/// Rank rows by contribution and compute share and deviation columns
///
/// # Errors
/// - `EmptyInput` for a zero-row table (sum and mean undefined)
/// - `InvalidColumn` for a negative or non-finite contribution
pub fn rank_by_contribution<T>(rows: &[T], table: &str) -> Result<Ranking<T>>
where
    T: Contribution + Clone,
{
    if rows.is_empty() {
        return Err(CoreError::empty("share calculation"));
    }

    let values = contributions(rows, table)?;
    let Some(summary) = ColumnSummary::compute(&values) else {
        return Err(CoreError::empty("share calculation"));
    };

    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let ranked = order
        .into_iter()
        .enumerate()
        .map(|(pos, idx)| {
            let value = values[idx];
            let share_pct = if summary.total > 0.0 {
                value / summary.total * 100.0
            } else {
                0.0
            };
            let vs_avg_pct = if summary.mean > 0.0 {
                (value - summary.mean) / summary.mean * 100.0
            } else {
                0.0
            };

            RankedRow {
                rank: pos + 1,
                row: rows[idx].clone(),
                share_pct,
                vs_avg_pct,
            }
        })
        .collect();

    Ok(Ranking {
        rows: ranked,
        summary,
    })
}

/// Sort rows by contribution in `order` and keep the first `n`
///
/// `Descending` yields the `n` largest, `Ascending` the `n` smallest. Ties
/// keep their original relative order. Returns fewer than `n` rows when the
/// table is shorter.
pub fn top_n<T>(rows: &[T], n: usize, order: SortOrder, table: &str) -> Result<Vec<T>>
where
    T: Contribution + Clone,
{
    if rows.is_empty() {
        return Err(CoreError::empty("top-n ranking"));
    }

    let values = contributions(rows, table)?;
    let mut idx: Vec<usize> = (0..rows.len()).collect();
    match order {
        SortOrder::Descending => idx.sort_by(|&a, &b| values[b].total_cmp(&values[a])),
        SortOrder::Ascending => idx.sort_by(|&a, &b| values[a].total_cmp(&values[b])),
    }
    idx.truncate(n);

    Ok(idx.into_iter().map(|i| rows[i].clone()).collect())
}

fn contributions<T: Contribution>(rows: &[T], table: &str) -> Result<Vec<f64>> {
    let values = finite_column(rows, table, "contribution", |r| r.contribution())?;
    if let Some((pos, v)) = values.iter().enumerate().find(|(_, v)| **v < 0.0) {
        return Err(CoreError::invalid_column(
            table,
            "contribution",
            format!("negative value {} for '{}'", v, rows[pos].label()),
        ));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryRow, StoreRow};

    fn category(name: &str, revenue: f64) -> CategoryRow {
        CategoryRow {
            category: name.to_string(),
            total_revenue: revenue,
            total_units_sold: revenue / 10.0,
        }
    }

    fn store(id: &str, revenue: f64) -> StoreRow {
        StoreRow {
            store_id: id.to_string(),
            total_revenue: revenue,
            total_units_sold: 0.0,
        }
    }

    #[test]
    fn test_market_share_sums_to_100() {
        let rows = vec![
            category("Toys", 120.0),
            category("Groceries", 530.5),
            category("Clothing", 77.25),
            category("Electronics", 910.0),
        ];
        let ranking = rank_by_contribution(&rows, "category_performance").unwrap();

        let sum: f64 = ranking.rows.iter().map(|r| r.share_pct).sum();
        assert!((sum - 100.0).abs() < 1e-9, "share sum was {}", sum);
        assert_eq!(ranking.top().unwrap().row.category, "Electronics");
        assert_eq!(ranking.bottom().unwrap().row.category, "Clothing");
    }

    #[test]
    fn test_vs_avg_zero_at_mean() {
        let rows = vec![store("S1", 100.0), store("S2", 200.0), store("S3", 300.0)];
        let ranking = rank_by_contribution(&rows, "store_performance").unwrap();

        let at_mean = ranking.rows.iter().find(|r| r.row.store_id == "S2").unwrap();
        assert_eq!(at_mean.vs_avg_pct, 0.0);
        assert_eq!(ranking.top().unwrap().vs_avg_pct, 50.0);
        assert_eq!(ranking.bottom().unwrap().vs_avg_pct, -50.0);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let rows = vec![store("A", 5.0), store("B", 9.0), store("C", 5.0)];
        let ranking = rank_by_contribution(&rows, "store_performance").unwrap();

        let ids: Vec<_> = ranking.rows.iter().map(|r| r.row.store_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
        assert_eq!(ranking.rows[2].rank, 3);
    }

    #[test]
    fn test_zero_total_gives_zero_share() {
        let rows = vec![category("A", 0.0), category("B", 0.0)];
        let ranking = rank_by_contribution(&rows, "category_performance").unwrap();
        assert!(ranking.rows.iter().all(|r| r.share_pct == 0.0));
        assert!(ranking.rows.iter().all(|r| r.vs_avg_pct == 0.0));
    }

    #[test]
    fn test_empty_table_fails() {
        let rows: Vec<CategoryRow> = vec![];
        let err = rank_by_contribution(&rows, "category_performance").unwrap_err();
        assert!(err.is_empty_input());
    }

    #[test]
    fn test_negative_contribution_rejected() {
        let rows = vec![category("A", 10.0), category("B", -1.0)];
        let err = rank_by_contribution(&rows, "category_performance").unwrap_err();
        assert!(matches!(err, CoreError::InvalidColumn { .. }));
    }

    #[test]
    fn test_top_n_ascending_keeps_smallest() {
        let rows = vec![
            category("A", 10.0),
            category("B", 40.0),
            category("C", 30.0),
            category("D", 20.0),
        ];
        let top = top_n(&rows, 3, SortOrder::Ascending, "t").unwrap();
        let names: Vec<_> = top.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, vec!["A", "D", "C"]);

        let all = top_n(&rows, 10, SortOrder::Descending, "t").unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].category, "B");
        assert_eq!(all[3].category, "A");
    }
}

//! Seasonal variance analysis
//!
//! Groups transactions by (season, category), then finds each category's
//! peak and trough season by mean units sold. A category is strongly
//! seasonal when its spread exceeds the threshold and it was observed in at
//! least two seasons.

use serde::Serialize;
use std::collections::BTreeMap;

use super::stats::{finite_column, mean};
use crate::error::{CoreError, Result};
use crate::models::SalesRecord;

/// Default spread (percent of peak) above which a category is flagged
pub const DEFAULT_SEASONAL_THRESHOLD_PCT: f64 = 15.0;

/// Aggregates for one (season, category) group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonCategoryStats {
    pub seasonality: String,
    pub category: String,
    /// Sum of `price * units_sold`
    pub total_revenue: f64,
    pub total_units_sold: f64,
    pub avg_units_sold: f64,
    pub transaction_count: usize,
    /// Deviation of `avg_units_sold` from the mean of all group averages, in percent
    pub growth_vs_avg: f64,
}

/// Peak/trough summary for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySeasonality {
    pub category: String,
    pub peak_season: String,
    pub peak_avg_units: f64,
    pub trough_season: String,
    pub trough_avg_units: f64,
    /// Distinct seasons the category was observed in
    pub season_count: usize,
    /// `100 * (peak - trough) / peak`, 0 when the peak is 0
    pub variation_pct: f64,
    pub strongly_seasonal: bool,
}

/// One category row of the season pivot, cells aligned with `SeasonalReport::seasons`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotRow {
    pub category: String,
    pub cells: Vec<Option<f64>>,
}

/// Full seasonal analysis output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalReport {
    /// Groups ordered by (season, category)
    pub groups: Vec<SeasonCategoryStats>,
    /// Distinct seasons, sorted
    pub seasons: Vec<String>,
    /// Mean of the per-group average units
    pub overall_avg_units: f64,
    /// Per-category summaries, ordered by category
    pub categories: Vec<CategorySeasonality>,
    pub threshold_pct: f64,
}

impl SeasonalReport {
    /// Categories flagged as strongly seasonal
    pub fn strongly_seasonal(&self) -> impl Iterator<Item = &CategorySeasonality> {
        self.categories.iter().filter(|c| c.strongly_seasonal)
    }

    /// Category with the largest relative spread among those seen in 2+ seasons
    pub fn most_seasonal(&self) -> Option<&CategorySeasonality> {
        self.categories
            .iter()
            .filter(|c| c.season_count >= 2)
            .fold(None, |best: Option<&CategorySeasonality>, c| match best {
                Some(b) if b.variation_pct >= c.variation_pct => Some(b),
                _ => Some(c),
            })
    }

    /// Category x season matrix of a group metric
    pub fn pivot(&self, metric: impl Fn(&SeasonCategoryStats) -> f64) -> Vec<PivotRow> {
        let mut rows: BTreeMap<&str, Vec<Option<f64>>> = BTreeMap::new();
        for group in &self.groups {
            let cells = rows
                .entry(group.category.as_str())
                .or_insert_with(|| vec![None; self.seasons.len()]);
            if let Ok(col) = self.seasons.binary_search(&group.seasonality) {
                cells[col] = Some(metric(group));
            }
        }

        rows.into_iter()
            .map(|(category, cells)| PivotRow {
                category: category.to_string(),
                cells,
            })
            .collect()
    }
}

#[derive(Default)]
struct GroupAggregate {
    revenue: f64,
    units: f64,
    count: usize,
}

/// Group transactions by (season, category)
///
/// Output is ordered by season, then category.
pub fn aggregate_sales(records: &[SalesRecord]) -> Result<Vec<SeasonCategoryStats>> {
    if records.is_empty() {
        return Err(CoreError::empty("seasonal aggregation"));
    }

    let prices = finite_column(records, "inventory", "price", |r| r.price)?;
    let units = finite_column(records, "inventory", "units_sold", |r| r.units_sold)?;

    let mut groups: BTreeMap<(&str, &str), GroupAggregate> = BTreeMap::new();
    for (idx, record) in records.iter().enumerate() {
        let agg = groups
            .entry((record.seasonality.as_str(), record.category.as_str()))
            .or_default();
        agg.revenue += prices[idx] * units[idx];
        agg.units += units[idx];
        agg.count += 1;
    }

    let mut stats: Vec<SeasonCategoryStats> = groups
        .into_iter()
        .map(|((season, category), agg)| SeasonCategoryStats {
            seasonality: season.to_string(),
            category: category.to_string(),
            total_revenue: agg.revenue,
            total_units_sold: agg.units,
            avg_units_sold: agg.units / agg.count as f64,
            transaction_count: agg.count,
            growth_vs_avg: 0.0,
        })
        .collect();

    let averages: Vec<f64> = stats.iter().map(|s| s.avg_units_sold).collect();
    let overall = mean(&averages).unwrap_or(0.0);
    if overall != 0.0 {
        for s in &mut stats {
            s.growth_vs_avg = (s.avg_units_sold - overall) / overall * 100.0;
        }
    }

    Ok(stats)
}

/// Aggregate transactions and summarize seasonality per category
pub fn analyze_seasonality(records: &[SalesRecord], threshold_pct: f64) -> Result<SeasonalReport> {
    let groups = aggregate_sales(records)?;

    let averages: Vec<f64> = groups.iter().map(|g| g.avg_units_sold).collect();
    let overall_avg_units = mean(&averages).unwrap_or(0.0);

    let mut seasons: Vec<String> = groups.iter().map(|g| g.seasonality.clone()).collect();
    seasons.sort();
    seasons.dedup();

    let mut by_category: BTreeMap<&str, Vec<&SeasonCategoryStats>> = BTreeMap::new();
    for group in &groups {
        by_category.entry(group.category.as_str()).or_default().push(group);
    }

    let categories = by_category
        .into_iter()
        .map(|(category, entries)| summarize_category(category, &entries, threshold_pct))
        .collect();

    Ok(SeasonalReport {
        groups,
        seasons,
        overall_avg_units,
        categories,
        threshold_pct,
    })
}

fn summarize_category(
    category: &str,
    entries: &[&SeasonCategoryStats],
    threshold_pct: f64,
) -> CategorySeasonality {
    // entries is non-empty and in season order; first occurrence wins ties
    let mut peak = entries[0];
    let mut trough = entries[0];
    for &entry in &entries[1..] {
        if entry.avg_units_sold > peak.avg_units_sold {
            peak = entry;
        }
        if entry.avg_units_sold < trough.avg_units_sold {
            trough = entry;
        }
    }

    let variation_pct = if peak.avg_units_sold > 0.0 {
        (peak.avg_units_sold - trough.avg_units_sold) / peak.avg_units_sold * 100.0
    } else {
        0.0
    };
    let season_count = entries.len();

    CategorySeasonality {
        category: category.to_string(),
        peak_season: peak.seasonality.clone(),
        peak_avg_units: peak.avg_units_sold,
        trough_season: trough.seasonality.clone(),
        trough_avg_units: trough.avg_units_sold,
        season_count,
        variation_pct,
        strongly_seasonal: season_count >= 2 && variation_pct > threshold_pct,
    }
}

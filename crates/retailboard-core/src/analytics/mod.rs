//! Metrics computation layer
//!
//! Pure, stateless calculators that turn typed table snapshots into
//! decision-ready derived tables: market share, deviation from average,
//! price elasticity, threshold cohorts, seasonal variance, Pareto curves and
//! performance segments. Calling any of them twice with the same input
//! yields identical output.

pub mod insights;
pub mod pareto;
pub mod ranking;
pub mod seasonal;
pub mod segments;
pub mod stats;
pub mod thresholds;
pub mod trend;


pub use pareto::{
    pareto_curve, rank_at_fraction, ParetoCheck, ParetoCurve, ParetoPoint, ParetoStrength,
    DEFAULT_PARETO_FRACTION,
};
pub use ranking::{rank_by_contribution, top_n, RankedRow, Ranking, SortOrder};
pub use seasonal::{
    aggregate_sales, analyze_seasonality, CategorySeasonality, PivotRow, SeasonCategoryStats,
    SeasonalReport, DEFAULT_SEASONAL_THRESHOLD_PCT,
};
pub use segments::{segment_performance, Cohort, Segmentation, DEFAULT_COHORT_CAP};
pub use stats::{mean, median, quantile, ColumnSummary};
pub use thresholds::{
    above_both_medians, classify, select_both, Classification, CompoundSelection, CutPoints,
    ThresholdLabel, ThresholdMode,
};
pub use trend::LinearTrend;

//! Dashboard sections
//!
//! Each section is one request-scoped computation: the store loads the typed
//! tables a section needs into a [`SectionInput`], and [`compute`] applies
//! the section's calculator chain. `compute` is pure; calling it again with
//! the same input gives the same report.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::analytics::{
    above_both_medians, analyze_seasonality, insights, pareto_curve, rank_by_contribution,
    segment_performance, top_n, CompoundSelection, LinearTrend, ParetoCheck, ParetoCurve,
    Ranking, SeasonalReport, Segmentation, SortOrder,
};
use crate::config::AnalyticsConfig;
use crate::error::{CoreError, Result};
use crate::models::{
    CategoryRow, ParetoRow, PricePoint, RevenueRiskRow, SalesRecord, ScoredProductRow, StoreRow,
    TopRevenueRow, TopSellerRow,
};

/// Dashboard section selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    CategoryAnalytics,
    StoreAnalytics,
    ProductPerformance,
    SeasonalGrowth,
    Pareto,
    PerformanceRanking,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::CategoryAnalytics,
        Section::StoreAnalytics,
        Section::ProductPerformance,
        Section::SeasonalGrowth,
        Section::Pareto,
        Section::PerformanceRanking,
    ];

    /// Heading shown above the section
    pub fn title(&self) -> &'static str {
        match self {
            Section::CategoryAnalytics => "Category Performance - Which Categories Drive Revenue?",
            Section::StoreAnalytics => "Store Performance - Which Stores Need Attention?",
            Section::ProductPerformance => "Product Performance - Price Elasticity & Top Performers",
            Section::SeasonalGrowth => "Seasonal Growth - Which Seasons Drive Each Category?",
            Section::Pareto => "Pareto Analysis - The 80/20 Rule",
            Section::PerformanceRanking => "Performance Score - Star Products & Underperformers",
        }
    }

    /// Short name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Section::CategoryAnalytics => "category",
            Section::StoreAnalytics => "store",
            Section::ProductPerformance => "products",
            Section::SeasonalGrowth => "seasonal",
            Section::Pareto => "pareto",
            Section::PerformanceRanking => "performance",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Section::ALL
            .into_iter()
            .find(|section| section.name() == s)
            .ok_or_else(|| CoreError::InvalidArgument {
                name: "section",
                reason: format!("unknown section '{}'", s),
            })
    }
}

/// Typed tables for one section
#[derive(Debug, Clone)]
pub enum SectionInput {
    CategoryAnalytics(Arc<Vec<CategoryRow>>),
    StoreAnalytics(Arc<Vec<StoreRow>>),
    ProductPerformance {
        top_sellers: Arc<Vec<TopSellerRow>>,
        top_revenue: Arc<Vec<TopRevenueRow>>,
        price_points: Arc<Vec<PricePoint>>,
        revenue_risk: Arc<Vec<RevenueRiskRow>>,
    },
    SeasonalGrowth(Arc<Vec<SalesRecord>>),
    Pareto(Arc<Vec<ParetoRow>>),
    PerformanceRanking(Arc<Vec<ScoredProductRow>>),
}

impl SectionInput {
    pub fn section(&self) -> Section {
        match self {
            SectionInput::CategoryAnalytics(_) => Section::CategoryAnalytics,
            SectionInput::StoreAnalytics(_) => Section::StoreAnalytics,
            SectionInput::ProductPerformance { .. } => Section::ProductPerformance,
            SectionInput::SeasonalGrowth(_) => Section::SeasonalGrowth,
            SectionInput::Pareto(_) => Section::Pareto,
            SectionInput::PerformanceRanking(_) => Section::PerformanceRanking,
        }
    }
}

/// Price elasticity, top lists and high-risk products
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPerformance {
    /// Highest units sold, largest first
    pub top_sellers: Vec<TopSellerRow>,
    /// Highest revenue, largest first
    pub top_revenue: Vec<TopRevenueRow>,
    /// Units sold as a linear function of price
    pub elasticity: LinearTrend,
    /// Revenue and stock risk both above their medians
    pub high_risk_high_revenue: CompoundSelection<RevenueRiskRow>,
}

/// Pareto curve with the top-fraction check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParetoAnalysis {
    pub curve: ParetoCurve<ParetoRow>,
    pub check: ParetoCheck,
}

/// Derived output of one section
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "section", content = "report", rename_all = "snake_case")]
pub enum SectionReport {
    CategoryAnalytics(Ranking<CategoryRow>),
    StoreAnalytics(Ranking<StoreRow>),
    ProductPerformance(ProductPerformance),
    SeasonalGrowth(SeasonalReport),
    Pareto(ParetoAnalysis),
    PerformanceRanking(Segmentation),
}

impl SectionReport {
    pub fn section(&self) -> Section {
        match self {
            SectionReport::CategoryAnalytics(_) => Section::CategoryAnalytics,
            SectionReport::StoreAnalytics(_) => Section::StoreAnalytics,
            SectionReport::ProductPerformance(_) => Section::ProductPerformance,
            SectionReport::SeasonalGrowth(_) => Section::SeasonalGrowth,
            SectionReport::Pareto(_) => Section::Pareto,
            SectionReport::PerformanceRanking(_) => Section::PerformanceRanking,
        }
    }

    /// Rule-based recommendations for this report
    pub fn insights(&self) -> Vec<String> {
        match self {
            SectionReport::CategoryAnalytics(r) => insights::category_insights(r),
            SectionReport::StoreAnalytics(r) => insights::store_insights(r),
            SectionReport::ProductPerformance(p) => {
                insights::product_insights(&p.elasticity, &p.high_risk_high_revenue)
            }
            SectionReport::SeasonalGrowth(r) => insights::seasonal_insights(r),
            SectionReport::Pareto(p) => insights::pareto_insights(&p.check),
            SectionReport::PerformanceRanking(s) => insights::segment_insights(s),
        }
    }
}

/// Apply a section's calculator chain
pub fn compute(input: &SectionInput, options: &AnalyticsConfig) -> Result<SectionReport> {
    let report = match input {
        SectionInput::CategoryAnalytics(rows) => {
            SectionReport::CategoryAnalytics(rank_by_contribution(rows, "category_performance")?)
        }
        SectionInput::StoreAnalytics(rows) => {
            SectionReport::StoreAnalytics(rank_by_contribution(rows, "store_performance")?)
        }
        SectionInput::ProductPerformance {
            top_sellers,
            top_revenue,
            price_points,
            revenue_risk,
        } => {
            let prices: Vec<f64> = price_points.iter().map(|p| p.price).collect();
            let units: Vec<f64> = price_points.iter().map(|p| p.units_sold).collect();

            SectionReport::ProductPerformance(ProductPerformance {
                top_sellers: top_n(top_sellers, options.top_n, SortOrder::Descending, "top_sellers")?,
                top_revenue: top_n(
                    top_revenue,
                    options.top_n,
                    SortOrder::Descending,
                    "top_revenue_products",
                )?,
                elasticity: LinearTrend::fit(&prices, &units)?,
                high_risk_high_revenue: above_both_medians(
                    revenue_risk,
                    ("revenue", |r: &RevenueRiskRow| r.revenue),
                    ("stock_risk", |r: &RevenueRiskRow| r.stock_risk),
                )?,
            })
        }
        SectionInput::SeasonalGrowth(records) => SectionReport::SeasonalGrowth(
            analyze_seasonality(records, options.seasonal_threshold_pct)?,
        ),
        SectionInput::Pareto(rows) => {
            let curve = pareto_curve(rows, "revenue_curve")?;
            let check = curve.check(options.pareto_fraction)?;
            SectionReport::Pareto(ParetoAnalysis { curve, check })
        }
        SectionInput::PerformanceRanking(rows) => {
            SectionReport::PerformanceRanking(segment_performance(rows, options.cohort_cap)?)
        }
    };

    tracing::debug!(section = %input.section(), "Section computed");
    Ok(report)
}

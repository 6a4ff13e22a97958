//! Typed rows for every table the dashboard consumes
//!
//! Each struct mirrors one upstream view or raw inventory query. Rows are
//! validated when they are read from the store, so the metrics layer only
//! ever sees well-typed snapshots.

use serde::{Deserialize, Serialize};

/// Row of the `category_performance` view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub category: String,
    pub total_revenue: f64,
    pub total_units_sold: f64,
}

/// Row of the `store_performance` view
///
/// The upstream view keys stores by its first column, which may be text or an
/// integer; the store normalizes it to a string label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRow {
    pub store_id: String,
    pub total_revenue: f64,
    pub total_units_sold: f64,
}

/// Row of the `top_sellers` view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopSellerRow {
    pub product_id: String,
    pub product_name: String,
    pub units_sold: f64,
}

/// Row of the `top_revenue_products` view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopRevenueRow {
    pub product_id: String,
    pub product_name: String,
    pub revenue: f64,
}

/// Raw inventory sample for price elasticity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: f64,
    pub units_sold: f64,
    pub category: String,
    pub revenue: f64,
}

/// Raw inventory sample for revenue vs stock risk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRiskRow {
    pub product_id: String,
    pub category: String,
    pub revenue: f64,
    pub stock_risk: f64,
}

/// Transaction-level record used for seasonal grouping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub seasonality: String,
    pub category: String,
    pub price: f64,
    pub units_sold: f64,
}

/// Row of the `revenue_curve` view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoRow {
    pub product_id: String,
    pub product_name: String,
    pub revenue: f64,
}

/// Row of the `performance_ranked` view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProductRow {
    pub product_id: String,
    pub product_name: String,
    pub performance_score: f64,
    pub revenue: f64,
}

/// Row counts of the opaque upstream views (clustering, stock risk scoring)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCounts {
    pub category_performance: usize,
    pub store_performance: usize,
    pub top_sellers: usize,
    pub top_revenue_products: usize,
    pub cluster_summary: usize,
    pub stock_risk_dashboard: usize,
    pub revenue_curve: usize,
    pub performance_ranked: usize,
}

/// A row with a labeled, non-negative contribution to some total
///
/// Implemented by every table that can be ranked or fed to the Pareto curve.
pub trait Contribution {
    /// Entity label (category, store, product)
    fn label(&self) -> &str;

    /// Numeric contribution (revenue, units)
    fn contribution(&self) -> f64;
}

impl Contribution for CategoryRow {
    fn label(&self) -> &str {
        &self.category
    }

    fn contribution(&self) -> f64 {
        self.total_revenue
    }
}

impl Contribution for StoreRow {
    fn label(&self) -> &str {
        &self.store_id
    }

    fn contribution(&self) -> f64 {
        self.total_revenue
    }
}

impl Contribution for TopSellerRow {
    fn label(&self) -> &str {
        &self.product_name
    }

    fn contribution(&self) -> f64 {
        self.units_sold
    }
}

impl Contribution for TopRevenueRow {
    fn label(&self) -> &str {
        &self.product_name
    }

    fn contribution(&self) -> f64 {
        self.revenue
    }
}

impl Contribution for ParetoRow {
    fn label(&self) -> &str {
        &self.product_id
    }

    fn contribution(&self) -> f64 {
        self.revenue
    }
}

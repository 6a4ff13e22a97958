//! Data store over the retail SQLite database
//!
//! Loads typed table snapshots for each dashboard section. A connection is
//! opened per load and dropped when the load returns. Query results are
//! memoized by their exact SQL text in a moka cache, so repeated section
//! loads within the TTL skip the database.

use moka::sync::Cache;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row};
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::{CoreError, Result};
use crate::models::{
    CategoryRow, ParetoRow, PricePoint, RevenueRiskRow, SalesRecord, ScoredProductRow, StoreRow,
    TopRevenueRow, TopSellerRow, ViewCounts,
};
use crate::sections::{Section, SectionInput};

/// Memoized query result, downcast back to `Vec<T>` on hit
type Snapshot = Arc<dyn Any + Send + Sync>;

/// Views counted by [`DataStore::view_counts`]
const VIEWS: [&str; 8] = [
    "category_performance",
    "store_performance",
    "top_sellers",
    "top_revenue_products",
    "cluster_summary",
    "stock_risk_dashboard",
    "revenue_curve",
    "performance_ranked",
];

/// Read-only access to the retail database
pub struct DataStore {
    config: StoreConfig,
    cache: Cache<String, Snapshot>,
}

impl DataStore {
    pub fn new(config: StoreConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(config.cache_ttl())
            .build();

        Self { config, cache }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Drop every memoized result
    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
        debug!("Query cache cleared");
    }

    /// Fetch the tables one section needs
    pub fn load_section(&self, section: Section) -> Result<SectionInput> {
        let mut conn = None;
        let limit = self.config.row_limit;

        let input = match section {
            Section::CategoryAnalytics => SectionInput::CategoryAnalytics(self.fetch(
                &mut conn,
                "category_performance",
                "SELECT * FROM category_performance",
            )?),
            Section::StoreAnalytics => SectionInput::StoreAnalytics(self.fetch(
                &mut conn,
                "store_performance",
                "SELECT * FROM store_performance",
            )?),
            Section::ProductPerformance => SectionInput::ProductPerformance {
                top_sellers: self.fetch(&mut conn, "top_sellers", "SELECT * FROM top_sellers")?,
                top_revenue: self.fetch(
                    &mut conn,
                    "top_revenue_products",
                    "SELECT * FROM top_revenue_products",
                )?,
                price_points: self.fetch(
                    &mut conn,
                    "inventory",
                    &format!(
                        "SELECT price, units_sold, category, revenue FROM inventory \
                         WHERE price IS NOT NULL AND units_sold IS NOT NULL \
                         AND category IS NOT NULL AND revenue IS NOT NULL LIMIT {}",
                        limit
                    ),
                )?,
                revenue_risk: self.fetch(
                    &mut conn,
                    "inventory",
                    &format!(
                        "SELECT revenue, stock_risk, category, product_id FROM inventory \
                         WHERE revenue IS NOT NULL AND stock_risk IS NOT NULL \
                         AND category IS NOT NULL AND product_id IS NOT NULL LIMIT {}",
                        limit
                    ),
                )?,
            },
            Section::SeasonalGrowth => SectionInput::SeasonalGrowth(self.fetch(
                &mut conn,
                "inventory",
                "SELECT seasonality, category, price, units_sold FROM inventory \
                 WHERE seasonality IS NOT NULL AND category IS NOT NULL \
                 AND price IS NOT NULL AND units_sold IS NOT NULL",
            )?),
            Section::Pareto => SectionInput::Pareto(self.fetch(
                &mut conn,
                "revenue_curve",
                "SELECT * FROM revenue_curve",
            )?),
            Section::PerformanceRanking => SectionInput::PerformanceRanking(self.fetch(
                &mut conn,
                "performance_ranked",
                "SELECT * FROM performance_ranked",
            )?),
        };

        info!(section = %section, opened_connection = conn.is_some(), "Section loaded");
        Ok(input)
    }

    /// Row counts of every upstream view
    pub fn view_counts(&self) -> Result<ViewCounts> {
        let conn = self.connect()?;
        let count = |view: &str| -> Result<usize> {
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", view), [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|n| n.max(0) as usize)
            .map_err(|source| CoreError::Database {
                view: view.to_string(),
                source,
            })
        };

        Ok(ViewCounts {
            category_performance: count(VIEWS[0])?,
            store_performance: count(VIEWS[1])?,
            top_sellers: count(VIEWS[2])?,
            top_revenue_products: count(VIEWS[3])?,
            cluster_summary: count(VIEWS[4])?,
            stock_risk_dashboard: count(VIEWS[5])?,
            revenue_curve: count(VIEWS[6])?,
            performance_ranked: count(VIEWS[7])?,
        })
    }

    fn connect(&self) -> Result<Connection> {
        let path = &self.config.database_path;
        debug!(path = %path.display(), "Opening database connection");
        Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| CoreError::Database {
            view: path.display().to_string(),
            source,
        })
    }

    /// Memoized query; opens the connection on the first cache miss
    fn fetch<T: FromViewRow>(
        &self,
        slot: &mut Option<Connection>,
        view: &str,
        sql: &str,
    ) -> Result<Arc<Vec<T>>> {
        if let Some(snapshot) = self.cache.get(sql) {
            if let Ok(rows) = snapshot.downcast::<Vec<T>>() {
                debug!(view, rows = rows.len(), "Cache hit");
                return Ok(rows);
            }
        }
        debug!(view, "Cache miss");

        let conn = match slot.take() {
            Some(conn) => conn,
            None => self.connect()?,
        };
        let result = query_rows::<T>(&conn, view, sql);
        *slot = Some(conn);

        let rows = Arc::new(result?);
        let snapshot: Snapshot = rows.clone();
        self.cache.insert(sql.to_string(), snapshot);

        debug!(view, rows = rows.len(), "Query executed");
        Ok(rows)
    }
}

fn query_rows<T: FromViewRow>(conn: &Connection, view: &str, sql: &str) -> Result<Vec<T>> {
    let db_error = |source| CoreError::Database {
        view: view.to_string(),
        source,
    };

    let mut stmt = conn.prepare(sql).map_err(db_error)?;
    let mut rows = stmt.query([]).map_err(db_error)?;

    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(db_error)? {
        out.push(T::from_row(row, view)?);
    }
    Ok(out)
}

// ============================================================================
// Row decoding
// ============================================================================

/// Decode one result row into a typed model, validating column presence and type
trait FromViewRow: Sized + Send + Sync + 'static {
    fn from_row(row: &Row<'_>, view: &str) -> Result<Self>;
}

fn column_error(view: &str, column: &str, err: rusqlite::Error) -> CoreError {
    match err {
        rusqlite::Error::InvalidColumnName(_) => {
            CoreError::invalid_column(view, column, "column is missing")
        }
        rusqlite::Error::InvalidColumnType(_, _, ty) => {
            CoreError::invalid_column(view, column, format!("unexpected {} value", ty))
        }
        rusqlite::Error::InvalidColumnIndex(idx) => {
            CoreError::invalid_column(view, column, format!("no column at index {}", idx))
        }
        source => CoreError::Database {
            view: view.to_string(),
            source,
        },
    }
}

fn real(row: &Row<'_>, view: &str, column: &str) -> Result<f64> {
    row.get::<_, f64>(column)
        .map_err(|e| column_error(view, column, e))
}

/// Text label; integer keys are accepted and rendered in decimal
fn label(value: ValueRef<'_>, view: &str, column: &str) -> Result<String> {
    match value {
        ValueRef::Text(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Integer(n) => Ok(n.to_string()),
        other => Err(CoreError::invalid_column(
            view,
            column,
            format!("expected TEXT or INTEGER, got {}", other.data_type()),
        )),
    }
}

fn text(row: &Row<'_>, view: &str, column: &str) -> Result<String> {
    let value = row
        .get_ref(column)
        .map_err(|e| column_error(view, column, e))?;
    label(value, view, column)
}

impl FromViewRow for CategoryRow {
    fn from_row(row: &Row<'_>, view: &str) -> Result<Self> {
        Ok(Self {
            category: text(row, view, "category")?,
            total_revenue: real(row, view, "total_revenue")?,
            total_units_sold: real(row, view, "total_units_sold")?,
        })
    }
}

impl FromViewRow for StoreRow {
    fn from_row(row: &Row<'_>, view: &str) -> Result<Self> {
        // The view keys stores by its first column, whatever its name
        let id = row.get_ref(0).map_err(|e| column_error(view, "0", e))?;
        Ok(Self {
            store_id: label(id, view, "store identifier")?,
            total_revenue: real(row, view, "total_revenue")?,
            total_units_sold: real(row, view, "total_units_sold")?,
        })
    }
}

impl FromViewRow for TopSellerRow {
    fn from_row(row: &Row<'_>, view: &str) -> Result<Self> {
        Ok(Self {
            product_id: text(row, view, "product_id")?,
            product_name: text(row, view, "product_name")?,
            units_sold: real(row, view, "units_sold")?,
        })
    }
}

impl FromViewRow for TopRevenueRow {
    fn from_row(row: &Row<'_>, view: &str) -> Result<Self> {
        Ok(Self {
            product_id: text(row, view, "product_id")?,
            product_name: text(row, view, "product_name")?,
            revenue: real(row, view, "revenue")?,
        })
    }
}

impl FromViewRow for PricePoint {
    fn from_row(row: &Row<'_>, view: &str) -> Result<Self> {
        Ok(Self {
            price: real(row, view, "price")?,
            units_sold: real(row, view, "units_sold")?,
            category: text(row, view, "category")?,
            revenue: real(row, view, "revenue")?,
        })
    }
}

impl FromViewRow for RevenueRiskRow {
    fn from_row(row: &Row<'_>, view: &str) -> Result<Self> {
        Ok(Self {
            product_id: text(row, view, "product_id")?,
            category: text(row, view, "category")?,
            revenue: real(row, view, "revenue")?,
            stock_risk: real(row, view, "stock_risk")?,
        })
    }
}

impl FromViewRow for SalesRecord {
    fn from_row(row: &Row<'_>, view: &str) -> Result<Self> {
        Ok(Self {
            seasonality: text(row, view, "seasonality")?,
            category: text(row, view, "category")?,
            price: real(row, view, "price")?,
            units_sold: real(row, view, "units_sold")?,
        })
    }
}

impl FromViewRow for ParetoRow {
    fn from_row(row: &Row<'_>, view: &str) -> Result<Self> {
        Ok(Self {
            product_id: text(row, view, "product_id")?,
            product_name: text(row, view, "product_name")?,
            revenue: real(row, view, "revenue")?,
        })
    }
}

impl FromViewRow for ScoredProductRow {
    fn from_row(row: &Row<'_>, view: &str) -> Result<Self> {
        Ok(Self {
            product_id: text(row, view, "product_id")?,
            product_name: text(row, view, "product_name")?,
            performance_score: real(row, view, "performance_score")?,
            revenue: real(row, view, "revenue")?,
        })
    }
}

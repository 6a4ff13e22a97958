//! Integration tests for the data store against a real SQLite file
//!
//! Each test builds a small retail database in a tempdir. The upstream views
//! are plain tables here; the store only ever reads them with SELECT.
//!
//! Run with:
//! ```bash
//! cargo test --test store_integration
//! ```

use retailboard_core::{
    compute, AnalyticsConfig, CoreError, DataStore, Section, SectionInput, SectionReport,
    StoreConfig,
};
use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;

const SCHEMA: &str = "
CREATE TABLE inventory (
    product_id TEXT, product_name TEXT, category TEXT, seasonality TEXT,
    price REAL, units_sold REAL, revenue REAL, stock_risk REAL
);
CREATE TABLE category_performance (category TEXT, total_revenue REAL, total_units_sold REAL);
CREATE TABLE store_performance (store INTEGER, total_revenue REAL, total_units_sold REAL);
CREATE TABLE top_sellers (product_id TEXT, product_name TEXT, units_sold REAL);
CREATE TABLE top_revenue_products (product_id TEXT, product_name TEXT, revenue REAL);
CREATE TABLE cluster_summary (cluster INTEGER, size INTEGER);
CREATE TABLE stock_risk_dashboard (product_id TEXT, stock_risk REAL);
CREATE TABLE revenue_curve (product_id TEXT, product_name TEXT, revenue REAL);
CREATE TABLE performance_ranked (
    product_id TEXT, product_name TEXT, performance_score REAL, revenue REAL
);
";

fn seed(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();

    conn.execute_batch(
        "INSERT INTO category_performance VALUES
            ('Electronics', 600.0, 30.0), ('Groceries', 300.0, 90.0), ('Toys', 100.0, 10.0);
         INSERT INTO store_performance VALUES (1, 1250.0, 10.0), (2, 2000.0, 20.0), (3, 2750.0, 30.0);
         INSERT INTO cluster_summary VALUES (0, 4), (1, 6);
         INSERT INTO stock_risk_dashboard VALUES ('P1', 0.5);",
    )
    .unwrap();

    let seasons = ["Winter", "Summer"];
    for i in 1..=10 {
        let price = i as f64;
        let units = 100.0 - 5.0 * price;
        let revenue = price * units;
        conn.execute(
            "INSERT INTO inventory VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                format!("P{}", i),
                format!("Product {}", i),
                if i % 2 == 0 { "Toys" } else { "Groceries" },
                seasons[i % 2],
                price,
                units,
                revenue,
                (i % 4) as f64 / 4.0,
            ],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO top_sellers VALUES (?1, ?2, ?3)",
            rusqlite::params![format!("P{}", i), format!("Product {}", i), units],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO top_revenue_products VALUES (?1, ?2, ?3)",
            rusqlite::params![format!("P{}", i), format!("Product {}", i), revenue],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO performance_ranked VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                format!("P{}", i),
                format!("Product {}", i),
                (i * 10) as f64,
                revenue
            ],
        )
        .unwrap();
    }

    // 80/20 by construction: two products carry 80 of 100
    conn.execute_batch(
        "INSERT INTO revenue_curve VALUES
            ('A', 'Alpha', 50.0), ('B', 'Beta', 30.0),
            ('C', 'Gamma', 4.0), ('D', 'Delta', 4.0), ('E', 'Epsilon', 3.0),
            ('F', 'Zeta', 3.0), ('G', 'Eta', 2.0), ('H', 'Theta', 2.0),
            ('I', 'Iota', 1.0), ('J', 'Kappa', 1.0);",
    )
    .unwrap();
}

fn setup() -> (TempDir, DataStore) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("retail.db");
    seed(&path);

    let store = DataStore::new(StoreConfig {
        database_path: path,
        ..StoreConfig::default()
    });
    (dir, store)
}

#[test]
fn test_load_category_section() {
    let (_dir, store) = setup();

    let input = store.load_section(Section::CategoryAnalytics).unwrap();
    let SectionInput::CategoryAnalytics(rows) = &input else {
        panic!("wrong input variant");
    };
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].category, "Electronics");
    assert_eq!(rows[0].total_revenue, 600.0);
}

#[test]
fn test_store_ids_read_from_integer_first_column() {
    let (_dir, store) = setup();

    let input = store.load_section(Section::StoreAnalytics).unwrap();
    let report = compute(&input, &AnalyticsConfig::default()).unwrap();
    let SectionReport::StoreAnalytics(ranking) = report else {
        panic!("wrong report variant");
    };

    assert_eq!(ranking.top().unwrap().row.store_id, "3");
    assert_eq!(ranking.summary.mean, 2000.0);
    let at_mean = ranking.rows.iter().find(|r| r.row.store_id == "2").unwrap();
    assert_eq!(at_mean.vs_avg_pct, 0.0);
}

#[test]
fn test_cached_result_survives_dropped_table_until_cleared() {
    let (dir, store) = setup();
    store.load_section(Section::CategoryAnalytics).unwrap();

    let writer = Connection::open(dir.path().join("retail.db")).unwrap();
    writer
        .execute_batch("DROP TABLE category_performance")
        .unwrap();
    drop(writer);

    // Same SQL text, served from the memo
    assert!(store.load_section(Section::CategoryAnalytics).is_ok());

    store.clear_cache();
    let err = store.load_section(Section::CategoryAnalytics).unwrap_err();
    assert!(matches!(err, CoreError::Database { .. }));
}

#[test]
fn test_missing_column_maps_to_invalid_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("retail.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE revenue_curve (product_id TEXT, product_name TEXT);
         INSERT INTO revenue_curve VALUES ('A', 'Alpha');",
    )
    .unwrap();
    drop(conn);

    let store = DataStore::new(StoreConfig {
        database_path: path,
        ..StoreConfig::default()
    });
    let err = store.load_section(Section::Pareto).unwrap_err();
    match err {
        CoreError::InvalidColumn { table, column, .. } => {
            assert_eq!(table, "revenue_curve");
            assert_eq!(column, "revenue");
        }
        other => panic!("expected InvalidColumn, got {:?}", other),
    }
}

#[test]
fn test_null_measure_maps_to_invalid_column() {
    let (dir, store) = setup();
    let writer = Connection::open(dir.path().join("retail.db")).unwrap();
    writer
        .execute_batch("INSERT INTO category_performance VALUES ('Garden', NULL, 4.0)")
        .unwrap();
    drop(writer);

    let err = store.load_section(Section::CategoryAnalytics).unwrap_err();
    assert!(matches!(err, CoreError::InvalidColumn { ref column, .. } if column == "total_revenue"));
}

#[test]
fn test_missing_database_is_database_error() {
    let dir = TempDir::new().unwrap();
    let store = DataStore::new(StoreConfig {
        database_path: dir.path().join("absent.db"),
        ..StoreConfig::default()
    });

    let err = store.load_section(Section::Pareto).unwrap_err();
    assert!(matches!(err, CoreError::Database { .. }));
}

#[test]
fn test_row_limit_caps_raw_inventory_samples() {
    let (dir, _) = setup();
    let store = DataStore::new(StoreConfig {
        database_path: dir.path().join("retail.db"),
        row_limit: 4,
        ..StoreConfig::default()
    });

    let input = store.load_section(Section::ProductPerformance).unwrap();
    let SectionInput::ProductPerformance {
        price_points,
        revenue_risk,
        top_sellers,
        ..
    } = &input
    else {
        panic!("wrong input variant");
    };
    assert_eq!(price_points.len(), 4);
    assert_eq!(revenue_risk.len(), 4);
    assert_eq!(top_sellers.len(), 10);

    // Seasonal aggregates read the whole table
    let input = store.load_section(Section::SeasonalGrowth).unwrap();
    let SectionInput::SeasonalGrowth(records) = &input else {
        panic!("wrong input variant");
    };
    assert_eq!(records.len(), 10);
}

#[test]
fn test_view_counts() {
    let (_dir, store) = setup();
    let counts = store.view_counts().unwrap();

    assert_eq!(counts.category_performance, 3);
    assert_eq!(counts.store_performance, 3);
    assert_eq!(counts.top_sellers, 10);
    assert_eq!(counts.top_revenue_products, 10);
    assert_eq!(counts.cluster_summary, 2);
    assert_eq!(counts.stock_risk_dashboard, 1);
    assert_eq!(counts.revenue_curve, 10);
    assert_eq!(counts.performance_ranked, 10);
}

// ============================================================================
// End-to-end section computation
// ============================================================================

#[test]
fn test_every_section_computes() {
    let (_dir, store) = setup();
    let options = AnalyticsConfig::default();

    for section in Section::ALL {
        let input = store.load_section(section).unwrap();
        let report = compute(&input, &options).unwrap();
        assert_eq!(report.section(), section);
        assert!(!report.insights().is_empty(), "{} has no insights", section);
    }
}

#[test]
fn test_product_section_recovers_price_elasticity() {
    let (_dir, store) = setup();
    let options = AnalyticsConfig {
        top_n: 3,
        ..AnalyticsConfig::default()
    };

    let input = store.load_section(Section::ProductPerformance).unwrap();
    let SectionReport::ProductPerformance(products) = compute(&input, &options).unwrap() else {
        panic!("wrong report variant");
    };

    // units = 100 - 5 * price exactly
    assert!((products.elasticity.slope + 5.0).abs() < 1e-9);
    assert!((products.elasticity.intercept - 100.0).abs() < 1e-9);
    assert!((products.elasticity.r_squared - 1.0).abs() < 1e-9);

    assert_eq!(products.top_sellers.len(), 3);
    assert_eq!(products.top_sellers[0].product_id, "P1");
    assert!(products
        .top_revenue
        .windows(2)
        .all(|w| w[0].revenue >= w[1].revenue));
}

#[test]
fn test_pareto_section_finds_strong_effect() {
    let (_dir, store) = setup();

    let input = store.load_section(Section::Pareto).unwrap();
    let SectionReport::Pareto(pareto) = compute(&input, &AnalyticsConfig::default()).unwrap()
    else {
        panic!("wrong report variant");
    };

    assert_eq!(pareto.check.rank_index, 1);
    assert_eq!(pareto.check.entity_count, 2);
    assert!((pareto.check.cumulative_percentage - 80.0).abs() < 1e-9);
    assert_eq!(pareto.curve.points[0].row.product_id, "A");
}

#[test]
fn test_performance_section_reference_quartiles() {
    let (_dir, store) = setup();

    let input = store.load_section(Section::PerformanceRanking).unwrap();
    let SectionReport::PerformanceRanking(segments) =
        compute(&input, &AnalyticsConfig::default()).unwrap()
    else {
        panic!("wrong report variant");
    };

    assert_eq!(segments.p25, 32.5);
    assert_eq!(segments.p75, 77.5);
    assert_eq!(segments.stars.len(), 3);
    assert_eq!(segments.underperformers.len(), 3);
    assert_eq!(segments.stars.products[0].performance_score, 100.0);
    assert_eq!(segments.underperformers.products[0].performance_score, 10.0);
}

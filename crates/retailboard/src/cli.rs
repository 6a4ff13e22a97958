//! Terminal rendering for section reports
//!
//! Every report renders either as pretty JSON or as comfy-table tables
//! followed by its insights.

use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use retailboard_core::analytics::insights::format_money;
use retailboard_core::analytics::{ParetoPoint, Ranking, SeasonalReport};
use retailboard_core::models::{Contribution, ParetoRow, ScoredProductRow, ViewCounts};
use retailboard_core::{ParetoAnalysis, ProductPerformance, Section, SectionReport};
use serde::Serialize;

// ============================================================================
// Entry Points
// ============================================================================

/// Format one section report (human or JSON)
pub fn format_report(report: &SectionReport, json: bool, no_color: bool) -> String {
    if json {
        return to_json(report);
    }

    let body = match report {
        SectionReport::CategoryAnalytics(ranking) => {
            ranking_table(ranking, "Category", "Revenue", no_color)
        }
        SectionReport::StoreAnalytics(ranking) => {
            ranking_table(ranking, "Store", "Revenue", no_color)
        }
        SectionReport::ProductPerformance(products) => format_products(products, no_color),
        SectionReport::SeasonalGrowth(seasonal) => format_seasonal(seasonal, no_color),
        SectionReport::Pareto(pareto) => format_pareto(pareto, no_color),
        SectionReport::PerformanceRanking(segments) => {
            let mut lines = vec![format!(
                "Quartiles: P25 = {:.1}, P75 = {:.1}",
                segments.p25, segments.p75
            )];
            lines.push(String::new());
            lines.push(format!(
                "Star products ({} of {} qualifying)",
                segments.stars.len(),
                segments.stars.qualifying
            ));
            lines.push(scored_table(&segments.stars.products, no_color));
            lines.push(String::new());
            lines.push(format!(
                "Underperformers ({} of {} qualifying)",
                segments.underperformers.len(),
                segments.underperformers.qualifying
            ));
            lines.push(scored_table(&segments.underperformers.products, no_color));
            lines.join("\n")
        }
    };

    let mut out = vec![report.section().title().to_string(), String::new(), body];
    let insights = report.insights();
    if !insights.is_empty() {
        out.push(String::new());
        out.push("Insights:".to_string());
        out.extend(insights.iter().map(|line| format!("  - {}", line)));
    }
    out.join("\n")
}

/// Shown in place of a section whose input had no rows
pub fn format_no_data(section: Section, json: bool) -> String {
    if json {
        return to_json(&serde_json::json!({ "section": section, "report": null }));
    }
    format!("{}\n\nNo data for this section", section.title())
}

/// Row counts of every upstream view (human or JSON)
pub fn format_overview(counts: &ViewCounts, json: bool, no_color: bool) -> String {
    if json {
        return to_json(counts);
    }

    let mut table = new_table(&["View", "Rows"], no_color);
    let rows = [
        ("category_performance", counts.category_performance),
        ("store_performance", counts.store_performance),
        ("top_sellers", counts.top_sellers),
        ("top_revenue_products", counts.top_revenue_products),
        ("cluster_summary", counts.cluster_summary),
        ("stock_risk_dashboard", counts.stock_risk_dashboard),
        ("revenue_curve", counts.revenue_curve),
        ("performance_ranked", counts.performance_ranked),
    ];
    for (view, count) in rows {
        table.add_row(Row::from(vec![view.to_string(), count.to_string()]));
    }

    format!("Retail Analytics Overview\n\n{}", table)
}

// ============================================================================
// Section Formatters
// ============================================================================

fn ranking_table<T: Contribution>(
    ranking: &Ranking<T>,
    label_header: &str,
    value_header: &str,
    no_color: bool,
) -> String {
    let mut table = new_table(
        &["#", label_header, value_header, "Share", "vs Avg"],
        no_color,
    );

    for ranked in &ranking.rows {
        let deviation = format!("{:+.1}%", ranked.vs_avg_pct);
        let deviation_cell = if no_color {
            Cell::new(deviation)
        } else if ranked.vs_avg_pct < 0.0 {
            Cell::new(deviation).fg(Color::Red)
        } else {
            Cell::new(deviation).fg(Color::Green)
        };

        table.add_row(Row::from(vec![
            Cell::new(ranked.rank),
            Cell::new(ranked.row.label()),
            Cell::new(format_money(ranked.row.contribution())),
            Cell::new(format!("{:.1}%", ranked.share_pct)),
            deviation_cell,
        ]));
    }

    format!(
        "{}\n{} rows | total {} | avg {}",
        table,
        ranking.summary.count,
        format_money(ranking.summary.total),
        format_money(ranking.summary.mean)
    )
}

fn format_products(products: &ProductPerformance, no_color: bool) -> String {
    let mut sellers = new_table(&["#", "Product", "Units Sold"], no_color);
    for (i, row) in products.top_sellers.iter().enumerate() {
        sellers.add_row(Row::from(vec![
            (i + 1).to_string(),
            truncate(&row.product_name, 40),
            format!("{:.0}", row.units_sold),
        ]));
    }

    let mut earners = new_table(&["#", "Product", "Revenue"], no_color);
    for (i, row) in products.top_revenue.iter().enumerate() {
        earners.add_row(Row::from(vec![
            (i + 1).to_string(),
            truncate(&row.product_name, 40),
            format_money(row.revenue),
        ]));
    }

    let trend = &products.elasticity;
    let [(x0, y0), (x1, y1)] = trend.line();
    let selection = &products.high_risk_high_revenue;

    [
        format!("Top {} sellers by units", products.top_sellers.len()),
        sellers.to_string(),
        String::new(),
        format!("Top {} products by revenue", products.top_revenue.len()),
        earners.to_string(),
        String::new(),
        format!(
            "Price elasticity: units = {:.3} x price + {:.2} (R² {:.3}, n = {})",
            trend.slope, trend.intercept, trend.r_squared, trend.points
        ),
        format!(
            "Trend line: ({:.2}, {:.1}) -> ({:.2}, {:.1})",
            x0, y0, x1, y1
        ),
        format!(
            "High revenue & high stock risk: {} products (revenue > {}, risk > {:.2})",
            selection.rows.len(),
            format_money(selection.first_median),
            selection.second_median
        ),
    ]
    .join("\n")
}

fn format_seasonal(report: &SeasonalReport, no_color: bool) -> String {
    let mut headers = vec!["Category"];
    headers.extend(report.seasons.iter().map(String::as_str));
    let mut pivot = new_table(&headers, no_color);
    for row in report.pivot(|g| g.avg_units_sold) {
        let mut cells = vec![row.category];
        cells.extend(
            row.cells
                .iter()
                .map(|cell| cell.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".to_string())),
        );
        pivot.add_row(Row::from(cells));
    }

    let mut variance = new_table(
        &["Category", "Peak", "Trough", "Variation", "Seasonal"],
        no_color,
    );
    for c in &report.categories {
        let flag = if c.strongly_seasonal { "yes" } else { "" };
        let flag_cell = if c.strongly_seasonal && !no_color {
            Cell::new(flag).fg(Color::Yellow)
        } else {
            Cell::new(flag)
        };
        variance.add_row(Row::from(vec![
            Cell::new(&c.category),
            Cell::new(format!("{} ({:.1})", c.peak_season, c.peak_avg_units)),
            Cell::new(format!("{} ({:.1})", c.trough_season, c.trough_avg_units)),
            Cell::new(format!("{:.1}%", c.variation_pct)),
            flag_cell,
        ]));
    }

    let mut out = vec![
        format!(
            "Average units sold per transaction (overall {:.1})",
            report.overall_avg_units
        ),
        pivot.to_string(),
        String::new(),
        variance.to_string(),
    ];
    if let Some(most) = report.most_seasonal() {
        out.push(format!(
            "Most seasonal: {} ({:.1}% variation)",
            most.category, most.variation_pct
        ));
    }
    out.join("\n")
}

fn format_pareto(pareto: &ParetoAnalysis, no_color: bool) -> String {
    let check = &pareto.check;
    let head = pareto
        .curve
        .head(check.fraction)
        .unwrap_or(&pareto.curve.points[..]);

    let mut table = new_table(&["#", "Product", "Revenue", "Cumulative"], no_color);
    for (i, point) in head.iter().take(25).enumerate() {
        table.add_row(pareto_row(i, point));
    }

    let mut out = vec![
        format!(
            "Top {:.0}% of products ({} of {}) generate {:.1}% of revenue [{}]",
            check.fraction * 100.0,
            check.entity_count,
            check.total_entities,
            check.cumulative_percentage,
            check.strength.label()
        ),
        table.to_string(),
    ];
    if head.len() > 25 {
        out.push(format!("... {} more", head.len() - 25));
    }
    out.join("\n")
}

fn pareto_row(index: usize, point: &ParetoPoint<ParetoRow>) -> Row {
    Row::from(vec![
        (index + 1).to_string(),
        truncate(&point.row.product_name, 40),
        format_money(point.row.revenue),
        format!("{:.1}%", point.cumulative_percentage),
    ])
}

fn scored_table(rows: &[ScoredProductRow], no_color: bool) -> String {
    if rows.is_empty() {
        return "  (none)".to_string();
    }

    let mut table = new_table(&["Product", "Score", "Revenue"], no_color);
    for row in rows {
        table.add_row(Row::from(vec![
            truncate(&row.product_name, 40),
            format!("{:.1}", row.performance_score),
            format_money(row.revenue),
        ]));
    }
    table.to_string()
}

// ============================================================================
// Utilities
// ============================================================================

fn new_table(headers: &[&str], no_color: bool) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    // Apply colors only if enabled
    if no_color {
        table.set_header(headers.to_vec());
    } else {
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }
    table
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max - 1).collect::<String>() + "…"
    }
}

// ============================================================================
// Tests
// ============================================================================

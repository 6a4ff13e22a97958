//! Actionable insights generation
//!
//! Rule-based recommendations derived from calculator output. Wording only;
//! no new numbers are computed here.

use super::pareto::{ParetoCheck, ParetoStrength};
use super::ranking::Ranking;
use super::seasonal::SeasonalReport;
use super::segments::Segmentation;
use super::thresholds::CompoundSelection;
use super::trend::LinearTrend;
use crate::models::{CategoryRow, RevenueRiskRow, StoreRow};

/// Strongly seasonal categories listed at most
const MAX_SEASONAL_INSIGHTS: usize = 5;

pub fn category_insights(ranking: &Ranking<CategoryRow>) -> Vec<String> {
    let (Some(top), Some(bottom)) = (ranking.top(), ranking.bottom()) else {
        return Vec::new();
    };
    let mut insights = vec![format!(
        "{} leads with {:.1}% market share ({} revenue).",
        top.row.category,
        top.share_pct,
        format_money(top.row.total_revenue)
    )];

    if ranking.rows.len() > 1 {
        insights.push(format!(
            "{} trails at {:.1}% share; revenue ranges {} - {}.",
            bottom.row.category,
            bottom.share_pct,
            format_money(ranking.summary.min),
            format_money(ranking.summary.max)
        ));
    }

    insights
}

pub fn store_insights(ranking: &Ranking<StoreRow>) -> Vec<String> {
    let (Some(top), Some(bottom)) = (ranking.top(), ranking.bottom()) else {
        return Vec::new();
    };
    let mut insights = vec![format!(
        "Top performer: {} at {} ({:+.1}% vs avg {}).",
        top.row.store_id,
        format_money(top.row.total_revenue),
        top.vs_avg_pct,
        format_money(ranking.summary.mean)
    )];

    if ranking.rows.len() > 1 && bottom.vs_avg_pct < 0.0 {
        insights.push(format!(
            "Investigate why {} is underperforming ({:+.1}% vs avg).",
            bottom.row.store_id, bottom.vs_avg_pct
        ));
    }

    insights
}

pub fn product_insights(
    elasticity: &LinearTrend,
    high_risk: &CompoundSelection<RevenueRiskRow>,
) -> Vec<String> {
    let mut insights = Vec::new();

    let direction = if elasticity.slope < 0.0 {
        "fall"
    } else {
        "rise"
    };
    insights.push(format!(
        "Units sold {} by {:.2} per unit of price (R² {:.2}, {} samples).",
        direction,
        elasticity.slope.abs(),
        elasticity.r_squared,
        elasticity.points
    ));

    if !high_risk.rows.is_empty() {
        insights.push(format!(
            "{} products with high revenue AND high stock risk need immediate attention.",
            high_risk.rows.len()
        ));
    }

    insights
}

pub fn seasonal_insights(report: &SeasonalReport) -> Vec<String> {
    let mut insights: Vec<String> = report
        .strongly_seasonal()
        .take(MAX_SEASONAL_INSIGHTS)
        .map(|c| {
            format!(
                "{}: peak in {}, low in {} ({:.1}% variation). Stock up before {}, reduce inventory in {}.",
                c.category, c.peak_season, c.trough_season, c.variation_pct, c.peak_season, c.trough_season
            )
        })
        .collect();

    if insights.is_empty() {
        insights.push(format!(
            "No category varies more than {:.0}% across seasons.",
            report.threshold_pct
        ));
    }

    insights
}

pub fn pareto_insights(check: &ParetoCheck) -> Vec<String> {
    let pct = check.cumulative_percentage;
    let top = check.fraction * 100.0;
    let verdict = match check.strength {
        ParetoStrength::Strong => format!(
            "Strong Pareto effect: top {:.0}% of products generate {:.1}% of revenue. Focus resources on these {} products.",
            top, pct, check.entity_count
        ),
        ParetoStrength::Moderate => format!(
            "Moderate Pareto effect: top {:.0}% of products generate {:.1}% of revenue. Consider a broader product strategy.",
            top, pct
        ),
        ParetoStrength::Weak => format!(
            "Weak Pareto effect: top {:.0}% of products generate {:.1}% of revenue. Revenue is evenly distributed.",
            top, pct
        ),
    };

    vec![
        verdict,
        format!(
            "Keep the top {} of {} products in stock at all times.",
            check.entity_count, check.total_entities
        ),
    ]
}

pub fn segment_insights(segmentation: &Segmentation) -> Vec<String> {
    let mut insights = vec![
        format!(
            "{} star products: avg score {:.0}, avg revenue {}. Increase inventory and shelf space.",
            segmentation.stars.len(),
            segmentation.stars.mean_score,
            format_money(segmentation.stars.mean_revenue)
        ),
        format!(
            "{} underperformers: avg score {:.0}, avg revenue {}. Consider discounting or repositioning.",
            segmentation.underperformers.len(),
            segmentation.underperformers.mean_score,
            format_money(segmentation.underperformers.mean_revenue)
        ),
    ];

    let overlap = segmentation.overlap();
    if !overlap.is_empty() {
        insights.push(format!(
            "{} products fall in both cohorts: scores are too uniform to separate.",
            overlap.len()
        ));
    }

    insights
}

/// Compact currency: $1.23M, $45K, $12.50
pub fn format_money(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e6 {
        format!("${:.2}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("${:.0}K", value / 1e3)
    } else {
        format!("${:.2}", value)
    }
}

//! Rule-based insight generation from the portfolio summary.
//!
//! Pure and deterministic: same summary + same priority ordering in, same
//! statements out. No randomness, no external calls, no logging.

use crate::{
    report::{Insight, InsightKind, PortfolioSummary, StoreReport},
    status::RagStatus,
};

/// Derive insight statements. `ordered_reports` must already be in
/// priority order so "worst offender" naming is stable.
pub fn generate_insights(
    summary: &PortfolioSummary,
    ordered_reports: &[StoreReport],
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if summary.red_count > 0 {
        let worst = ordered_reports
            .iter()
            .find(|r| r.final_status == RagStatus::Red);
        let message = match worst {
            Some(w) if summary.red_count > 1 => format!(
                "{} and {} other store(s) are red and need immediate attention",
                w.store_name,
                summary.red_count - 1
            ),
            Some(w) => format!("{} is red and needs immediate attention", w.store_name),
            None => format!(
                "{} store(s) are red and need immediate attention",
                summary.red_count
            ),
        };
        insights.push(Insight {
            kind: InsightKind::UrgentAttention,
            title: "Stores need immediate attention".to_string(),
            message,
            count: Some(summary.red_count),
        });
    }

    if summary.amber_count > 0 {
        insights.push(Insight {
            kind: InsightKind::Watchlist,
            title: "Stores on the watchlist".to_string(),
            message: format!(
                "{} store(s) are amber and at risk of slipping to red",
                summary.amber_count
            ),
            count: Some(summary.amber_count),
        });
    }

    if summary.total_stores > 0 && summary.improving_stores * 2 > summary.total_stores {
        insights.push(Insight {
            kind: InsightKind::ImprovingMomentum,
            title: "Portfolio momentum is positive".to_string(),
            message: format!(
                "{} of {} stores have more improving than declining brands",
                summary.improving_stores, summary.total_stores
            ),
            count: Some(summary.improving_stores),
        });
    }

    insights.push(Insight {
        kind: InsightKind::PortfolioHealth,
        title: "Portfolio attach rate".to_string(),
        message: format!(
            "Average attach rate across {} store(s) is {:.1}%",
            summary.total_stores, summary.avg_attach_rate
        ),
        count: None,
    });

    insights
}

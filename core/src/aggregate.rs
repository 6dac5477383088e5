//! Per-store and portfolio aggregation.

use crate::{
    report::{BrandEvaluation, PortfolioSummary, StoreRagSummary, StoreReport},
    status::{RagStatus, TrendDirection},
};

/// Roll one store's brand evaluations up into an overall status and
/// per-status / per-trend tallies. Overall is the worst case (maximum
/// severity); a store with zero evaluations defaults to Green.
pub fn summarize_store(evaluations: &[BrandEvaluation]) -> StoreRagSummary {
    let mut summary = StoreRagSummary {
        overall: RagStatus::Green,
        green_brands: 0,
        amber_brands: 0,
        red_brands: 0,
        improving_brands: 0,
        declining_brands: 0,
        stable_brands: 0,
    };

    for eval in evaluations {
        if eval.final_status.severity() > summary.overall.severity() {
            summary.overall = eval.final_status;
        }
        match eval.final_status {
            RagStatus::Green => summary.green_brands += 1,
            RagStatus::Amber => summary.amber_brands += 1,
            RagStatus::Red => summary.red_brands += 1,
        }
        match eval.trend {
            TrendDirection::Improved => summary.improving_brands += 1,
            TrendDirection::Declined => summary.declining_brands += 1,
            TrendDirection::Stable => summary.stable_brands += 1,
        }
    }

    summary
}

/// Roll store reports up into portfolio totals. Admin and scoped callers
/// both land here; only the store slice they evaluated differs.
pub fn summarize_portfolio(reports: &[StoreReport]) -> PortfolioSummary {
    let mut summary = PortfolioSummary {
        total_stores: reports.len(),
        green_count: 0,
        amber_count: 0,
        red_count: 0,
        avg_attach_rate: 0.0,
        improving_stores: 0,
    };

    let mut rate_sum = 0.0;
    for report in reports {
        match report.final_status {
            RagStatus::Green => summary.green_count += 1,
            RagStatus::Amber => summary.amber_count += 1,
            RagStatus::Red => summary.red_count += 1,
        }
        rate_sum += report.attach_rate;
        if report.summary.improving_brands > report.summary.declining_brands {
            summary.improving_stores += 1;
        }
    }

    if !reports.is_empty() {
        summary.avg_attach_rate = rate_sum / reports.len() as f64;
    }
    summary
}

use retailrag_core::aggregate::{summarize_portfolio, summarize_store};
use retailrag_core::model::BrandTier;
use retailrag_core::report::{BrandEvaluation, StoreRagSummary, StoreReport};
use retailrag_core::status::{RagStatus, TrendDirection};

fn evaluation(brand: &str, status: RagStatus, trend: TrendDirection) -> BrandEvaluation {
    BrandEvaluation {
        brand_id: brand.into(),
        tier: BrandTier::B,
        attach_rate: 15.0,
        previous_attach_rate: 14.0,
        base_status: status,
        final_status: status,
        trend,
    }
}

fn store_report(id: &str, status: RagStatus, attach_rate: f64) -> StoreReport {
    StoreReport {
        store_id: id.into(),
        store_name: format!("Store {id}"),
        city: "Pune".into(),
        tier: Some(BrandTier::A),
        attach_rate,
        previous_attach_rate: attach_rate,
        final_status: status,
        trend: TrendDirection::Stable,
        plan_sales: 0,
        device_sales: 0,
        total_revenue: 0.0,
        summary: StoreRagSummary {
            overall: status,
            green_brands: 0,
            amber_brands: 0,
            red_brands: 0,
            improving_brands: 0,
            declining_brands: 0,
            stable_brands: 0,
        },
        brands: Vec::new(),
    }
}

#[test]
fn overall_status_is_worst_case_across_brands() {
    let evals = vec![
        evaluation("b-1", RagStatus::Green, TrendDirection::Improved),
        evaluation("b-2", RagStatus::Amber, TrendDirection::Stable),
    ];
    let summary = summarize_store(&evals);
    assert_eq!(summary.overall, RagStatus::Amber);
    assert_eq!(summary.green_brands, 1);
    assert_eq!(summary.amber_brands, 1);
    assert_eq!(summary.red_brands, 0);

    let evals = vec![
        evaluation("b-1", RagStatus::Green, TrendDirection::Improved),
        evaluation("b-2", RagStatus::Red, TrendDirection::Declined),
        evaluation("b-3", RagStatus::Amber, TrendDirection::Stable),
    ];
    assert_eq!(summarize_store(&evals).overall, RagStatus::Red);
}

#[test]
fn overall_equals_max_severity_for_every_combination() {
    let statuses = [RagStatus::Green, RagStatus::Amber, RagStatus::Red];
    for a in statuses {
        for b in statuses {
            let evals = vec![
                evaluation("b-1", a, TrendDirection::Stable),
                evaluation("b-2", b, TrendDirection::Stable),
            ];
            let expected = if a.severity() >= b.severity() { a } else { b };
            assert_eq!(summarize_store(&evals).overall, expected, "{a} + {b}");
        }
    }
}

#[test]
fn store_with_no_evaluations_defaults_to_green() {
    let summary = summarize_store(&[]);
    assert_eq!(summary.overall, RagStatus::Green);
    assert_eq!(summary.green_brands, 0);
}

#[test]
fn store_trend_tallies() {
    let evals = vec![
        evaluation("b-1", RagStatus::Green, TrendDirection::Improved),
        evaluation("b-2", RagStatus::Green, TrendDirection::Improved),
        evaluation("b-3", RagStatus::Amber, TrendDirection::Declined),
        evaluation("b-4", RagStatus::Green, TrendDirection::Stable),
    ];
    let summary = summarize_store(&evals);
    assert_eq!(summary.improving_brands, 2);
    assert_eq!(summary.declining_brands, 1);
    assert_eq!(summary.stable_brands, 1);
}

#[test]
fn portfolio_counts_over_mixed_statuses() {
    let reports = vec![
        store_report("s-1", RagStatus::Green, 20.0),
        store_report("s-2", RagStatus::Amber, 14.0),
        store_report("s-3", RagStatus::Red, 5.0),
        store_report("s-4", RagStatus::Red, 1.0),
    ];
    let summary = summarize_portfolio(&reports);
    assert_eq!(summary.total_stores, 4);
    assert_eq!(summary.green_count, 1);
    assert_eq!(summary.amber_count, 1);
    assert_eq!(summary.red_count, 2);
    assert_eq!(summary.avg_attach_rate, 10.0);
}

#[test]
fn improving_stores_require_more_improving_than_declining_brands() {
    let mut improving = store_report("s-1", RagStatus::Green, 20.0);
    improving.summary.improving_brands = 2;
    improving.summary.declining_brands = 1;

    let mut balanced = store_report("s-2", RagStatus::Green, 20.0);
    balanced.summary.improving_brands = 1;
    balanced.summary.declining_brands = 1;

    let summary = summarize_portfolio(&[improving, balanced]);
    assert_eq!(summary.improving_stores, 1);
}

#[test]
fn empty_portfolio_is_all_zeroes() {
    let summary = summarize_portfolio(&[]);
    assert_eq!(summary.total_stores, 0);
    assert_eq!(summary.avg_attach_rate, 0.0);
}

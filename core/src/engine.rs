//! Classification orchestration — one pass over a store set.
//!
//! EVALUATION ORDER (fixed, documented):
//!   1. Pre-filters that need no sales data (city, brand presence).
//!   2. Per-brand: resolve attach rates, classify, apply trend penalty.
//!   3. Per-store rollup (worst-case status, tallies, volume sums).
//!   4. Post-filters (representative tier, final status).
//!   5. Priority sort, portfolio summary, insights.
//!
//! RULES:
//!   - The engine is pure: no I/O, no logging, no global state. The
//!     reference date is an explicit option, never the wall clock.
//!   - Caller scoping (org-wide vs. an executive's assigned stores) is a
//!     pre-filter on the store slice handed in. There is no role
//!     branching inside the engine.
//!   - A fault in one store/brand's data never aborts the batch; it is
//!     recorded on the report and everything else is still classified.

use crate::{
    aggregate::{summarize_portfolio, summarize_store},
    attach_rate::{self, PeriodTotals, RatePair},
    error::{EngineError, RagResult},
    insights::generate_insights,
    model::{BrandAssignment, BrandTier, SalesRecord, Store},
    report::{BrandEvaluation, EvaluationFault, RagReport, StoreReport},
    status::RagStatus,
    thresholds, trend,
    types::BrandId,
};
use chrono::{Datelike, NaiveDate};

// ── Options and request parameters ───────────────────────────────────────────

/// Engine configuration. Explicit values only — nothing here is read from
/// the environment or derived from wall-clock time.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// The date the evaluation is anchored to. Calendar-month windows use
    /// its year/month; trailing windows end on it.
    pub reference_date: NaiveDate,
    /// Tier to substitute when a store/brand pairing has none recorded.
    /// `None` makes a missing tier a per-entity fault.
    pub missing_tier_default: Option<BrandTier>,
}

impl EngineOptions {
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            missing_tier_default: None,
        }
    }

    pub fn with_missing_tier_default(mut self, tier: BrandTier) -> Self {
        self.missing_tier_default = Some(tier);
        self
    }
}

/// Time window selector for the attach-rate resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    Today,
    Last7Days,
    Last30Days,
    #[default]
    CalendarMonth,
}

impl TimeWindow {
    /// Trailing window length, for the non-calendar variants.
    fn days(self) -> Option<u32> {
        match self {
            Self::Today => Some(1),
            Self::Last7Days => Some(7),
            Self::Last30Days => Some(30),
            Self::CalendarMonth => None,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" | "1d" => Some(Self::Today),
            "7d" | "7days" | "week" => Some(Self::Last7Days),
            "30d" | "30days" => Some(Self::Last30Days),
            "month" | "calendar" => Some(Self::CalendarMonth),
            _ => None,
        }
    }
}

/// Value filters combined by conjunction. All default to "no filter".
#[derive(Debug, Clone, Default)]
pub struct EvaluationFilter {
    /// Match on the store's representative tier.
    pub tier: Option<BrandTier>,
    /// Evaluate only this brand's assignment per store; stores not
    /// carrying the brand are excluded (not an error).
    pub brand_id: Option<BrandId>,
    /// Case-insensitive match on store city.
    pub city: Option<String>,
    /// Match on the store's final status, applied after classification.
    pub status: Option<RagStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct EvaluationParams {
    pub window: TimeWindow,
    pub filter: EvaluationFilter,
}

// ── Evaluation ───────────────────────────────────────────────────────────────

/// Classify every store in the slice and roll the results up into a
/// priority-ordered report. Both caller variants (org-wide and
/// identity-scoped) call this with their own store slice.
pub fn evaluate(
    stores: &[Store],
    sales: &[SalesRecord],
    options: &EngineOptions,
    params: &EvaluationParams,
) -> RagReport {
    let mut reports = Vec::with_capacity(stores.len());
    let mut faults = Vec::new();

    for store in stores {
        if let Some(city) = &params.filter.city {
            if !store.city.eq_ignore_ascii_case(city) {
                continue;
            }
        }

        let assignments: Vec<&BrandAssignment> = match &params.filter.brand_id {
            Some(brand_id) => match store.assignment_for(brand_id) {
                Some(assignment) => vec![assignment],
                // Store does not carry the requested brand: excluded.
                None => continue,
            },
            None => store.brands.iter().collect(),
        };

        let mut store_faults = Vec::new();
        let report = evaluate_store(store, &assignments, sales, options, params, &mut store_faults);

        if let Some(tier) = params.filter.tier {
            if report.tier != Some(tier) {
                continue;
            }
        }
        if let Some(status) = params.filter.status {
            if report.final_status != status {
                continue;
            }
        }
        // Faults follow their store through the post-filters, so the
        // fault list never references a store absent from the report.
        faults.append(&mut store_faults);
        reports.push(report);
    }

    sort_by_priority(&mut reports);
    let summary = summarize_portfolio(&reports);
    let insights = generate_insights(&summary, &reports);

    RagReport {
        stores: reports,
        summary,
        insights,
        faults,
    }
}

fn evaluate_store(
    store: &Store,
    assignments: &[&BrandAssignment],
    sales: &[SalesRecord],
    options: &EngineOptions,
    params: &EvaluationParams,
    faults: &mut Vec<EvaluationFault>,
) -> StoreReport {
    let mut evaluations = Vec::with_capacity(assignments.len());
    let mut totals = PeriodTotals::default();

    for &assignment in assignments {
        match evaluate_brand(store, assignment, sales, options, params) {
            Ok((eval, brand_totals)) => {
                totals.device_sales += brand_totals.device_sales;
                totals.plan_sales += brand_totals.plan_sales;
                totals.revenue += brand_totals.revenue;
                evaluations.push(eval);
            }
            Err(err) => faults.push(EvaluationFault {
                store_id: store.id.clone(),
                brand_id: Some(assignment.brand_id.clone()),
                reason: err.to_string(),
            }),
        }
    }

    let summary = summarize_store(&evaluations);

    // Store-level rates: unweighted mean of the brand rates, matching the
    // portfolio summarizer's unweighted mean over stores.
    let (attach_rate, previous_attach_rate) = if evaluations.is_empty() {
        (0.0, 0.0)
    } else {
        let n = evaluations.len() as f64;
        (
            evaluations.iter().map(|e| e.attach_rate).sum::<f64>() / n,
            evaluations
                .iter()
                .map(|e| e.previous_attach_rate)
                .sum::<f64>()
                / n,
        )
    };

    // Representative tier: the evaluated assignment under a brand filter,
    // otherwise the store's first listed assignment.
    let tier = match &params.filter.brand_id {
        Some(_) => evaluations.first().map(|e| e.tier),
        None => store
            .representative_tier()
            .or(options.missing_tier_default),
    };

    StoreReport {
        store_id: store.id.clone(),
        store_name: store.name.clone(),
        city: store.city.clone(),
        tier,
        attach_rate,
        previous_attach_rate,
        final_status: summary.overall,
        trend: trend::direction(attach_rate, previous_attach_rate),
        plan_sales: totals.plan_sales,
        device_sales: totals.device_sales,
        total_revenue: totals.revenue,
        summary,
        brands: evaluations,
    }
}

fn evaluate_brand(
    store: &Store,
    assignment: &BrandAssignment,
    sales: &[SalesRecord],
    options: &EngineOptions,
    params: &EvaluationParams,
) -> RagResult<(BrandEvaluation, PeriodTotals)> {
    let tier = assignment
        .tier
        .or(options.missing_tier_default)
        .ok_or_else(|| EngineError::MissingTier {
            store_id: store.id.clone(),
            brand_id: assignment.brand_id.clone(),
        })?;

    let records: Vec<&SalesRecord> = sales
        .iter()
        .filter(|r| r.store_id == store.id && r.brand_id == assignment.brand_id)
        .collect();

    let (rates, totals) = resolve_period(&records, options.reference_date, params.window)?;

    let base_status = thresholds::classify(tier, rates.current);
    let final_status = trend::apply_penalty(base_status, rates.current, rates.previous);

    Ok((
        BrandEvaluation {
            brand_id: assignment.brand_id.clone(),
            tier,
            attach_rate: rates.current,
            previous_attach_rate: rates.previous,
            base_status,
            final_status,
            trend: trend::direction(rates.current, rates.previous),
        },
        totals,
    ))
}

fn resolve_period(
    records: &[&SalesRecord],
    reference_date: NaiveDate,
    window: TimeWindow,
) -> RagResult<(RatePair, PeriodTotals)> {
    match window.days() {
        Some(days) => Ok((
            attach_rate::window_attach_rates(records, reference_date, days),
            attach_rate::window_totals(records, reference_date, days),
        )),
        None => {
            let year = reference_date.year();
            let month = reference_date.month();
            Ok((
                attach_rate::monthly_attach_rates(records, year, month)?,
                attach_rate::month_totals(records, year, month),
            ))
        }
    }
}

/// Descending severity, then ascending attach rate, then ascending store
/// id. The secondary keys make the ordering fully deterministic.
fn sort_by_priority(reports: &mut [StoreReport]) {
    reports.sort_by(|a, b| {
        b.final_status
            .severity()
            .cmp(&a.final_status.severity())
            .then_with(|| {
                a.attach_rate
                    .partial_cmp(&b.attach_rate)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.store_id.cmp(&b.store_id))
    });
}

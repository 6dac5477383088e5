//! Derived result types. Computed fresh per invocation, never persisted.

use crate::{
    model::BrandTier,
    status::{RagStatus, TrendDirection},
    types::{BrandId, StoreId},
};
use serde::{Deserialize, Serialize};

/// Classification outcome for one store/brand pairing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandEvaluation {
    pub brand_id: BrandId,
    pub tier: BrandTier,
    pub attach_rate: f64,
    pub previous_attach_rate: f64,
    /// Threshold-only classification, before the trend penalty.
    pub base_status: RagStatus,
    /// Classification after the trend penalty.
    pub final_status: RagStatus,
    pub trend: TrendDirection,
}

/// Tallies over one store's brand evaluations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRagSummary {
    /// Worst-case severity among the store's brand final statuses.
    /// Green for a store with zero evaluations (vacuous default).
    pub overall: RagStatus,
    pub green_brands: usize,
    pub amber_brands: usize,
    pub red_brands: usize,
    pub improving_brands: usize,
    pub declining_brands: usize,
    pub stable_brands: usize,
}

/// One row of the priority-ordered output: a store with its representative
/// tier, aggregate rates and volumes, and the per-brand detail behind them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreReport {
    pub store_id: StoreId,
    pub store_name: String,
    pub city: String,
    pub tier: Option<BrandTier>,
    pub attach_rate: f64,
    pub previous_attach_rate: f64,
    pub final_status: RagStatus,
    pub trend: TrendDirection,
    pub plan_sales: i64,
    pub device_sales: i64,
    pub total_revenue: f64,
    pub summary: StoreRagSummary,
    pub brands: Vec<BrandEvaluation>,
}

/// Portfolio-level rollup across all evaluated stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_stores: usize,
    pub green_count: usize,
    pub amber_count: usize,
    pub red_count: usize,
    /// Simple unweighted mean of store attach rates.
    pub avg_attach_rate: f64,
    /// Stores whose brand mix has strictly more improving than declining
    /// brands.
    pub improving_stores: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    UrgentAttention,
    Watchlist,
    ImprovingMomentum,
    PortfolioHealth,
}

/// A short, deterministic statement derived from the portfolio summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    pub count: Option<usize>,
}

/// A per-entity evaluation failure. Faults never abort the batch: the
/// affected entity is skipped and everything else is still classified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationFault {
    pub store_id: StoreId,
    pub brand_id: Option<BrandId>,
    pub reason: String,
}

/// The full output of one classification pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagReport {
    /// Priority-ordered: descending severity, then ascending attach rate,
    /// then ascending store id.
    pub stores: Vec<StoreReport>,
    pub summary: PortfolioSummary,
    pub insights: Vec<Insight>,
    pub faults: Vec<EvaluationFault>,
}

//! Input data model — stores, brands, and sales records.
//!
//! These types are read-only to the engine: they are populated by the
//! caller (database reads, ingestion pipelines) and handed in per
//! invocation. The engine never mutates or persists them.

use crate::{
    error::{EngineError, RagResult},
    types::{BrandId, CategoryId, StoreId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ── Brand tier ───────────────────────────────────────────────────────────────

/// Performance tier assigned to a brand at a store. Determines which
/// attach-rate thresholds apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandTier {
    APlus,
    A,
    B,
    C,
    D,
}

impl BrandTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for BrandTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrandTier {
    type Err = EngineError;

    /// Parse a stored tier label. Unrecognized labels are a data-integrity
    /// error and must surface — never silently substitute a tier.
    fn from_str(s: &str) -> RagResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A+" | "APLUS" | "A_PLUS" => Ok(Self::APlus),
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            _ => Err(EngineError::UnknownTier {
                value: s.to_string(),
            }),
        }
    }
}

// ── Store / brand records ────────────────────────────────────────────────────

/// One brand carried by a store, with the tier recorded for that pairing.
/// `tier` is None when the source data never recorded one; the engine
/// resolves that via `EngineOptions::missing_tier_default`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandAssignment {
    pub brand_id: BrandId,
    pub tier: Option<BrandTier>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub city: String,
    pub brands: Vec<BrandAssignment>,
}

impl Store {
    /// Build a store from the legacy parallel-list shape: one list of brand
    /// ids and one index-aligned list of tier labels. The lists are known to
    /// drift out of sync upstream, so only the shared prefix is processed;
    /// an empty label becomes `tier: None` rather than an error.
    pub fn from_parallel_lists(
        id: StoreId,
        name: String,
        city: String,
        brand_ids: Vec<BrandId>,
        tier_labels: Vec<String>,
    ) -> RagResult<Self> {
        let mut brands = Vec::with_capacity(brand_ids.len().min(tier_labels.len()));
        for (brand_id, label) in brand_ids.into_iter().zip(tier_labels) {
            let tier = match label.trim() {
                "" => None,
                label => Some(label.parse::<BrandTier>()?),
            };
            brands.push(BrandAssignment { brand_id, tier });
        }
        Ok(Self {
            id,
            name,
            city,
            brands,
        })
    }

    /// The store's representative tier: the first listed brand assignment.
    pub fn representative_tier(&self) -> Option<BrandTier> {
        self.brands.first().and_then(|b| b.tier)
    }

    pub fn assignment_for(&self, brand_id: &str) -> Option<&BrandAssignment> {
        self.brands.iter().find(|b| b.brand_id == brand_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
}

// ── Sales records ────────────────────────────────────────────────────────────

/// One month of aggregated sales for a (store, brand, category, year) key.
/// `attach_pct` is the ingestion pipeline's authoritative reading as a 0-1
/// fraction; when present it is used as-is, never recomputed from counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySales {
    pub month: u32,
    pub device_sales: i64,
    pub plan_sales: i64,
    #[serde(default)]
    pub attach_pct: Option<f64>,
    pub revenue: f64,
}

/// One day of sales, used only for short trailing windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub device_sales: i64,
    pub plan_sales: i64,
    #[serde(default)]
    pub attach_pct: Option<f64>,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRecord {
    pub store_id: StoreId,
    pub brand_id: BrandId,
    pub category_id: CategoryId,
    pub year: i32,
    /// At most one entry per month. An absent month means no data (zero),
    /// never interpolated.
    pub monthly: Vec<MonthlySales>,
    /// Daily entries keyed by month number.
    #[serde(default)]
    pub daily: BTreeMap<u32, Vec<DailySales>>,
}

impl SalesRecord {
    pub fn month_entry(&self, month: u32) -> Option<&MonthlySales> {
        self.monthly.iter().find(|m| m.month == month)
    }
}

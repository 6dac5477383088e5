//! Tier threshold table and base classifier.
//!
//! Each brand tier carries two inclusive attach-rate floors. At or above
//! the green floor is Green; at or above the amber floor is Amber;
//! everything below is Red. The table is total over the `BrandTier` enum,
//! so an unknown tier can only exist as an unparsed label — and parsing
//! fails fast (`EngineError::UnknownTier`) instead of defaulting.

use crate::{model::BrandTier, status::RagStatus};

/// Inclusive lower bounds for a tier, as 0-100 percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub green_floor: f64,
    pub amber_floor: f64,
}

/// The static cut-point table.
pub fn thresholds_for(tier: BrandTier) -> TierThresholds {
    match tier {
        BrandTier::APlus => TierThresholds {
            green_floor: 25.0,
            amber_floor: 12.0,
        },
        BrandTier::A => TierThresholds {
            green_floor: 20.0,
            amber_floor: 12.0,
        },
        BrandTier::B => TierThresholds {
            green_floor: 16.0,
            amber_floor: 12.0,
        },
        BrandTier::C => TierThresholds {
            green_floor: 14.0,
            amber_floor: 10.0,
        },
        BrandTier::D => TierThresholds {
            green_floor: 10.0,
            amber_floor: 3.0,
        },
    }
}

/// Classify an attach rate (0-100 percentage) against a tier's floors.
pub fn classify(tier: BrandTier, attach_rate: f64) -> RagStatus {
    let t = thresholds_for(tier);
    if attach_rate >= t.green_floor {
        RagStatus::Green
    } else if attach_rate >= t.amber_floor {
        RagStatus::Amber
    } else {
        RagStatus::Red
    }
}

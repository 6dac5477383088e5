//! Trend penalty rule and the independent trend indicator.

use crate::status::{RagStatus, TrendDirection};

/// Downgrade a base status one severity step when the current period is
/// strictly worse than the previous one. No penalty without a valid prior
/// baseline (`previous > 0`). Idempotent, and never improves a status.
pub fn apply_penalty(base: RagStatus, current: f64, previous: f64) -> RagStatus {
    if previous > 0.0 && current < previous {
        base.downgraded()
    } else {
        base
    }
}

/// Directional change between periods, by pure numeric comparison.
/// Decoupled from the penalty rule: this one reports direction even when
/// there is no prior baseline.
pub fn direction(current: f64, previous: f64) -> TrendDirection {
    if current > previous {
        TrendDirection::Improved
    } else if current < previous {
        TrendDirection::Declined
    } else {
        TrendDirection::Stable
    }
}

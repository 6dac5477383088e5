//! RAG status and trend vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Red/Amber/Green performance classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RagStatus {
    Green,
    Amber,
    Red,
}

impl RagStatus {
    /// Severity rank: Red(3) > Amber(2) > Green(1). Used for worst-case
    /// aggregation and priority ordering.
    pub fn severity(&self) -> u8 {
        match self {
            Self::Green => 1,
            Self::Amber => 2,
            Self::Red => 3,
        }
    }

    /// One step worse. Red is terminal.
    pub fn downgraded(&self) -> Self {
        match self {
            Self::Green => Self::Amber,
            Self::Amber | Self::Red => Self::Red,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Amber => "amber",
            Self::Red => "red",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" => Some(Self::Green),
            "amber" => Some(Self::Amber),
            "red" => Some(Self::Red),
            _ => None,
        }
    }
}

impl fmt::Display for RagStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Period-over-period direction, independent of tier and thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improved,
    Declined,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improved => "improved",
            Self::Declined => "declined",
            Self::Stable => "stable",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Data quality levels attached to every climate reading.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Quality grade of a reading.
///
/// Variants are declared from worst to best so the derived `Ord` matches the
/// threshold hierarchy used by filters: `poor < questionable < good < excellent`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Poor,
    Questionable,
    Good,
    Excellent,
}

impl Quality {
    /// All levels, worst first.
    pub const ALL: [Quality; 4] = [
        Quality::Poor,
        Quality::Questionable,
        Quality::Good,
        Quality::Excellent,
    ];

    /// Weight used by quality-weighted averages.
    pub fn weight(self) -> f64 {
        match self {
            Quality::Excellent => 1.0,
            Quality::Good => 0.8,
            Quality::Questionable => 0.5,
            Quality::Poor => 0.3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Poor => "poor",
            Quality::Questionable => "questionable",
            Quality::Good => "good",
            Quality::Excellent => "excellent",
        }
    }

    /// Levels accepted by an inclusive minimum-quality threshold.
    ///
    /// `good` admits `good` and `excellent`.
    pub fn at_or_above(self) -> &'static [Quality] {
        let start = Self::ALL
            .iter()
            .position(|q| *q == self)
            .unwrap_or(0);
        &Self::ALL[start..]
    }

    /// Whether a reading of this quality passes `threshold`.
    pub fn meets(self, threshold: Quality) -> bool {
        self >= threshold
    }
}

impl core::fmt::Display for Quality {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "poor" => Ok(Quality::Poor),
            "questionable" => Ok(Quality::Questionable),
            "good" => Ok(Quality::Good),
            "excellent" => Ok(Quality::Excellent),
            _ => Err(DomainError::unknown_quality(s)),
        }
    }
}

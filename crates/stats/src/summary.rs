use serde::{Deserialize, Serialize};

use ecovision_core::Quality;

use crate::series::MetricSeries;

/// Share of readings at each quality level, in \[0, 1\].
///
/// All four keys are always present, even when a level has no readings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityDistribution {
    pub excellent: f64,
    pub good: f64,
    pub questionable: f64,
    pub poor: f64,
}

impl QualityDistribution {
    pub fn share(&self, quality: Quality) -> f64 {
        match quality {
            Quality::Excellent => self.excellent,
            Quality::Good => self.good,
            Quality::Questionable => self.questionable,
            Quality::Poor => self.poor,
        }
    }
}

/// Quality-weighted summary of one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    /// `Σ(value · weight) / Σ(weight)` with weights from [`Quality::weight`].
    pub weighted_avg: f64,
    pub unit: String,
    pub quality_distribution: QualityDistribution,
}

/// Summarize a series; `None` when it has no readings.
pub fn summarize(series: &MetricSeries) -> Option<MetricSummary> {
    if series.is_empty() {
        return None;
    }

    let n = series.len() as f64;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    let mut counts = [0usize; 4];

    for p in &series.points {
        min = min.min(p.value);
        max = max.max(p.value);
        sum += p.value;

        let w = p.quality.weight();
        weighted_sum += p.value * w;
        weight_sum += w;

        counts[p.quality as usize] += 1;
    }

    let share = |q: Quality| counts[q as usize] as f64 / n;

    Some(MetricSummary {
        min,
        max,
        avg: sum / n,
        weighted_avg: weighted_sum / weight_sum,
        unit: series.unit.clone(),
        quality_distribution: QualityDistribution {
            excellent: share(Quality::Excellent),
            good: share(Quality::Good),
            questionable: share(Quality::Questionable),
            poor: share(Quality::Poor),
        },
    })
}

use serde::{Deserialize, Serialize};

use chrono::NaiveDate;
use ecovision_core::Quality;

use crate::error::StatsError;
use crate::round_to;
use crate::series::MetricSeries;

/// A reading far from the series mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub date: NaiveDate,
    /// Rounded to 1 decimal.
    pub value: f64,
    /// Distance from the mean in standard deviations, rounded to 2 decimals.
    pub deviation: f64,
    pub quality: Quality,
}

/// Standard-deviation outlier detector.
///
/// Model:
/// - Compute the population mean and standard deviation of the whole series.
/// - Flag every point whose |z-score| exceeds `threshold`.
#[derive(Debug, Clone, Copy)]
pub struct AnomalyDetector {
    threshold: f64,
    /// Minimum series length to compute meaningful statistics.
    min_points: usize,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self {
            threshold: 2.0,
            min_points: 3,
        }
    }
}

impl AnomalyDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Result<Self, StatsError> {
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(StatsError::InvalidInput(
                "threshold must be a finite positive number".to_string(),
            ));
        }
        self.threshold = threshold;
        Ok(self)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Anomalies sorted by deviation, highest first.
    pub fn detect(&self, series: &MetricSeries) -> Vec<Anomaly> {
        if series.len() < self.min_points {
            return Vec::new();
        }

        let values = series.values();
        let mean = crate::mean(&values);
        let std = stddev_population(&values, mean);

        // Identical values: nothing can stand out.
        if std == 0.0 {
            return Vec::new();
        }

        let mut anomalies: Vec<Anomaly> = series
            .points
            .iter()
            .filter_map(|p| {
                let deviation = (p.value - mean).abs() / std;
                (deviation > self.threshold).then(|| Anomaly {
                    date: p.date,
                    value: round_to(p.value, 1),
                    deviation: round_to(deviation, 2),
                    quality: p.quality,
                })
            })
            .collect();

        anomalies.sort_by(|a, b| b.deviation.total_cmp(&a.deviation));
        anomalies
    }
}

/// Detect anomalies with the default 2σ threshold.
pub fn detect_anomalies(series: &MetricSeries) -> Vec<Anomaly> {
    AnomalyDetector::default().detect(series)
}

/// Population standard deviation (n), deterministic.
fn stddev_population(xs: &[f64], mean: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let var = xs
        .iter()
        .map(|x| {
            let d = x - mean;
            d * d
        })
        .sum::<f64>()
        / (xs.len() as f64);
    var.sqrt()
}

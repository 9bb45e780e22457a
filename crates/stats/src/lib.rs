//! `ecovision-stats`
//!
//! **Responsibility:** numeric analysis over a single metric's readings.
//!
//! This crate is intentionally free of I/O:
//! - It never queries a store; callers hand it already-filtered series.
//! - Every routine is deterministic for a given input.

pub mod analysis;
pub mod anomaly;
pub mod error;
pub mod seasonality;
pub mod series;
pub mod summary;
pub mod trend;

pub use analysis::{TrendAnalysis, analyze};
pub use anomaly::{Anomaly, AnomalyDetector, detect_anomalies};
pub use error::StatsError;
pub use seasonality::{Season, Seasonality, detect_seasonality};
pub use series::{MetricSeries, SeriesPoint, group_by_metric};
pub use summary::{MetricSummary, QualityDistribution, summarize};
pub use trend::{Trend, TrendDirection, calculate_trend};

/// Round half away from zero to `places` decimals.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

pub(crate) fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}

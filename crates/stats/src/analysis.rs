use serde::{Deserialize, Serialize};

use crate::anomaly::{Anomaly, detect_anomalies};
use crate::seasonality::{Seasonality, detect_seasonality};
use crate::series::MetricSeries;
use crate::trend::{Trend, calculate_trend};

/// Combined trend report for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend: Trend,
    pub anomalies: Vec<Anomaly>,
    pub seasonality: Seasonality,
}

pub fn analyze(series: &MetricSeries) -> TrendAnalysis {
    TrendAnalysis {
        trend: calculate_trend(series),
        anomalies: detect_anomalies(series),
        seasonality: detect_seasonality(series),
    }
}

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use ecovision_core::{ClimateRecord, Quality};

/// One observation in a metric series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub quality: Quality,
}

/// All readings of one metric, in date order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub metric: String,
    pub unit: String,
    pub points: Vec<SeriesPoint>,
}

impl MetricSeries {
    pub fn new(metric: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            unit: unit.into(),
            points: Vec::new(),
        }
    }

    pub fn with_point(mut self, date: NaiveDate, value: f64, quality: Quality) -> Self {
        self.points.push(SeriesPoint { date, value, quality });
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Span between the earliest and latest observation, in days.
    pub fn span_days(&self) -> i64 {
        let first = self.points.iter().map(|p| p.date).min();
        let last = self.points.iter().map(|p| p.date).max();
        match (first, last) {
            (Some(first), Some(last)) => (last - first).num_days(),
            _ => 0,
        }
    }
}

/// Group joined records by metric name.
///
/// Input order is preserved within each group; stores return records sorted
/// by date, and the trend routines rely on that. Readings from every selected
/// location are pooled into the same series.
pub fn group_by_metric(records: &[ClimateRecord]) -> BTreeMap<String, MetricSeries> {
    let mut groups: BTreeMap<String, MetricSeries> = BTreeMap::new();
    for r in records {
        groups
            .entry(r.metric.clone())
            .or_insert_with(|| MetricSeries::new(r.metric.clone(), r.unit.clone()))
            .points
            .push(SeriesPoint {
                date: r.date,
                value: r.value,
                quality: r.quality,
            });
    }
    groups
}

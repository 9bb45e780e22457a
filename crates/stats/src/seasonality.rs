//! Seasonality heuristic.
//!
//! Readings are bucketed by meteorological season and the share of variance
//! explained by the season (η², correlation ratio) is used as confidence.
//! Series shorter than [`MIN_SPAN_DAYS`] are never reported as seasonal.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::round_to;
use crate::series::MetricSeries;

/// Minimum date span (~6 months) before seasonal patterns are considered.
pub const MIN_SPAN_DAYS: i64 = 180;

/// η² at or above this reports a detected pattern.
pub const DETECTION_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// Meteorological season of a month (1-12): DJF, MAM, JJA, SON.
    pub fn of_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seasonality {
    pub detected: bool,
    /// `annual` when detected, otherwise `none`.
    pub period: String,
    pub confidence: f64,
}

impl Seasonality {
    pub fn none() -> Self {
        Self::undetected(0.0)
    }

    fn undetected(confidence: f64) -> Self {
        Self {
            detected: false,
            period: "none".to_string(),
            confidence,
        }
    }
}

pub fn detect_seasonality(series: &MetricSeries) -> Seasonality {
    if series.is_empty() || series.span_days() < MIN_SPAN_DAYS {
        return Seasonality::none();
    }

    // (sum, count) per season, indexed by `Season as usize`.
    let mut buckets = [(0.0f64, 0usize); 4];
    for p in &series.points {
        let b = &mut buckets[Season::of_month(p.date.month()) as usize];
        b.0 += p.value;
        b.1 += 1;
    }

    let represented = buckets.iter().filter(|(_, n)| *n > 0).count();
    if represented < 2 {
        return Seasonality::none();
    }

    let values = series.values();
    let grand_mean = crate::mean(&values);
    let ss_total: f64 = values.iter().map(|v| (v - grand_mean).powi(2)).sum();
    if ss_total == 0.0 {
        return Seasonality::none();
    }

    let ss_between: f64 = buckets
        .iter()
        .filter(|(_, n)| *n > 0)
        .map(|(sum, n)| {
            let season_mean = sum / *n as f64;
            *n as f64 * (season_mean - grand_mean).powi(2)
        })
        .sum();

    let eta_squared = (ss_between / ss_total).clamp(0.0, 1.0);
    let confidence = round_to(eta_squared, 2);

    if eta_squared >= DETECTION_CONFIDENCE {
        Seasonality {
            detected: true,
            period: "annual".to_string(),
            confidence,
        }
    } else {
        Seasonality::undetected(confidence)
    }
}

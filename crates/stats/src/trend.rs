//! Linear-regression trend detection.
//!
//! Model:
//! - x = days since the first observation, y = value.
//! - Fit y = slope·x + intercept by least squares.
//! - Report slope as a monthly rate and R² as confidence.

use serde::{Deserialize, Serialize};

use crate::round_to;
use crate::series::MetricSeries;

/// Fewer points than this yields [`TrendDirection::InsufficientData`].
pub const MIN_TREND_POINTS: usize = 3;

/// Daily slopes smaller than this (in absolute value) are reported as stable.
pub const STABLE_SLOPE_PER_DAY: f64 = 0.01;

const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// Change per 30 days, rounded to 2 decimals.
    pub rate: f64,
    /// `<metric unit>/month`.
    pub unit: String,
    /// R² in \[0, 1\], rounded to 2 decimals.
    pub confidence: f64,
}

/// Least-squares fit of a first-degree polynomial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Fit `ys` against `xs`.
///
/// When every x is identical the slope is 0 and the line passes through the
/// mean. R² is 0 when the values have no variance, and clamped to \[0, 1\].
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> LinearFit {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return LinearFit {
            slope: 0.0,
            intercept: 0.0,
            r_squared: 0.0,
        };
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);

    let mean_x = crate::mean(xs);
    let mean_y = crate::mean(ys);

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }

    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    let intercept = mean_y - slope * mean_x;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let predicted = slope * x + intercept;
        ss_res += (y - predicted).powi(2);
        ss_tot += (y - mean_y).powi(2);
    }

    let r_squared = if ss_tot > 0.0 {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    } else {
        0.0
    };

    LinearFit {
        slope,
        intercept,
        r_squared,
    }
}

pub fn calculate_trend(series: &MetricSeries) -> Trend {
    let unit = format!("{}/month", series.unit);

    if series.len() < MIN_TREND_POINTS {
        return Trend {
            direction: TrendDirection::InsufficientData,
            rate: 0.0,
            unit,
            confidence: 0.0,
        };
    }

    let first = series.points[0].date;
    let xs: Vec<f64> = series
        .points
        .iter()
        .map(|p| (p.date - first).num_days() as f64)
        .collect();
    let fit = linear_fit(&xs, &series.values());

    let direction = if fit.slope.abs() < STABLE_SLOPE_PER_DAY {
        TrendDirection::Stable
    } else if fit.slope > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };

    Trend {
        direction,
        rate: round_to(fit.slope * DAYS_PER_MONTH, 2),
        unit,
        confidence: round_to(fit.r_squared, 2),
    }
}

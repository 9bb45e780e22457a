//! Rows of the three climate tables and the joined reading view.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::quality::Quality;

/// A monitoring location (`locations` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub region: Option<String>,
}

/// A measured quantity (`metrics` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub id: i64,
    /// Machine name used in filters (e.g. `temperature`).
    pub name: String,
    pub display_name: String,
    pub unit: String,
    pub description: Option<String>,
}

/// A raw `climate_data` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateReading {
    pub id: i64,
    pub location_id: i64,
    pub metric_id: i64,
    pub date: NaiveDate,
    pub value: f64,
    pub quality: Quality,
}

/// A reading joined with its location and metric, as served by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateRecord {
    pub id: i64,
    pub location_id: i64,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub date: NaiveDate,
    pub metric: String,
    pub value: f64,
    pub unit: String,
    pub quality: Quality,
}

impl ClimateRecord {
    /// Join a reading with its location and metric rows.
    pub fn join(reading: &ClimateReading, location: &Location, metric: &Metric) -> Self {
        Self {
            id: reading.id,
            location_id: location.id,
            location_name: location.name.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
            date: reading.date,
            metric: metric.name.clone(),
            value: reading.value,
            unit: metric.unit.clone(),
            quality: reading.quality,
        }
    }
}

impl Entity for Location {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for Metric {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for ClimateReading {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

//! Sample dataset loading and MySQL seeding.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, Row};
use tracing::instrument;

use ecovision_core::{ClimateReading, Location, Metric};

use crate::store::StoreError;

/// Bundled sample dataset (3 locations, 3 metrics, 40 readings).
pub const SAMPLE_DATA: &str = include_str!("../../../data/sample_data.json");

/// Contents of a seed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedDataset {
    pub locations: Vec<Location>,
    pub metrics: Vec<Metric>,
    pub climate_data: Vec<ClimateReading>,
}

impl SeedDataset {
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|e| StoreError::Seed(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Seed(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn sample() -> Result<Self, StoreError> {
        Self::from_json_str(SAMPLE_DATA)
    }
}

/// Row counts per table after seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub locations: i64,
    pub metrics: i64,
    pub climate_data: i64,
}

/// Insert every row of `dataset` in one transaction.
///
/// Either the whole dataset lands or nothing does; primary key clashes with
/// existing rows abort the transaction.
#[instrument(
    skip(pool, dataset),
    fields(
        locations = dataset.locations.len(),
        metrics = dataset.metrics.len(),
        readings = dataset.climate_data.len()
    ),
    err
)]
pub async fn seed_mysql(pool: &MySqlPool, dataset: &SeedDataset) -> Result<SeedReport, StoreError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| StoreError::database("begin_seed", e))?;

    for l in &dataset.locations {
        sqlx::query(
            r#"
            INSERT INTO locations (id, name, country, latitude, longitude, region)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(l.id)
        .bind(&l.name)
        .bind(&l.country)
        .bind(l.latitude)
        .bind(l.longitude)
        .bind(&l.region)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::database("seed_locations", e))?;
    }
    tracing::info!(count = dataset.locations.len(), "inserted locations");

    for m in &dataset.metrics {
        sqlx::query(
            r#"
            INSERT INTO metrics (id, name, display_name, unit, description)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(m.id)
        .bind(&m.name)
        .bind(&m.display_name)
        .bind(&m.unit)
        .bind(&m.description)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::database("seed_metrics", e))?;
    }
    tracing::info!(count = dataset.metrics.len(), "inserted metrics");

    for r in &dataset.climate_data {
        sqlx::query(
            r#"
            INSERT INTO climate_data (id, location_id, metric_id, date, value, quality)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(r.id)
        .bind(r.location_id)
        .bind(r.metric_id)
        .bind(r.date)
        .bind(r.value)
        .bind(r.quality.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::database("seed_climate_data", e))?;
    }
    tracing::info!(count = dataset.climate_data.len(), "inserted climate readings");

    tx.commit()
        .await
        .map_err(|e| StoreError::database("commit_seed", e))?;

    count_rows(pool).await
}

/// Current row counts of the three tables.
pub async fn count_rows(pool: &MySqlPool) -> Result<SeedReport, StoreError> {
    let row = sqlx::query(
        r#"
        SELECT
            (SELECT COUNT(*) FROM locations) AS locations,
            (SELECT COUNT(*) FROM metrics) AS metrics,
            (SELECT COUNT(*) FROM climate_data) AS climate_data
        "#,
    )
    .fetch_one(pool)
    .await
    .map_err(|e| StoreError::database("count_rows", e))?;

    let get = |col: &'static str| {
        row.try_get::<i64, _>(col).map_err(|e| StoreError::Decode {
            column: col,
            message: e.to_string(),
        })
    };

    Ok(SeedReport {
        locations: get("locations")?,
        metrics: get("metrics")?,
        climate_data: get("climate_data")?,
    })
}

//! MySQL-backed climate store.
//!
//! ## Type coercion
//!
//! | column                 | SQL type      | selected as           | Rust type   |
//! |------------------------|---------------|-----------------------|-------------|
//! | `latitude`, `longitude`| `DECIMAL(9,6)`| `CAST(.. AS DOUBLE)`  | `f64`       |
//! | `value`                | `DECIMAL(10,2)`| `CAST(.. AS DOUBLE)` | `f64`       |
//! | `date`                 | `DATE`        | as is                 | `NaiveDate` |
//! | `quality`              | `ENUM`        | `CAST(.. AS CHAR)`    | `Quality`   |
//!
//! ## Thread Safety
//!
//! Uses the SQLx connection pool, which is `Send + Sync` and cheap to clone.

use std::sync::Arc;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Decode, MySql, QueryBuilder, Row, Type};
use tracing::instrument;

use ecovision_core::{ClimateFilter, ClimateRecord, Location, Metric, Pagination, Quality};

use super::{ClimatePage, ClimateStore, StoreError};
use crate::config::DatabaseConfig;
use crate::filters::push_climate_filters;

const RECORD_SELECT: &str = r#"
    SELECT
        cd.id,
        cd.location_id,
        l.name AS location_name,
        CAST(l.latitude AS DOUBLE) AS latitude,
        CAST(l.longitude AS DOUBLE) AS longitude,
        cd.date,
        m.name AS metric,
        CAST(cd.value AS DOUBLE) AS value,
        m.unit,
        CAST(cd.quality AS CHAR) AS quality
    FROM climate_data cd
    JOIN locations l ON cd.location_id = l.id
    JOIN metrics m ON cd.metric_id = m.id
    WHERE 1=1"#;

const RECORD_COUNT: &str = r#"
    SELECT COUNT(*) AS total
    FROM climate_data cd
    JOIN metrics m ON cd.metric_id = m.id
    WHERE 1=1"#;

const RECORD_ORDER: &str = " ORDER BY cd.date, cd.id";

/// MySQL-backed store over the `locations`, `metrics` and `climate_data` tables.
#[derive(Debug, Clone)]
pub struct MySqlClimateStore {
    pool: Arc<MySqlPool>,
}

impl MySqlClimateStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a connection pool using `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options())
            .await
            .map_err(|e| StoreError::database("connect", e))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn column<'r, T>(row: &'r MySqlRow, column: &'static str) -> Result<T, StoreError>
where
    T: Decode<'r, MySql> + Type<MySql>,
{
    row.try_get(column).map_err(|e| StoreError::Decode {
        column,
        message: e.to_string(),
    })
}

fn record_from_row(row: &MySqlRow) -> Result<ClimateRecord, StoreError> {
    let quality: String = column(row, "quality")?;
    let quality: Quality = quality.parse().map_err(|e: ecovision_core::DomainError| {
        StoreError::Decode {
            column: "quality",
            message: e.to_string(),
        }
    })?;

    Ok(ClimateRecord {
        id: column(row, "id")?,
        location_id: column(row, "location_id")?,
        location_name: column(row, "location_name")?,
        latitude: column(row, "latitude")?,
        longitude: column(row, "longitude")?,
        date: column(row, "date")?,
        metric: column(row, "metric")?,
        value: column(row, "value")?,
        unit: column(row, "unit")?,
        quality,
    })
}

#[async_trait::async_trait]
impl ClimateStore for MySqlClimateStore {
    #[instrument(level = "debug", skip(self), err)]
    async fn list_locations(&self) -> Result<Vec<Location>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                id,
                name,
                country,
                CAST(latitude AS DOUBLE) AS latitude,
                CAST(longitude AS DOUBLE) AS longitude,
                region
            FROM locations
            ORDER BY id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| StoreError::database("list_locations", e))?;

        rows.iter()
            .map(|row| -> Result<Location, StoreError> {
                Ok(Location {
                    id: column(row, "id")?,
                    name: column(row, "name")?,
                    country: column(row, "country")?,
                    latitude: column(row, "latitude")?,
                    longitude: column(row, "longitude")?,
                    region: column(row, "region")?,
                })
            })
            .collect()
    }

    #[instrument(level = "debug", skip(self), err)]
    async fn list_metrics(&self) -> Result<Vec<Metric>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, display_name, unit, description
            FROM metrics
            ORDER BY id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| StoreError::database("list_metrics", e))?;

        rows.iter()
            .map(|row| -> Result<Metric, StoreError> {
                Ok(Metric {
                    id: column(row, "id")?,
                    name: column(row, "name")?,
                    display_name: column(row, "display_name")?,
                    unit: column(row, "unit")?,
                    description: column(row, "description")?,
                })
            })
            .collect()
    }

    #[instrument(level = "debug", skip(self), err)]
    async fn query_climate(
        &self,
        filter: &ClimateFilter,
        pagination: Pagination,
    ) -> Result<ClimatePage, StoreError> {
        let mut count = QueryBuilder::<MySql>::new(RECORD_COUNT);
        push_climate_filters(&mut count, filter);
        let total: i64 = count
            .build()
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| StoreError::database("count_climate", e))
            .and_then(|row| column(&row, "total"))?;

        let mut select = QueryBuilder::<MySql>::new(RECORD_SELECT);
        push_climate_filters(&mut select, filter);
        select
            .push(RECORD_ORDER)
            .push(" LIMIT ")
            .push_bind(i64::from(pagination.per_page))
            .push(" OFFSET ")
            .push_bind(pagination.offset() as i64);

        let rows = select
            .build()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| StoreError::database("query_climate", e))?;

        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(total, returned = records.len(), "climate page fetched");

        Ok(ClimatePage {
            records,
            total: total.max(0) as u64,
            pagination,
        })
    }

    #[instrument(level = "debug", skip(self), err)]
    async fn query_series(&self, filter: &ClimateFilter) -> Result<Vec<ClimateRecord>, StoreError> {
        let mut select = QueryBuilder::<MySql>::new(RECORD_SELECT);
        push_climate_filters(&mut select, filter);
        select.push(RECORD_ORDER);

        let rows = select
            .build()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| StoreError::database("query_series", e))?;

        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(returned = records.len(), "climate series fetched");
        Ok(records)
    }
}

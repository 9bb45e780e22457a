//! Table definitions for `locations`, `metrics` and `climate_data`.

use sqlx::MySqlPool;
use tracing::instrument;

use crate::store::StoreError;

/// DDL for the three tables; every statement is `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA_SQL: &str = include_str!("../migrations/0001_climate_schema.sql");

/// Individual statements of [`SCHEMA_SQL`], in execution order.
pub fn statements() -> impl Iterator<Item = &'static str> {
    SCHEMA_SQL
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Create any missing tables.
#[instrument(skip(pool), err)]
pub async fn apply(pool: &MySqlPool) -> Result<(), StoreError> {
    for statement in statements() {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| StoreError::database("apply_schema", e))?;
    }
    tracing::info!("schema applied");
    Ok(())
}

//! Climate data store boundary.
//!
//! One trait, two implementations: MySQL for deployments and an in-memory
//! dataset for development and tests. Both must agree on filter semantics
//! and ordering (by date, then id).

pub mod in_memory;
pub mod mysql;

pub use in_memory::InMemoryClimateStore;
pub use mysql::MySqlClimateStore;

use ecovision_core::{ClimateFilter, ClimateRecord, Location, Metric, Pagination};
use thiserror::Error;

/// One page of joined climate records.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimatePage {
    pub records: Vec<ClimateRecord>,
    /// Total number of records matching the filter (across all pages).
    pub total: u64,
    pub pagination: Pagination,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error in {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to decode {column}: {message}")]
    Decode { column: &'static str, message: String },

    #[error("invalid seed data: {0}")]
    Seed(String),
}

impl StoreError {
    pub(crate) fn database(operation: &'static str, source: sqlx::Error) -> Self {
        Self::Database { operation, source }
    }
}

/// Read access to locations, metrics and climate readings.
#[async_trait::async_trait]
pub trait ClimateStore: Send + Sync {
    async fn list_locations(&self) -> Result<Vec<Location>, StoreError>;

    async fn list_metrics(&self) -> Result<Vec<Metric>, StoreError>;

    /// One page of records matching `filter`, ordered by date.
    async fn query_climate(
        &self,
        filter: &ClimateFilter,
        pagination: Pagination,
    ) -> Result<ClimatePage, StoreError>;

    /// Every record matching `filter`, ordered by date (input for statistics).
    async fn query_series(&self, filter: &ClimateFilter) -> Result<Vec<ClimateRecord>, StoreError>;
}

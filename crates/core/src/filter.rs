//! Filter and pagination criteria shared by every reading query.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::model::ClimateRecord;
use crate::quality::Quality;

/// Optional criteria narrowing a climate reading query.
///
/// Every field is optional; an empty filter selects all readings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimateFilter {
    pub location_id: Option<i64>,
    /// Metric machine name (e.g. `temperature`).
    pub metric: Option<String>,
    /// Inclusive lower date bound.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub end_date: Option<NaiveDate>,
    /// Inclusive minimum quality.
    pub quality_threshold: Option<Quality>,
}

impl ClimateFilter {
    /// Reject filters that can never match because the date range is inverted.
    pub fn validate(&self) -> DomainResult<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(DomainError::validation(format!(
                    "start_date {start} is after end_date {end}"
                )));
            }
        }
        Ok(())
    }

    /// In-process equivalent of the SQL predicate built by the store.
    pub fn matches(&self, record: &ClimateRecord) -> bool {
        if let Some(location_id) = self.location_id {
            if record.location_id != location_id {
                return false;
            }
        }
        if let Some(metric) = &self.metric {
            if &record.metric != metric {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if record.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if record.date > end {
                return false;
            }
        }
        if let Some(threshold) = self.quality_threshold {
            if !record.quality.meets(threshold) {
                return false;
            }
        }
        true
    }
}

/// Page selection for list endpoints (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub const DEFAULT_PER_PAGE: u32 = 50;
    pub const MAX_PER_PAGE: u32 = 1000;

    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(Self::DEFAULT_PER_PAGE)
                .clamp(1, Self::MAX_PER_PAGE),
        }
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use ecovision_core::{ClimateFilter, ClimateRecord, DomainError, DomainResult, Pagination, Quality};
use ecovision_infra::ClimatePage;

// -------------------------
// Query-string DTOs
// -------------------------

/// Raw filter parameters shared by `/climate`, `/summary` and `/trends`.
///
/// Kept as strings so that malformed values produce our own 400 body
/// instead of the extractor's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub location_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub metric: Option<String>,
    pub quality_threshold: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// Empty or whitespace-only values count as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(field: &str, value: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        DomainError::validation(format!("{field} must be a YYYY-MM-DD date, got {value:?}"))
    })
}

/// Oversized values saturate, so `Pagination` clamps them like any other.
fn parse_positive(field: &str, value: &str) -> DomainResult<u32> {
    let digits = value.strip_prefix('+').unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || digits.bytes().all(|b| b == b'0') {
        return Err(DomainError::validation(format!(
            "{field} must be a positive integer, got {value:?}"
        )));
    }
    Ok(digits.parse::<u32>().unwrap_or(u32::MAX))
}

impl FilterParams {
    pub fn into_filter(self) -> DomainResult<ClimateFilter> {
        let location_id = present(&self.location_id)
            .map(|v| {
                v.parse::<i64>().map_err(|_| {
                    DomainError::validation(format!("location_id must be an integer, got {v:?}"))
                })
            })
            .transpose()?;

        let start_date = present(&self.start_date)
            .map(|v| parse_date("start_date", v))
            .transpose()?;
        let end_date = present(&self.end_date)
            .map(|v| parse_date("end_date", v))
            .transpose()?;

        let quality_threshold = present(&self.quality_threshold)
            .map(str::parse::<Quality>)
            .transpose()?;

        let filter = ClimateFilter {
            location_id,
            metric: present(&self.metric).map(str::to_string),
            start_date,
            end_date,
            quality_threshold,
        };
        filter.validate()?;
        Ok(filter)
    }
}

impl PageParams {
    pub fn into_pagination(self) -> DomainResult<Pagination> {
        let page = present(&self.page)
            .map(|v| parse_positive("page", v))
            .transpose()?;
        let per_page = present(&self.per_page)
            .map(|v| parse_positive("per_page", v))
            .transpose()?;
        Ok(Pagination::new(page, per_page))
    }
}

// -------------------------
// Response envelopes
// -------------------------

/// `{"data": ...}` envelope used by every endpoint.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub total_count: u64,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Serialize)]
pub struct ClimateResponse {
    pub data: Vec<ClimateRecord>,
    pub meta: PageMeta,
}

impl From<ClimatePage> for ClimateResponse {
    fn from(page: ClimatePage) -> Self {
        Self {
            meta: PageMeta {
                total_count: page.total,
                page: page.pagination.page,
                per_page: page.pagination.per_page,
            },
            data: page.records,
        }
    }
}

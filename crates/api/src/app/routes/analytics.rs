//! Per-metric summaries and trend analysis over the filtered record set.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    Json,
};

use ecovision_stats::{analyze, group_by_metric, summarize, MetricSummary, TrendAnalysis};

use crate::app::dto::{DataResponse, FilterParams};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn summary(
    Extension(services): Extension<Arc<AppServices>>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<DataResponse<BTreeMap<String, MetricSummary>>>, ApiError> {
    let Query(params) = params?;
    let filter = params.into_filter()?;
    let records = services.store().query_series(&filter).await?;

    let summaries = group_by_metric(&records)
        .into_iter()
        .filter_map(|(metric, series)| summarize(&series).map(|s| (metric, s)))
        .collect();

    Ok(Json(DataResponse::new(summaries)))
}

pub async fn trends(
    Extension(services): Extension<Arc<AppServices>>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<DataResponse<BTreeMap<String, TrendAnalysis>>>, ApiError> {
    let Query(params) = params?;
    let filter = params.into_filter()?;
    let records = services.store().query_series(&filter).await?;

    let analyses = group_by_metric(&records)
        .into_iter()
        .map(|(metric, series)| (metric, analyze(&series)))
        .collect();

    Ok(Json(DataResponse::new(analyses)))
}

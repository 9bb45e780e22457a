use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    Json,
};

use crate::app::dto::{ClimateResponse, FilterParams, PageParams};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn query_climate(
    Extension(services): Extension<Arc<AppServices>>,
    filter: Result<Query<FilterParams>, QueryRejection>,
    page: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<ClimateResponse>, ApiError> {
    let Query(filter) = filter?;
    let Query(page) = page?;
    let filter = filter.into_filter()?;
    let pagination = page.into_pagination()?;

    let page = services.store().query_climate(&filter, pagination).await?;
    tracing::debug!(
        total = page.total,
        returned = page.records.len(),
        "climate query"
    );
    Ok(Json(page.into()))
}

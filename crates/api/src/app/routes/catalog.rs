use std::sync::Arc;

use axum::{extract::Extension, Json};

use ecovision_core::{Location, Metric};

use crate::app::dto::DataResponse;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn list_locations(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<DataResponse<Vec<Location>>>, ApiError> {
    let locations = services.store().list_locations().await?;
    Ok(Json(DataResponse::new(locations)))
}

pub async fn list_metrics(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<DataResponse<Vec<Metric>>>, ApiError> {
    let metrics = services.store().list_metrics().await?;
    Ok(Json(DataResponse::new(metrics)))
}

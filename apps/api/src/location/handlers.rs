use axum::extract::{rejection::QueryRejection, Query};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::location::MapView;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapViewQuery {
    pub country_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// GET /api/v1/map-view
///
/// Where to center the map for a lookup result.
pub async fn handle_map_view(
    query: Result<Query<MapViewQuery>, QueryRejection>,
) -> Result<Json<MapView>, AppError> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;

    Ok(Json(MapView::resolve(
        query.country_code.as_deref(),
        query.latitude,
        query.longitude,
    )))
}

//! Local water requirement endpoints

use axum::Json;

use agri_advisor::water::{self, WaterCatalogue, WaterConditions, WaterEstimate};

use crate::error::ApiResult;

/// POST /api/water/calculate
pub async fn calculate_water(
    Json(conditions): Json<WaterConditions>,
) -> ApiResult<Json<WaterEstimate>> {
    Ok(Json(water::calculate(&conditions)?))
}

/// GET /api/water/catalogue
pub async fn water_catalogue() -> Json<WaterCatalogue> {
    Json(water::catalogue())
}

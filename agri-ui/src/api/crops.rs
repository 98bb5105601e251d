//! Crop knowledge base endpoints

use axum::{extract::Path, Json};

use agri_advisor::crops::{self, CropProfile};

use crate::error::ApiResult;

/// GET /api/crops
pub async fn list_crops() -> Json<&'static [CropProfile]> {
    Json(crops::all())
}

/// GET /api/crops/:id
pub async fn get_crop(Path(id): Path<String>) -> ApiResult<Json<&'static CropProfile>> {
    Ok(Json(crops::lookup(&id)?))
}

//! Image prediction endpoints
//!
//! Accept a multipart upload with an `image` field and relay it to the
//! prediction service unchanged.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::gateway::{DiseasePrediction, ImageUpload, WaterPrediction, IMAGE_FIELD};
use crate::AppState;

/// Reported when the request carries no usable image
pub const NO_IMAGE: &str = "No image selected";

async fn read_image(mut multipart: Multipart) -> ApiResult<ImageUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("image").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        if bytes.is_empty() {
            break;
        }

        return Ok(ImageUpload::new(file_name, content_type, bytes.to_vec()));
    }

    Err(agri_common::Error::InvalidInput(NO_IMAGE.to_string()).into())
}

/// POST /api/predict
pub async fn predict_disease(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<DiseasePrediction>> {
    let image = read_image(multipart).await?;
    info!(file = %image.file_name, bytes = image.bytes.len(), "Disease detection requested");

    let prediction = state.gateway.predict_disease(image).await?;
    Ok(Json(prediction))
}

/// POST /api/predict_water
pub async fn predict_water(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<WaterPrediction>> {
    let image = read_image(multipart).await?;
    info!(file = %image.file_name, bytes = image.bytes.len(), "Water prediction requested");

    let prediction = state.gateway.predict_water(image).await?;
    Ok(Json(prediction))
}

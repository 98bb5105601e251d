//! Crop calendar endpoint

use axum::{extract::Query, Json};
use serde::Deserialize;

use agri_advisor::CalendarQueryResult;

use crate::error::ApiResult;

/// Query string for GET /api/calendar
///
/// Both fields are optional at the HTTP layer so that a missing selection
/// reaches the resolver and gets its user-facing message.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarParams {
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub crop: String,
}

/// GET /api/calendar?month=&crop=
pub async fn query_calendar(
    Query(params): Query<CalendarParams>,
) -> ApiResult<Json<CalendarQueryResult>> {
    let result = agri_advisor::resolve(&params.month, &params.crop)?;
    Ok(Json(result))
}

//! Screen navigation endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use agri_common::Screen;

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ScreenBody {
    pub screen: String,
}

/// GET /api/screen
pub async fn get_screen(State(state): State<AppState>) -> Json<ScreenBody> {
    let current = state.screens.read().await.current();
    Json(ScreenBody {
        screen: current.id().to_string(),
    })
}

/// PUT /api/screen
pub async fn set_screen(
    State(state): State<AppState>,
    Json(body): Json<ScreenBody>,
) -> ApiResult<Json<ScreenBody>> {
    let screen: Screen = body.screen.parse()?;

    // Session file write is blocking I/O; keep it off the async workers
    let screens = state.screens.clone();
    tokio::task::spawn_blocking(move || screens.blocking_write().navigate(screen))
        .await
        .map_err(|e| agri_common::Error::Internal(format!("Screen update task failed: {}", e)))??;

    Ok(Json(ScreenBody {
        screen: screen.id().to_string(),
    }))
}

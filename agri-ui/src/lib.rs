//! agri-ui library - farming advisory service and CLI front end
//!
//! Serves the crop calendar, voice assistant, disease detection and water
//! estimation flows as a JSON API, and renders the same flows for the
//! terminal. Image classification is delegated to the external prediction
//! service through [`gateway::PredictionGateway`].

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use agri_common::ScreenStore;

pub mod api;
pub mod display;
pub mod error;
pub mod gateway;
pub mod speech;

use gateway::PredictionGateway;
use speech::SpeechSynthesizer;

/// Largest accepted upload body
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Prediction service client
    pub gateway: Arc<PredictionGateway>,
    /// Current screen, persisted on every change
    pub screens: Arc<RwLock<ScreenStore>>,
    pub speech: Arc<SpeechSynthesizer>,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(gateway: PredictionGateway, screens: ScreenStore, speech: SpeechSynthesizer) -> Self {
        Self {
            gateway: Arc::new(gateway),
            screens: Arc::new(RwLock::new(screens)),
            speech: Arc::new(speech),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let advisor = Router::new()
        .route("/api/crops", get(api::list_crops))
        .route("/api/crops/:id", get(api::get_crop))
        .route("/api/calendar", get(api::query_calendar))
        .route("/api/assistant", post(api::ask_assistant))
        .route("/api/water/calculate", post(api::calculate_water))
        .route("/api/water/catalogue", get(api::water_catalogue))
        .route("/api/screen", get(api::get_screen).put(api::set_screen));

    let uploads = Router::new()
        .route("/api/predict", post(api::predict_disease))
        .route("/api/predict_water", post(api::predict_water))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .merge(advisor)
        .merge(uploads)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

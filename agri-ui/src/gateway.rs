//! Prediction service client
//!
//! The prediction service is an external HTTP backend that classifies an
//! uploaded plant image. Two image endpoints are used:
//! - disease classification (`/predict` by default)
//! - water need estimation (`/predict_water` by default)
//!
//! Images are posted as multipart with a single `image` field. Both
//! endpoints answer with JSON; a body carrying an `error` field is a
//! failure regardless of HTTP status. Each call is attempted exactly once.
//!
//! The service also offers a factor-based calculation endpoint, an option
//! catalogue and a health probe, which this client exposes as well.

use agri_advisor::water::{WaterCatalogue, WaterConditions, WaterEstimate};
use agri_advisor::DiseaseClass;
use agri_common::config::GatewayConfig;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

const USER_AGENT: &str = concat!("agri-ui/", env!("CARGO_PKG_VERSION"));

/// Multipart field carrying the image bytes
pub const IMAGE_FIELD: &str = "image";

/// Shown when the service cannot be reached
pub const CONNECT_FAILURE: &str = "Failed to connect to prediction service. Please try again.";

/// Shown when the service answers with something unreadable
pub const RESPONSE_FAILURE: &str =
    "Prediction service returned an unexpected response. Please try again.";

/// Shown when the water estimation flow fails for any reason the service
/// did not explain
pub const WATER_FAILURE: &str = "Failed to predict water requirements. Please try again.";

/// Allowed distance of the probability total from 100
const PROBABILITY_TOLERANCE: f64 = 1.0;

/// Prediction service errors
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network communication error (connect, timeout, body read)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Non-success HTTP status without an `error` field
    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    /// Response body is not the expected JSON shape
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Service reported a failure through the `error` field
    #[error("Prediction rejected: {0}")]
    Rejected(String),

    /// Unexplained failure of the water estimation flow
    #[error("Water prediction failed: {0}")]
    WaterFailure(Box<GatewayError>),
}

impl GatewayError {
    /// Message for the error region of the calling flow
    ///
    /// Messages written by the service are relayed as-is; transport and
    /// format problems get a generic retry hint.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Rejected(msg) => msg.clone(),
            GatewayError::NetworkError(_) => CONNECT_FAILURE.to_string(),
            GatewayError::ApiError(..) | GatewayError::ParseError(_) => RESPONSE_FAILURE.to_string(),
            GatewayError::WaterFailure(_) => WATER_FAILURE.to_string(),
        }
    }
}

impl From<GatewayError> for agri_common::Error {
    fn from(err: GatewayError) -> Self {
        agri_common::Error::UpstreamFailure(err.user_message())
    }
}

// ========================================
// Request and response types
// ========================================

/// Image file to submit
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read an image from disk, guessing its content type from the extension
    pub async fn from_path(path: &Path) -> agri_common::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        if bytes.is_empty() {
            return Err(agri_common::Error::InvalidInput(format!(
                "Image file is empty: {}",
                path.display()
            )));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self::new(file_name, content_type_for(path), bytes))
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Disease classification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseasePrediction {
    /// Predicted class label
    pub prediction: String,
    /// Confidence, 0-100
    pub confidence: f64,
    pub severity: String,
    /// Display color for the severity badge
    pub color: String,
    pub description: String,
    pub recommendation: String,
    /// Class label to probability, 0-100 each, totalling about 100
    pub all_probabilities: BTreeMap<String, f64>,
    /// Placeholder prediction rather than live inference
    #[serde(default)]
    pub demo_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DiseasePrediction {
    /// Predicted class, when it is one the catalogue knows
    pub fn class(&self) -> Option<DiseaseClass> {
        self.prediction.parse().ok()
    }

    pub fn probability_total(&self) -> f64 {
        self.all_probabilities.values().sum()
    }

    /// Probabilities with known classes first, in catalogue order
    pub fn ranked_probabilities(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .all_probabilities
            .iter()
            .map(|(label, p)| (label.as_str(), *p))
            .collect();
        ranked.sort_by_key(|(label, _)| {
            label
                .parse::<DiseaseClass>()
                .ok()
                .and_then(|c| DiseaseClass::ALL.iter().position(|k| *k == c))
                .unwrap_or(DiseaseClass::ALL.len())
        });
        ranked
    }
}

/// Water amount as the service reports it (number or preformatted text)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WaterAmount {
    Number(f64),
    Text(String),
}

impl fmt::Display for WaterAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaterAmount::Number(n) => write!(f, "{}", n),
            WaterAmount::Text(s) => f.write_str(s),
        }
    }
}

/// Conditions the service read off the image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub crop_type: String,
    pub growth_stage: String,
    pub soil_type: String,
    pub weather_condition: String,
    pub soil_moisture: String,
    pub disease_status: String,
}

/// Water need estimation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterPrediction {
    pub water_needed: WaterAmount,
    pub base_water: f64,
    pub growth_multiplier: f64,
    pub soil_multiplier: f64,
    pub weather_multiplier: f64,
    pub disease_multiplier: f64,
    pub moisture_adjustment: f64,
    pub image_analysis: ImageAnalysis,
    /// Ordered advice strings
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Health probe answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayStatus {
    pub message: String,
    #[serde(default)]
    pub model_available: bool,
    #[serde(default)]
    pub status: String,
}

// ========================================
// Client
// ========================================

/// Prediction service client
pub struct PredictionGateway {
    http_client: reqwest::Client,
    config: GatewayConfig,
}

impl PredictionGateway {
    /// Create a client for the configured endpoints
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Classify plant disease from an image
    pub async fn predict_disease(&self, image: ImageUpload) -> Result<DiseasePrediction, GatewayError> {
        let url = self.config.disease_url();
        let prediction: DiseasePrediction = self.send_image(&url, image).await?;

        let total = prediction.probability_total();
        if (total - 100.0).abs() > PROBABILITY_TOLERANCE {
            warn!(total, "Class probabilities do not sum to 100");
        }
        if prediction.demo_mode {
            info!("Prediction service is in demo mode");
        }

        Ok(prediction)
    }

    /// Estimate water need from an image
    pub async fn predict_water(&self, image: ImageUpload) -> Result<WaterPrediction, GatewayError> {
        let url = self.config.water_url();
        self.send_image(&url, image).await.map_err(|e| match e {
            GatewayError::Rejected(_) => e,
            other => GatewayError::WaterFailure(Box::new(other)),
        })
    }

    /// Ask the service to compute water need from explicit conditions
    pub async fn calculate_water(
        &self,
        conditions: &WaterConditions,
    ) -> Result<WaterEstimate, GatewayError> {
        let url = self.config.calculate_url();
        let request = self.http_client.post(&url).json(conditions);
        self.execute(&url, request).await
    }

    /// Option lists known to the service
    pub async fn catalogue(&self) -> Result<WaterCatalogue, GatewayError> {
        let url = self.config.catalogue_url();
        let request = self.http_client.get(&url);
        self.execute(&url, request).await
    }

    /// Health probe
    pub async fn status(&self) -> Result<GatewayStatus, GatewayError> {
        let url = self.config.health_url();
        let request = self.http_client.get(&url);
        self.execute(&url, request).await
    }

    async fn send_image<T: DeserializeOwned>(
        &self,
        url: &str,
        image: ImageUpload,
    ) -> Result<T, GatewayError> {
        debug!(
            file = %image.file_name,
            content_type = %image.content_type,
            bytes = image.bytes.len(),
            "Preparing image upload"
        );

        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|e| GatewayError::NetworkError(e.to_string()))?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let request = self.http_client.post(url).multipart(form);
        self.execute(url, request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GatewayError> {
        let request_id = Uuid::new_v4();
        let started = Instant::now();

        debug!(%request_id, url = %url, "Calling prediction service");

        let response = request.send().await.map_err(|e| {
            warn!(%request_id, url = %url, error = %e, "Prediction service unreachable");
            GatewayError::NetworkError(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::NetworkError(e.to_string()))?;

        info!(
            %request_id,
            url = %url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Prediction service responded"
        );

        decode(status, &body).map_err(|e| {
            warn!(%request_id, error = %e, "Prediction service call failed");
            e
        })
    }
}

/// Interpret a response body
///
/// An `error` field wins over everything else, then the HTTP status, then
/// the expected shape.
pub fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, GatewayError> {
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            if status.is_success() {
                return Err(GatewayError::ParseError(e.to_string()));
            }
            return Err(GatewayError::ApiError(status.as_u16(), body.to_string()));
        }
    };

    if let Some(err) = value.get("error").filter(|v| !v.is_null()) {
        let message = err
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return Err(GatewayError::Rejected(message));
    }

    if !status.is_success() {
        return Err(GatewayError::ApiError(status.as_u16(), body.to_string()));
    }

    serde_json::from_value(value).map_err(|e| GatewayError::ParseError(e.to_string()))
}

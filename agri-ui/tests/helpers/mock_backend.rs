//! In-process prediction service
//!
//! Answers like the real backend: multipart `image` uploads on the two
//! prediction routes, JSON on the calculation route, plus the catalogue and
//! health probe. Replies are fixed JSON in the backend's own wire shape.
//! Bound to an ephemeral port on 127.0.0.1.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};


/// Multipart field names and file names seen by the backend
#[derive(Debug, Default)]
pub struct Received {
    pub fields: Vec<String>,
    pub file_names: Vec<String>,
    /// JSON bodies posted to the calculation route
    pub calculate_requests: Vec<Value>,
}

pub struct MockBackend {
    pub base_url: String,
    pub received: Arc<Mutex<Received>>,
}

impl MockBackend {
    pub fn fields(&self) -> Vec<String> {
        self.received.lock().unwrap().fields.clone()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.received.lock().unwrap().file_names.clone()
    }

    pub fn calculate_requests(&self) -> Vec<Value> {
        self.received.lock().unwrap().calculate_requests.clone()
    }
}

type Shared = Arc<Mutex<Received>>;

pub fn disease_body() -> Value {
    json!({
        "prediction": "Early Blight",
        "confidence": 72.4,
        "severity": "Moderate",
        "color": "#ffa500",
        "description": "Early blight is a fungal disease that causes dark brown spots with concentric rings on leaves.",
        "recommendation": "Remove infected leaves, improve air circulation, and consider fungicide treatment.",
        "all_probabilities": {"Healthy": 15.1, "Early Blight": 72.4, "Late Blight": 12.5},
        "demo_mode": true,
        "note": "Demo mode: Using simulated predictions. Train the model for real predictions."
    })
}

pub fn water_body() -> Value {
    json!({
        "water_needed": 1.64,
        "base_water": 1.5,
        "growth_multiplier": 1.2,
        "soil_multiplier": 1.0,
        "weather_multiplier": 1.3,
        "disease_multiplier": 1.0,
        "moisture_adjustment": 0.7,
        "image_analysis": {
            "crop_type": "tomato",
            "growth_stage": "vegetative",
            "soil_type": "loamy",
            "weather_condition": "sunny",
            "soil_moisture": "moist",
            "disease_status": "Healthy"
        },
        "recommendations": ["Water deeply but less frequently to encourage deep roots"],
        "timestamp": "2026-04-02T10:15:00"
    })
}

/// Drain the form, returning the image file name if a non-empty image came
async fn read_form(received: &Shared, mut multipart: Multipart) -> Option<String> {
    let mut image = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap_or_default();

        let mut seen = received.lock().unwrap();
        seen.fields.push(name.clone());
        seen.file_names.push(file_name.clone());

        if name == "image" && !bytes.is_empty() {
            image = Some(file_name);
        }
    }
    image
}

async fn predict(State(received): State<Shared>, multipart: Multipart) -> (StatusCode, Json<Value>) {
    match read_form(&received, multipart).await {
        Some(_) => (StatusCode::OK, Json(disease_body())),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "No image uploaded"})),
        ),
    }
}

async fn predict_water(
    State(received): State<Shared>,
    multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    match read_form(&received, multipart).await {
        Some(name) if name.contains("broken") => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Water prediction failed: cannot identify image file"})),
        ),
        Some(_) => (StatusCode::OK, Json(water_body())),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "No image uploaded"})),
        ),
    }
}

/// Reply for corn / flowering / dry with every other field defaulted,
/// exactly as the backend serializes it
fn corn_flowering_dry_body() -> Value {
    json!({
        "water_needed": 3.04,
        "base_water": 1.8,
        "growth_multiplier": 1.0,
        "soil_multiplier": 1.0,
        "weather_multiplier": 1.3,
        "disease_multiplier": 1.0,
        "moisture_adjustment": 1.3,
        "recommendations": [
            "High water requirement - consider drip irrigation for efficiency",
            "Soil is dry - water immediately",
            "Consider mulching to retain moisture"
        ],
        "detected_conditions": {
            "crop_type": "corn",
            "growth_stage": "flowering",
            "soil_type": "loamy",
            "weather_condition": "sunny",
            "soil_moisture": "dry"
        },
        "timestamp": "2026-04-02T10:15:00.123456",
        "parameters": {
            "crop_type": "corn",
            "soil_type": "loamy",
            "growth_stage": "flowering",
            "weather_condition": "sunny",
            "disease_status": "Healthy",
            "soil_moisture": "dry"
        }
    })
}

async fn calculate(
    State(received): State<Shared>,
    Json(request): Json<Value>,
) -> (StatusCode, Json<Value>) {
    received.lock().unwrap().calculate_requests.push(request.clone());

    let crop = request["crop_type"].as_str().unwrap_or_default().to_lowercase();
    match crop.as_str() {
        "corn" => (StatusCode::OK, Json(corn_flowering_dry_body())),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Crop type not found in database", "water_needed": 0})),
        ),
    }
}

async fn catalogue() -> Json<Value> {
    Json(json!({
        "crops": ["tomato", "potato", "corn", "wheat", "rice"],
        "soil_types": ["sandy", "loamy", "clay"],
        "growth_stages": ["seedling", "vegetative", "flowering", "fruiting", "mature"],
        "weather_conditions": ["sunny", "partly_cloudy", "cloudy", "rainy", "hot", "cool"],
        "soil_moisture_levels": ["dry", "moist", "wet"]
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "message": "Flask server is running!",
        "model_available": false,
        "status": "ready"
    }))
}

async fn html() -> (StatusCode, &'static str) {
    (StatusCode::BAD_GATEWAY, "<html><body>Bad Gateway</body></html>")
}

async fn wrong_shape() -> Json<Value> {
    Json(json!({"prediction": 7}))
}

pub async fn spawn_mock_backend() -> MockBackend {
    let received: Shared = Arc::new(Mutex::new(Received::default()));

    let app = Router::new()
        .route("/predict", post(predict))
        .route("/predict_water", post(predict_water))
        .route("/calculate_water", post(calculate))
        .route("/get_crops", get(catalogue))
        .route("/test", get(health))
        .route("/html", post(html))
        .route("/wrong_shape", post(wrong_shape))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        base_url: format!("http://{}", addr),
        received,
    }
}

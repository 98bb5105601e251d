//! Water requirement calculation
//!
//! Factor-based estimate of weekly water need (inches/week):
//!
//! ```text
//! water_needed = base_water × growth × soil × weather × disease × moisture
//! ```
//!
//! rounded to two decimals. Growth and soil factors come from the crop's
//! water profile; weather, disease and moisture factors from fixed tables.
//! A condition value missing from its table contributes a factor of 1.0.
//! This is the same formula the prediction service applies after it has
//! read the conditions off an image; here the conditions are given directly.

use crate::disease::DiseaseClass;
use agri_common::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// User-facing message for a crop without a water profile
pub const WATER_CROP_NOT_FOUND: &str = "Crop type not found in database";

struct WaterProfile {
    crop: &'static str,
    /// Inches per week
    base_water: f64,
    growth_stages: &'static [(&'static str, f64)],
    soil_preferences: &'static [(&'static str, f64)],
}

static WATER_PROFILES: &[WaterProfile] = &[
    WaterProfile {
        crop: "tomato",
        base_water: 1.5,
        growth_stages: &[
            ("seedling", 0.8),
            ("vegetative", 1.2),
            ("flowering", 1.8),
            ("fruiting", 2.0),
            ("mature", 1.5),
        ],
        soil_preferences: &[("sandy", 1.3), ("loamy", 1.0), ("clay", 0.8)],
    },
    WaterProfile {
        crop: "potato",
        base_water: 1.2,
        growth_stages: &[
            ("seedling", 0.6),
            ("vegetative", 1.0),
            ("flowering", 1.5),
            ("tuber_formation", 1.8),
            ("mature", 1.0),
        ],
        soil_preferences: &[("sandy", 1.2), ("loamy", 1.0), ("clay", 0.9)],
    },
    WaterProfile {
        crop: "corn",
        base_water: 1.8,
        growth_stages: &[
            ("seedling", 0.8),
            ("vegetative", 1.5),
            ("tasseling", 2.2),
            ("silking", 2.5),
            ("mature", 1.8),
        ],
        soil_preferences: &[("sandy", 1.4), ("loamy", 1.0), ("clay", 0.9)],
    },
    WaterProfile {
        crop: "wheat",
        base_water: 1.0,
        growth_stages: &[
            ("seedling", 0.5),
            ("vegetative", 0.8),
            ("flowering", 1.2),
            ("grain_filling", 1.5),
            ("mature", 0.8),
        ],
        soil_preferences: &[("sandy", 1.1), ("loamy", 1.0), ("clay", 0.9)],
    },
    WaterProfile {
        crop: "rice",
        base_water: 3.0,
        growth_stages: &[
            ("seedling", 2.0),
            ("vegetative", 2.5),
            ("flowering", 3.5),
            ("grain_filling", 3.0),
            ("mature", 2.5),
        ],
        soil_preferences: &[("sandy", 1.2), ("loamy", 1.0), ("clay", 0.8)],
    },
];

static WEATHER_IMPACT: &[(&str, f64)] = &[
    ("sunny", 1.3),
    ("partly_cloudy", 1.1),
    ("cloudy", 1.0),
    ("rainy", 0.3),
    ("hot", 1.5),
    ("cool", 0.8),
];

const SOIL_TYPES: [&str; 3] = ["sandy", "loamy", "clay"];
const GROWTH_STAGES: [&str; 5] = ["seedling", "vegetative", "flowering", "fruiting", "mature"];
const MOISTURE_LEVELS: [&str; 3] = ["dry", "moist", "wet"];

fn factor(table: &[(&str, f64)], key: &str) -> f64 {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, f)| *f)
        .unwrap_or(1.0)
}

/// Wet soil needs far less added water, dry soil more
fn moisture_adjustment(soil_moisture: &str) -> f64 {
    match soil_moisture {
        "wet" => 0.3,
        "moist" => 0.7,
        "dry" => 1.3,
        _ => 1.0,
    }
}

/// Round to two decimals from the exact binary value, half to even
///
/// Scaling by 100 first rounds an inexact product, so 0.495 (stored just
/// below) would come out as 0.5.
fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Field conditions for an estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterConditions {
    pub crop_type: String,
    #[serde(default = "default_soil_type")]
    pub soil_type: String,
    #[serde(default = "default_growth_stage")]
    pub growth_stage: String,
    #[serde(default = "default_weather_condition")]
    pub weather_condition: String,
    #[serde(default = "default_disease_status")]
    pub disease_status: String,
    #[serde(default = "default_soil_moisture")]
    pub soil_moisture: String,
}

fn default_soil_type() -> String {
    "loamy".to_string()
}

fn default_growth_stage() -> String {
    "vegetative".to_string()
}

fn default_weather_condition() -> String {
    "sunny".to_string()
}

fn default_disease_status() -> String {
    DiseaseClass::Healthy.label().to_string()
}

fn default_soil_moisture() -> String {
    "moist".to_string()
}

impl WaterConditions {
    /// Conditions for `crop_type` with every other field at its default
    pub fn for_crop(crop_type: impl Into<String>) -> Self {
        Self {
            crop_type: crop_type.into(),
            soil_type: default_soil_type(),
            growth_stage: default_growth_stage(),
            weather_condition: default_weather_condition(),
            disease_status: default_disease_status(),
            soil_moisture: default_soil_moisture(),
        }
    }
}

/// Estimate with its factor breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterEstimate {
    /// Inches per week, rounded to two decimals
    pub water_needed: f64,
    pub base_water: f64,
    pub growth_multiplier: f64,
    pub soil_multiplier: f64,
    pub weather_multiplier: f64,
    pub disease_multiplier: f64,
    pub moisture_adjustment: f64,
    pub recommendations: Vec<String>,
    pub detected_conditions: WaterConditions,
}

/// Compute the water requirement for the given conditions
pub fn calculate(conditions: &WaterConditions) -> Result<WaterEstimate> {
    let crop = conditions.crop_type.trim().to_lowercase();
    let profile = WATER_PROFILES
        .iter()
        .find(|p| p.crop == crop)
        .ok_or_else(|| Error::NotFound(WATER_CROP_NOT_FOUND.to_string()))?;

    let disease = conditions.disease_status.parse::<DiseaseClass>().ok();

    let base_water = profile.base_water;
    let growth_multiplier = factor(profile.growth_stages, &conditions.growth_stage);
    let soil_multiplier = factor(profile.soil_preferences, &conditions.soil_type);
    let weather_multiplier = factor(WEATHER_IMPACT, &conditions.weather_condition);
    let disease_multiplier = disease.map(|d| d.water_adjustment()).unwrap_or(1.0);
    let moisture_adjustment = moisture_adjustment(&conditions.soil_moisture);

    let water_needed = round2(
        base_water
            * growth_multiplier
            * soil_multiplier
            * weather_multiplier
            * disease_multiplier
            * moisture_adjustment,
    );

    debug!(
        crop = %crop,
        water_needed,
        growth_multiplier,
        soil_multiplier,
        weather_multiplier,
        disease_multiplier,
        moisture_adjustment,
        "Calculated water requirement"
    );

    Ok(WaterEstimate {
        water_needed,
        base_water,
        growth_multiplier,
        soil_multiplier,
        weather_multiplier,
        disease_multiplier,
        moisture_adjustment,
        recommendations: recommendations(&crop, water_needed, disease, &conditions.soil_moisture),
        detected_conditions: WaterConditions {
            crop_type: crop,
            ..conditions.clone()
        },
    })
}

/// Watering advice, in order: volume, disease, soil moisture, crop
pub fn recommendations(
    crop: &str,
    water_needed: f64,
    disease: Option<DiseaseClass>,
    soil_moisture: &str,
) -> Vec<String> {
    let mut recs: Vec<&str> = Vec::new();

    if water_needed > 2.0 {
        recs.push("High water requirement - consider drip irrigation for efficiency");
    } else if water_needed < 0.5 {
        recs.push("Low water requirement - avoid overwatering");
    }

    match disease {
        Some(DiseaseClass::EarlyBlight) => {
            recs.push("Reduce overhead watering to prevent fungal spread");
            recs.push("Water at the base of plants only");
        }
        Some(DiseaseClass::LateBlight) => {
            recs.push("Minimize watering until disease is controlled");
            recs.push("Improve soil drainage immediately");
        }
        _ => {}
    }

    match soil_moisture {
        "wet" => {
            recs.push("Soil is already wet - skip watering for now");
            recs.push("Check drainage to prevent root rot");
        }
        "dry" => {
            recs.push("Soil is dry - water immediately");
            recs.push("Consider mulching to retain moisture");
        }
        _ => {}
    }

    match crop {
        "rice" => recs.push("Maintain flooded conditions as required for rice"),
        "tomato" | "pepper" => {
            recs.push("Water deeply but less frequently to encourage deep roots")
        }
        _ => {}
    }

    recs.into_iter().map(String::from).collect()
}

/// Option lists for building a conditions form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterCatalogue {
    pub crops: Vec<String>,
    pub soil_types: Vec<String>,
    pub growth_stages: Vec<String>,
    pub weather_conditions: Vec<String>,
    pub soil_moisture_levels: Vec<String>,
}

pub fn catalogue() -> WaterCatalogue {
    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    WaterCatalogue {
        crops: WATER_PROFILES.iter().map(|p| p.crop.to_string()).collect(),
        soil_types: owned(&SOIL_TYPES),
        growth_stages: owned(&GROWTH_STAGES),
        weather_conditions: WEATHER_IMPACT.iter().map(|(w, _)| w.to_string()).collect(),
        soil_moisture_levels: owned(&MOISTURE_LEVELS),
    }
}

//! Terminal rendering for advisory results.
//!
//! Each renderer returns the full text block; the caller decides where it
//! goes. Condition values arrive snake_case and lower-case, so they are
//! humanized before display.

use std::fmt::Write;

use agri_advisor::water::{WaterCatalogue, WaterEstimate};
use agri_advisor::{CalendarQueryResult, CropProfile, IntentMatch};

use crate::gateway::{DiseasePrediction, GatewayStatus, WaterPrediction};

const BAR_WIDTH: usize = 20;

// ── Value formatting ──

/// Upper-case the first character
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `partly_cloudy` → `Partly cloudy`
pub fn humanize(s: &str) -> String {
    capitalize(&s.replace('_', " "))
}

fn multiplier(value: f64) -> String {
    format!("× {}", value)
}

fn bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

// ── Calendar ──

pub fn render_calendar(result: &CalendarQueryResult) -> String {
    let profile = result.profile;
    let mut out = String::new();

    let _ = writeln!(out, "{}", profile.name);
    let _ = writeln!(
        out,
        "  {} is {}",
        capitalize(result.selected_month.as_str()),
        result.selected_season.as_str().to_uppercase()
    );
    if result.is_good_time {
        let _ = writeln!(out, "  ✓ Good time to plant");
    } else {
        let _ = writeln!(out, "  ✗ Not the ideal planting season");
    }
    out.push('\n');
    out.push_str(&render_profile_body(profile));
    out
}

fn render_profile_body(profile: &CropProfile) -> String {
    let mut out = String::new();
    let seasons: Vec<String> = profile
        .seasons
        .iter()
        .map(|s| s.as_str().to_uppercase())
        .collect();

    let _ = writeln!(out, "  Seasons:     {}", seasons.join(" "));
    let _ = writeln!(out, "  Planting:    {}", profile.planting_time);
    let _ = writeln!(out, "  Harvest:     {}", profile.harvest_time);
    let _ = writeln!(out, "  Fertilizer:");
    for step in profile.fertilizer_schedule {
        let _ = writeln!(out, "    • {}", step);
    }
    let _ = writeln!(out, "  Watering:    {}", profile.watering_needs);
    let _ = writeln!(out, "  Climate:     {}", profile.climate_needs);
    let _ = writeln!(out, "  Tips:        {}", profile.growing_tips);
    out
}

pub fn render_crop_list(crops: &[CropProfile]) -> String {
    let mut out = String::new();
    for crop in crops {
        let seasons: Vec<&str> = crop.seasons.iter().map(|s| s.as_str()).collect();
        let _ = writeln!(out, "{:<14} {:<22} {}", crop.id, crop.name, seasons.join(", "));
    }
    out
}

// ── Assistant ──

pub fn render_reply(reply: &IntentMatch) -> String {
    format!("🤖 {}\n", reply.response)
}

// ── Disease ──

pub fn render_disease(prediction: &DiseasePrediction) -> String {
    let mut out = String::new();

    if prediction.demo_mode {
        let note = prediction
            .note
            .as_deref()
            .unwrap_or("Predictions are simulated, not from a trained model.");
        let _ = writeln!(out, "⚠ Demo Mode: {}", note);
        out.push('\n');
    }

    let _ = writeln!(out, "Diagnosis:   {}", prediction.prediction);
    let _ = writeln!(out, "Confidence:  {:.1}%", prediction.confidence);
    let _ = writeln!(out, "Severity:    {}", prediction.severity);
    out.push('\n');
    let _ = writeln!(out, "{}", prediction.description);
    let _ = writeln!(out, "Recommendation: {}", prediction.recommendation);
    out.push('\n');
    let _ = writeln!(out, "Probabilities:");
    for (label, p) in prediction.ranked_probabilities() {
        let _ = writeln!(out, "  {:<14} {} {:.1}%", label, bar(p), p);
    }
    out
}

// ── Water ──

fn render_factors(
    out: &mut String,
    base_water: f64,
    factors: [(&str, f64); 5],
) {
    let _ = writeln!(out, "  Base water          {} inches/week", base_water);
    for (name, value) in factors {
        let _ = writeln!(out, "  {:<19} {}", name, multiplier(value));
    }
}

fn render_recommendations(out: &mut String, recommendations: &[String]) {
    if recommendations.is_empty() {
        return;
    }
    let _ = writeln!(out, "Recommendations:");
    for rec in recommendations {
        let _ = writeln!(out, "  • {}", rec);
    }
}

pub fn render_water_prediction(prediction: &WaterPrediction) -> String {
    let mut out = String::new();
    let analysis = &prediction.image_analysis;

    let _ = writeln!(out, "Water needed: {} inches/week", prediction.water_needed);
    out.push('\n');
    let _ = writeln!(out, "Detected conditions:");
    let _ = writeln!(out, "  Crop              {}", capitalize(&analysis.crop_type));
    let _ = writeln!(out, "  Growth stage      {}", humanize(&analysis.growth_stage));
    let _ = writeln!(out, "  Soil              {}", capitalize(&analysis.soil_type));
    let _ = writeln!(out, "  Weather           {}", humanize(&analysis.weather_condition));
    let _ = writeln!(out, "  Soil moisture     {}", capitalize(&analysis.soil_moisture));
    let _ = writeln!(out, "  Plant health      {}", analysis.disease_status);
    out.push('\n');
    let _ = writeln!(out, "Calculation:");
    render_factors(
        &mut out,
        prediction.base_water,
        [
            ("Growth stage", prediction.growth_multiplier),
            ("Soil", prediction.soil_multiplier),
            ("Weather", prediction.weather_multiplier),
            ("Plant health", prediction.disease_multiplier),
            ("Soil moisture", prediction.moisture_adjustment),
        ],
    );
    out.push('\n');
    render_recommendations(&mut out, &prediction.recommendations);
    out
}

pub fn render_water_estimate(estimate: &WaterEstimate) -> String {
    let mut out = String::new();
    let conditions = &estimate.detected_conditions;

    let _ = writeln!(
        out,
        "{} ({}, {} soil, {})",
        capitalize(&conditions.crop_type),
        humanize(&conditions.growth_stage),
        conditions.soil_type,
        humanize(&conditions.weather_condition).to_lowercase()
    );
    let _ = writeln!(out, "Water needed: {} inches/week", estimate.water_needed);
    out.push('\n');
    render_factors(
        &mut out,
        estimate.base_water,
        [
            ("Growth stage", estimate.growth_multiplier),
            ("Soil", estimate.soil_multiplier),
            ("Weather", estimate.weather_multiplier),
            ("Plant health", estimate.disease_multiplier),
            ("Soil moisture", estimate.moisture_adjustment),
        ],
    );
    out.push('\n');
    render_recommendations(&mut out, &estimate.recommendations);
    out
}

pub fn render_catalogue(catalogue: &WaterCatalogue) -> String {
    let mut out = String::new();
    let rows: [(&str, &[String]); 5] = [
        ("Crops", &catalogue.crops),
        ("Soil types", &catalogue.soil_types),
        ("Growth stages", &catalogue.growth_stages),
        ("Weather", &catalogue.weather_conditions),
        ("Soil moisture", &catalogue.soil_moisture_levels),
    ];
    for (name, values) in rows {
        let _ = writeln!(out, "{:<14} {}", name, values.join(", "));
    }
    out
}

pub fn render_status(status: &GatewayStatus) -> String {
    let model = if status.model_available {
        "model loaded"
    } else {
        "demo mode"
    };
    format!("{} ({})\n", status.message, model)
}

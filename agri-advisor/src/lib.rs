//! Farming advisory resolver
//!
//! Pure functions over static tables:
//! - `crops`: crop knowledge base
//! - `season`: month to season mapping
//! - `calendar`: planting suitability for a month + crop
//! - `intent`: rule-based assistant replies
//! - `disease`: disease classes reported by the prediction service
//! - `water`: factor-based water requirement estimate
//!
//! Nothing here performs I/O or holds mutable state; repeated calls with
//! the same input return the same output.

pub mod calendar;
pub mod crops;
pub mod disease;
pub mod intent;
pub mod season;
pub mod water;

pub use calendar::{resolve, CalendarQueryResult};
pub use crops::{lookup, CropProfile};
pub use disease::DiseaseClass;
pub use intent::{classify, classify_intent, IntentMatch, Topic};
pub use season::{season_of, Month, Season};
pub use water::{WaterConditions, WaterEstimate};

use agri_common::Result;

/// Validate every static table
///
/// Run once at startup so a broken table fails fast instead of surfacing
/// as a wrong answer later.
pub fn validate_tables() -> Result<()> {
    crops::validate()?;
    intent::validate()?;
    tracing::debug!(
        crops = crops::all().len(),
        intent_rules = intent::rules().len(),
        "Advisory tables validated"
    );
    Ok(())
}

//! Crop calendar queries
//!
//! Combines a crop profile with the season of a selected month to decide
//! whether the month is a good time to plant. Any display delay belongs to
//! the presentation layer; resolution itself is immediate.

use crate::crops::{self, CropProfile};
use crate::season::{Month, Season};
use agri_common::{Error, Result};
use serde::Serialize;
use tracing::debug;

/// User-facing message when either selection is missing
pub const MISSING_SELECTION: &str = "Please select both month and crop";

/// Result of a calendar query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarQueryResult {
    pub profile: &'static CropProfile,
    pub selected_month: Month,
    pub selected_season: Season,
    /// `selected_season` is one of the crop's planting seasons
    pub is_good_time: bool,
}

/// Resolve a month + crop selection
///
/// Errors:
/// - `InvalidInput` when either argument is empty or the month is unknown
/// - `NotFound` when the crop is not in the knowledge base
pub fn resolve(month: &str, crop_id: &str) -> Result<CalendarQueryResult> {
    if month.trim().is_empty() || crop_id.trim().is_empty() {
        return Err(Error::InvalidInput(MISSING_SELECTION.to_string()));
    }

    let profile = crops::lookup(crop_id)?;
    let selected_month: Month = month.parse()?;
    let selected_season = selected_month.season();
    let is_good_time = profile.suits(selected_season);

    debug!(
        crop = profile.id,
        month = %selected_month,
        season = %selected_season,
        is_good_time,
        "Resolved calendar query"
    );

    Ok(CalendarQueryResult {
        profile,
        selected_month,
        selected_season,
        is_good_time,
    })
}

//! Crop knowledge base
//!
//! Static agronomic records, one per crop. The table is compiled into the
//! binary and never mutated; a hash index over it is built on first use.
//! `validate()` checks the table invariants (unique ids, non-empty seasons)
//! and is meant to run once at startup.

use crate::season::Season;
use agri_common::{Error, Result};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// User-facing message for an unknown crop id
pub const CROP_NOT_FOUND: &str = "Crop information not found";

/// Static agronomic record for one crop
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct CropProfile {
    /// Unique lowercase key
    pub id: &'static str,
    pub name: &'static str,
    /// Seasons in which planting is appropriate
    pub seasons: &'static [Season],
    pub planting_time: &'static str,
    pub harvest_time: &'static str,
    /// Chronological fertilizer instructions
    pub fertilizer_schedule: &'static [&'static str],
    pub watering_needs: &'static str,
    pub climate_needs: &'static str,
    pub growing_tips: &'static str,
}

impl CropProfile {
    /// Whether planting in `season` is appropriate
    pub fn suits(&self, season: Season) -> bool {
        self.seasons.contains(&season)
    }
}

static CROPS: &[CropProfile] = &[
    CropProfile {
        id: "tomato",
        name: "Tomato",
        seasons: &[Season::Spring, Season::Summer],
        planting_time: "Plant 2-3 weeks after last frost date",
        harvest_time: "60-85 days from transplanting",
        fertilizer_schedule: &[
            "At planting: Apply balanced fertilizer (10-10-10)",
            "3 weeks after planting: Apply nitrogen-rich fertilizer",
            "When flowers appear: Apply phosphorus-rich fertilizer",
            "Every 2-3 weeks: Apply liquid fertilizer",
        ],
        watering_needs: "Water deeply 1-2 inches per week. Keep soil consistently moist but not waterlogged.",
        climate_needs: "Full sun (6-8 hours daily). Temperature: 65-85°F (18-29°C).",
        growing_tips: "Stake or cage plants for support. Remove suckers for better fruit production. Mulch to retain moisture.",
    },
    CropProfile {
        id: "potato",
        name: "Potato",
        seasons: &[Season::Spring, Season::Fall],
        planting_time: "Plant 2-4 weeks before last frost date",
        harvest_time: "80-120 days from planting",
        fertilizer_schedule: &[
            "Before planting: Apply balanced fertilizer (10-10-10)",
            "When plants are 6 inches tall: Apply nitrogen fertilizer",
            "When flowering begins: Apply potassium-rich fertilizer",
            "Stop fertilizing 2 weeks before harvest",
        ],
        watering_needs: "Water 1-2 inches per week. Increase during tuber formation.",
        climate_needs: "Full sun. Temperature: 60-70°F (15-21°C). Cool weather crop.",
        growing_tips: "Hill soil around plants as they grow. Keep tubers covered to prevent greening.",
    },
    CropProfile {
        id: "onion",
        name: "Onion",
        seasons: &[Season::Spring, Season::Fall],
        planting_time: "Plant in early spring or fall",
        harvest_time: "90-160 days depending on variety",
        fertilizer_schedule: &[
            "Before planting: Apply phosphorus-rich fertilizer",
            "3 weeks after planting: Apply nitrogen fertilizer",
            "When bulbs start forming: Apply balanced fertilizer",
            "Stop fertilizing 3 weeks before harvest",
        ],
        watering_needs: "Water 1 inch per week. Reduce watering as bulbs mature.",
        climate_needs: "Full sun. Temperature: 55-75°F (13-24°C).",
        growing_tips: "Plant in loose, well-draining soil. Space bulbs 4-6 inches apart.",
    },
    CropProfile {
        id: "carrot",
        name: "Carrot",
        seasons: &[Season::Spring, Season::Fall],
        planting_time: "Plant 2-4 weeks before last frost",
        harvest_time: "60-80 days from planting",
        fertilizer_schedule: &[
            "Before planting: Apply phosphorus-rich fertilizer",
            "When tops are 4 inches tall: Apply nitrogen fertilizer",
            "Avoid high nitrogen fertilizers during root development",
        ],
        watering_needs: "Water 1 inch per week. Keep soil consistently moist.",
        climate_needs: "Full sun to partial shade. Temperature: 60-70°F (15-21°C).",
        growing_tips: "Plant in loose, sandy soil. Thin seedlings to prevent crowding.",
    },
    CropProfile {
        id: "cabbage",
        name: "Cabbage",
        seasons: &[Season::Spring, Season::Fall],
        planting_time: "Plant 4-6 weeks before last frost",
        harvest_time: "60-100 days from transplanting",
        fertilizer_schedule: &[
            "Before planting: Apply balanced fertilizer (10-10-10)",
            "3 weeks after planting: Apply nitrogen fertilizer",
            "When heads start forming: Apply balanced fertilizer",
        ],
        watering_needs: "Water 1-1.5 inches per week. Keep soil consistently moist.",
        climate_needs: "Full sun. Temperature: 60-65°F (15-18°C). Cool weather crop.",
        growing_tips: "Plant in rich, well-draining soil. Space plants 12-18 inches apart.",
    },
    CropProfile {
        id: "cauliflower",
        name: "Cauliflower",
        seasons: &[Season::Spring, Season::Fall],
        planting_time: "Plant 4-6 weeks before last frost",
        harvest_time: "55-100 days from transplanting",
        fertilizer_schedule: &[
            "Before planting: Apply balanced fertilizer (10-10-10)",
            "3 weeks after planting: Apply nitrogen fertilizer",
            "When heads start forming: Apply balanced fertilizer",
        ],
        watering_needs: "Water 1-1.5 inches per week. Consistent moisture is crucial.",
        climate_needs: "Full sun. Temperature: 60-65°F (15-18°C). Cool weather crop.",
        growing_tips: "Blanch heads by covering with leaves when they reach 2-3 inches.",
    },
    CropProfile {
        id: "peas",
        name: "Peas",
        seasons: &[Season::Spring, Season::Fall],
        planting_time: "Plant 4-6 weeks before last frost",
        harvest_time: "55-70 days from planting",
        fertilizer_schedule: &[
            "Before planting: Apply phosphorus-rich fertilizer",
            "When plants are 6 inches tall: Apply nitrogen fertilizer",
            "Peas fix their own nitrogen, so avoid over-fertilizing",
        ],
        watering_needs: "Water 1 inch per week. Increase during flowering and pod formation.",
        climate_needs: "Full sun to partial shade. Temperature: 55-70°F (13-21°C).",
        growing_tips: "Provide support for climbing varieties. Harvest regularly to encourage more pods.",
    },
    CropProfile {
        id: "beans",
        name: "Beans",
        seasons: &[Season::Spring, Season::Summer],
        planting_time: "Plant after last frost date",
        harvest_time: "50-65 days from planting",
        fertilizer_schedule: &[
            "Before planting: Apply balanced fertilizer (10-10-10)",
            "When plants are 6 inches tall: Apply nitrogen fertilizer",
            "Beans fix nitrogen, so avoid over-fertilizing",
        ],
        watering_needs: "Water 1 inch per week. Increase during flowering and pod formation.",
        climate_needs: "Full sun. Temperature: 70-80°F (21-27°C).",
        growing_tips: "Provide support for pole beans. Harvest regularly to encourage more pods.",
    },
    CropProfile {
        id: "cucumber",
        name: "Cucumber",
        seasons: &[Season::Spring, Season::Summer],
        planting_time: "Plant 1-2 weeks after last frost",
        harvest_time: "50-70 days from planting",
        fertilizer_schedule: &[
            "Before planting: Apply balanced fertilizer (10-10-10)",
            "When vines start running: Apply nitrogen fertilizer",
            "When flowers appear: Apply phosphorus-rich fertilizer",
        ],
        watering_needs: "Water 1-2 inches per week. Keep soil consistently moist.",
        climate_needs: "Full sun. Temperature: 70-85°F (21-29°C).",
        growing_tips: "Provide support for vining varieties. Harvest regularly to encourage more fruit.",
    },
    CropProfile {
        id: "pepper",
        name: "Pepper",
        seasons: &[Season::Spring, Season::Summer],
        planting_time: "Plant 2-3 weeks after last frost",
        harvest_time: "60-90 days from transplanting",
        fertilizer_schedule: &[
            "Before planting: Apply balanced fertilizer (10-10-10)",
            "3 weeks after planting: Apply nitrogen fertilizer",
            "When flowers appear: Apply phosphorus-rich fertilizer",
            "Every 3-4 weeks: Apply balanced fertilizer",
        ],
        watering_needs: "Water 1-2 inches per week. Allow soil to dry slightly between watering.",
        climate_needs: "Full sun. Temperature: 70-85°F (21-29°C).",
        growing_tips: "Plant in warm soil. Provide support for heavy fruit. Mulch to retain moisture.",
    },
    CropProfile {
        id: "lettuce",
        name: "Lettuce",
        seasons: &[Season::Spring, Season::Fall],
        planting_time: "Plant 4-6 weeks before last frost",
        harvest_time: "45-60 days from planting",
        fertilizer_schedule: &[
            "Before planting: Apply balanced fertilizer (10-10-10)",
            "2 weeks after planting: Apply nitrogen fertilizer",
            "Lettuce is a light feeder, avoid over-fertilizing",
        ],
        watering_needs: "Water 1 inch per week. Keep soil consistently moist.",
        climate_needs: "Partial shade to full sun. Temperature: 60-70°F (15-21°C).",
        growing_tips: "Plant in loose, rich soil. Harvest outer leaves for continuous production.",
    },
    CropProfile {
        id: "spinach",
        name: "Spinach",
        seasons: &[Season::Spring, Season::Fall],
        planting_time: "Plant 4-6 weeks before last frost",
        harvest_time: "40-50 days from planting",
        fertilizer_schedule: &[
            "Before planting: Apply balanced fertilizer (10-10-10)",
            "2 weeks after planting: Apply nitrogen fertilizer",
            "Spinach is a light feeder, avoid over-fertilizing",
        ],
        watering_needs: "Water 1 inch per week. Keep soil consistently moist.",
        climate_needs: "Partial shade to full sun. Temperature: 50-70°F (10-21°C).",
        growing_tips: "Plant in rich, well-draining soil. Harvest outer leaves for continuous production.",
    },
    CropProfile {
        id: "corn",
        name: "Corn",
        seasons: &[Season::Spring, Season::Summer],
        planting_time: "Plant 2 weeks after last frost",
        harvest_time: "60-100 days from planting",
        fertilizer_schedule: &[
            "Before planting: Apply balanced fertilizer (10-10-10)",
            "When plants are 12 inches tall: Apply nitrogen fertilizer",
            "When tassels appear: Apply nitrogen fertilizer",
            "Stop fertilizing when silks appear",
        ],
        watering_needs: "Water 1-2 inches per week. Increase during tasseling and silking.",
        climate_needs: "Full sun. Temperature: 60-95°F (15-35°C).",
        growing_tips: "Plant in blocks for better pollination. Plant multiple rows for cross-pollination.",
    },
    CropProfile {
        id: "wheat",
        name: "Wheat",
        seasons: &[Season::Fall, Season::Spring],
        planting_time: "Plant in fall (winter wheat) or early spring (spring wheat)",
        harvest_time: "110-130 days from planting",
        fertilizer_schedule: &[
            "Before planting: Apply phosphorus and potassium",
            "Early spring: Apply nitrogen fertilizer",
            "When stems start elongating: Apply nitrogen fertilizer",
        ],
        watering_needs: "Water 1-2 inches per week during growing season.",
        climate_needs: "Full sun. Temperature: 60-75°F (15-24°C).",
        growing_tips: "Plant in well-draining soil. Monitor for pests and diseases regularly.",
    },
    CropProfile {
        id: "rice",
        name: "Rice",
        seasons: &[Season::Spring, Season::Summer],
        planting_time: "Plant in spring after last frost",
        harvest_time: "105-150 days from planting",
        fertilizer_schedule: &[
            "Before planting: Apply balanced fertilizer (10-10-10)",
            "When plants are 6 inches tall: Apply nitrogen fertilizer",
            "When panicles form: Apply nitrogen fertilizer",
        ],
        watering_needs: "Keep soil flooded or very wet throughout growing season.",
        climate_needs: "Full sun. Temperature: 70-85°F (21-29°C).",
        growing_tips: "Requires flooded conditions. Plant in clay soil that holds water well.",
    },
    CropProfile {
        id: "cotton",
        name: "Cotton",
        seasons: &[Season::Spring, Season::Summer],
        planting_time: "Plant 2-3 weeks after last frost",
        harvest_time: "150-180 days from planting",
        fertilizer_schedule: &[
            "Before planting: Apply balanced fertilizer (10-10-10)",
            "When plants are 6 inches tall: Apply nitrogen fertilizer",
            "When flowers appear: Apply nitrogen fertilizer",
            "When bolls form: Apply potassium fertilizer",
        ],
        watering_needs: "Water 1-2 inches per week. Increase during flowering and boll formation.",
        climate_needs: "Full sun. Temperature: 70-95°F (21-35°C).",
        growing_tips: "Plant in warm soil. Monitor for pests like boll weevils. Harvest when bolls open.",
    },
    CropProfile {
        id: "sugarcane",
        name: "Sugarcane",
        seasons: &[Season::Spring, Season::Summer],
        planting_time: "Plant in spring after last frost",
        harvest_time: "12-18 months from planting",
        fertilizer_schedule: &[
            "Before planting: Apply balanced fertilizer (10-10-10)",
            "3 months after planting: Apply nitrogen fertilizer",
            "Every 3 months: Apply nitrogen and potassium fertilizer",
            "Stop fertilizing 3 months before harvest",
        ],
        watering_needs: "Water 2-3 inches per week. Requires consistent moisture.",
        climate_needs: "Full sun. Temperature: 70-95°F (21-35°C). Tropical/subtropical crop.",
        growing_tips: "Plant in rich, well-draining soil. Requires long growing season. Harvest in winter.",
    },
];

static INDEX: Lazy<HashMap<&'static str, &'static CropProfile>> =
    Lazy::new(|| CROPS.iter().map(|c| (c.id, c)).collect());

/// Look up a crop by id
///
/// The id is matched after trimming and lower-casing. An unknown id is an
/// ordinary outcome reported as `NotFound`.
pub fn lookup(crop_id: &str) -> Result<&'static CropProfile> {
    let key = crop_id.trim().to_lowercase();
    INDEX
        .get(key.as_str())
        .copied()
        .ok_or_else(|| Error::NotFound(CROP_NOT_FOUND.to_string()))
}

/// All crops in reference order
pub fn all() -> &'static [CropProfile] {
    CROPS
}

/// Check table invariants: unique ids and non-empty season sets
pub fn validate() -> Result<()> {
    validate_table(CROPS)
}

fn validate_table(table: &[CropProfile]) -> Result<()> {
    let mut seen = HashSet::new();
    for crop in table {
        if !seen.insert(crop.id) {
            return Err(Error::Internal(format!("Duplicate crop id: {}", crop.id)));
        }
        if crop.seasons.is_empty() {
            return Err(Error::Internal(format!("Crop {} has no seasons", crop.id)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE_IDS: [&str; 17] = [
        "tomato",
        "potato",
        "onion",
        "carrot",
        "cabbage",
        "cauliflower",
        "peas",
        "beans",
        "cucumber",
        "pepper",
        "lettuce",
        "spinach",
        "corn",
        "wheat",
        "rice",
        "cotton",
        "sugarcane",
    ];

    #[test]
    fn test_table_is_valid() {
        validate().unwrap();
    }

    #[test]
    fn test_reference_crops_present_in_order() {
        let ids: Vec<&str> = all().iter().map(|c| c.id).collect();
        assert_eq!(ids, REFERENCE_IDS);
    }

    #[test]
    fn test_tomato_fertilizer_schedule() {
        let tomato = lookup("tomato").unwrap();
        assert_eq!(tomato.name, "Tomato");
        assert_eq!(tomato.fertilizer_schedule.len(), 4);
        assert!(tomato.fertilizer_schedule[0].starts_with("At planting"));
        assert_eq!(tomato.seasons, &[Season::Spring, Season::Summer]);
    }

    #[test]
    fn test_lookup_normalizes_id() {
        assert_eq!(lookup(" Wheat ").unwrap().id, "wheat");
    }

    #[test]
    fn test_unknown_crop_is_not_found() {
        let err = lookup("quinoa").unwrap_err();
        match err {
            Error::NotFound(msg) => assert_eq!(msg, CROP_NOT_FOUND),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_duplicates_and_empty_seasons() {
        let duplicated = [
            CropProfile { id: "kale", seasons: &[Season::Fall], ..blank() },
            CropProfile { id: "kale", seasons: &[Season::Spring], ..blank() },
        ];
        assert!(validate_table(&duplicated).is_err());

        let seasonless = [CropProfile { id: "kale", seasons: &[], ..blank() }];
        assert!(validate_table(&seasonless).is_err());
    }

    fn blank() -> CropProfile {
        CropProfile {
            id: "",
            name: "",
            seasons: &[],
            planting_time: "",
            harvest_time: "",
            fertilizer_schedule: &[],
            watering_needs: "",
            climate_needs: "",
            growing_tips: "",
        }
    }
}

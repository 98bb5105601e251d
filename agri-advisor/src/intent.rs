//! Voice intent classification
//!
//! Maps a free-text utterance to a canned advisory response. The decision
//! table is an ordered list of topic rules; each topic carries an ordered
//! list of refinements ending in an unconditional fallback. Evaluation is
//! top to bottom and the first match wins, at both levels.
//!
//! Order matters whenever an utterance hits several topics: "how much water
//! does my plant need" contains both "water" and "plant" and resolves to
//! watering because watering is checked before planting.

use agri_common::{Error, Result};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Reply shown when speech capture produced no usable transcript
pub const RECOGNITION_FAILED: &str = "Sorry, I couldn't understand. Please try again.";

/// Reply shown when no topic matches
pub const DEFAULT_RESPONSE: &str = "I'm here to help with your farming questions! You can ask me about plant diseases, watering, planting times, pest control, or general gardening advice. Try asking something specific like \"How to treat plant diseases?\" or \"When to plant tomatoes?\"";

/// Advisory topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Disease,
    Watering,
    Planting,
    Pest,
    Yellowing,
    Fertilizer,
    Soil,
    Default,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topic::Disease => "disease",
            Topic::Watering => "watering",
            Topic::Planting => "planting",
            Topic::Pest => "pest",
            Topic::Yellowing => "yellowing",
            Topic::Fertilizer => "fertilizer",
            Topic::Soil => "soil",
            Topic::Default => "default",
        };
        f.write_str(name)
    }
}

/// Test over the lower-cased utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Any keyword occurs as a substring
    AnyOf(&'static [&'static str]),
    Always,
}

impl Predicate {
    /// `normalized` must already be lower-cased
    pub fn matches(&self, normalized: &str) -> bool {
        match self {
            Predicate::AnyOf(keywords) => keywords.iter().any(|k| normalized.contains(k)),
            Predicate::Always => true,
        }
    }
}

/// One refinement inside a topic
#[derive(Debug)]
pub struct Refinement {
    pub label: &'static str,
    pub predicate: Predicate,
    pub response: &'static str,
}

/// Topic rule: topic predicate plus ordered refinements
#[derive(Debug)]
pub struct IntentRule {
    pub topic: Topic,
    pub predicate: Predicate,
    pub refinements: &'static [Refinement],
}

/// Outcome of classifying an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntentMatch {
    pub topic: Topic,
    pub refinement: &'static str,
    pub response: &'static str,
}

const GENERAL: &str = "general";

static RULES: &[IntentRule] = &[
    IntentRule {
        topic: Topic::Disease,
        predicate: Predicate::AnyOf(&["disease", "sick", "blight"]),
        refinements: &[
            Refinement {
                label: "early_blight",
                predicate: Predicate::AnyOf(&["early blight"]),
                response: "Early blight is a fungal disease that causes dark brown spots with concentric rings on leaves. To treat it, remove infected leaves, improve air circulation, and apply fungicide. Make sure to water at the base of plants to avoid wetting the leaves.",
            },
            Refinement {
                label: "late_blight",
                predicate: Predicate::AnyOf(&["late blight"]),
                response: "Late blight is a serious fungal disease that can quickly destroy plants. Immediate action is required: remove infected plants, apply fungicide, and improve drainage. This disease spreads rapidly in cool, wet conditions.",
            },
            Refinement {
                label: GENERAL,
                predicate: Predicate::Always,
                response: "Common plant diseases include early blight, late blight, and powdery mildew. To prevent diseases, ensure proper spacing between plants, avoid overhead watering, and maintain good air circulation. Remove infected plant parts immediately.",
            },
        ],
    },
    IntentRule {
        topic: Topic::Watering,
        predicate: Predicate::AnyOf(&["water", "irrigation", "watering"]),
        refinements: &[
            Refinement {
                label: "amount",
                predicate: Predicate::AnyOf(&["how much", "amount"]),
                response: "Most crops need about 1 to 1.5 inches of water per week. Water deeply but less frequently to encourage deep root growth. Check soil moisture by sticking your finger 2 inches into the soil. If it feels dry, it's time to water.",
            },
            Refinement {
                label: "timing",
                predicate: Predicate::AnyOf(&["when", "time"]),
                response: "The best time to water is early morning, between 6 AM and 10 AM. This allows plants to absorb water before the heat of the day and reduces evaporation. Avoid watering in the evening as it can promote fungal diseases.",
            },
            Refinement {
                label: GENERAL,
                predicate: Predicate::Always,
                response: "Proper watering is crucial for plant health. Water at the base of plants, not on leaves. Use mulch to retain soil moisture and reduce water evaporation. Consider using drip irrigation for efficient water use.",
            },
        ],
    },
    IntentRule {
        topic: Topic::Planting,
        predicate: Predicate::AnyOf(&["plant", "grow", "sow"]),
        refinements: &[
            Refinement {
                label: "tomato",
                predicate: Predicate::AnyOf(&["tomato"]),
                response: "Tomatoes should be planted after the last frost date in your area. Plant them 2-3 feet apart in well-draining soil with full sun exposure. Stake or cage them for support as they grow.",
            },
            Refinement {
                label: "timing",
                predicate: Predicate::AnyOf(&["when", "time"]),
                response: "Spring is generally the best time to plant most crops. Check your local frost dates and plant after the last frost. Some crops like peas and lettuce can be planted earlier as they tolerate cooler temperatures.",
            },
            Refinement {
                label: GENERAL,
                predicate: Predicate::Always,
                response: "Choose a sunny location with well-draining soil for most plants. Prepare the soil by adding compost or organic matter. Follow the spacing recommendations on seed packets for optimal growth.",
            },
        ],
    },
    IntentRule {
        topic: Topic::Pest,
        predicate: Predicate::AnyOf(&["pest", "insect", "bug", "aphid"]),
        refinements: &[
            Refinement {
                label: "organic",
                predicate: Predicate::AnyOf(&["organic", "natural"]),
                response: "Organic pest control methods include: using neem oil, introducing beneficial insects like ladybugs, planting companion plants like marigolds, and using insecticidal soap. Regular monitoring and early intervention are key.",
            },
            Refinement {
                label: GENERAL,
                predicate: Predicate::Always,
                response: "Common garden pests include aphids, spider mites, and caterpillars. Identify the pest first, then choose the appropriate control method. Consider organic options before using chemical pesticides.",
            },
        ],
    },
    IntentRule {
        topic: Topic::Yellowing,
        predicate: Predicate::AnyOf(&["yellow", "yellowing"]),
        refinements: &[Refinement {
            label: GENERAL,
            predicate: Predicate::Always,
            response: "Yellow leaves can indicate several issues: overwatering, underwatering, nutrient deficiency, or disease. Check soil moisture first. If soil is wet, reduce watering. If dry, increase watering. Consider adding fertilizer if the problem persists.",
        }],
    },
    IntentRule {
        topic: Topic::Fertilizer,
        predicate: Predicate::AnyOf(&["fertilizer", "nutrient"]),
        refinements: &[Refinement {
            label: GENERAL,
            predicate: Predicate::Always,
            response: "Use organic fertilizers like compost, manure, or fish emulsion. Apply fertilizer according to package instructions, usually every 4-6 weeks during the growing season. Avoid over-fertilizing as it can harm plants.",
        }],
    },
    IntentRule {
        topic: Topic::Soil,
        predicate: Predicate::AnyOf(&["soil", "dirt"]),
        refinements: &[Refinement {
            label: GENERAL,
            predicate: Predicate::Always,
            response: "Good soil is essential for healthy plants. Test your soil pH and add amendments as needed. Most vegetables prefer slightly acidic soil (pH 6.0-7.0). Add organic matter like compost to improve soil structure and fertility.",
        }],
    },
    IntentRule {
        topic: Topic::Default,
        predicate: Predicate::Always,
        refinements: &[Refinement {
            label: GENERAL,
            predicate: Predicate::Always,
            response: DEFAULT_RESPONSE,
        }],
    },
];

/// The ordered decision table
pub fn rules() -> &'static [IntentRule] {
    RULES
}

/// Classify an utterance, reporting which topic and refinement matched
pub fn classify_intent(utterance: &str) -> IntentMatch {
    let normalized = utterance.to_lowercase();

    let matched = RULES
        .iter()
        .filter(|rule| rule.predicate.matches(&normalized))
        .find_map(|rule| {
            rule.refinements
                .iter()
                .find(|r| r.predicate.matches(&normalized))
                .map(|r| IntentMatch {
                    topic: rule.topic,
                    refinement: r.label,
                    response: r.response,
                })
        })
        .unwrap_or(IntentMatch {
            topic: Topic::Default,
            refinement: GENERAL,
            response: DEFAULT_RESPONSE,
        });

    debug!(topic = %matched.topic, refinement = matched.refinement, "Classified utterance");
    matched
}

/// Response text for an utterance
pub fn classify(utterance: &str) -> &'static str {
    classify_intent(utterance).response
}

/// Check table invariants
///
/// The final rule and the final refinement of every rule must be
/// unconditional so that classification is total.
pub fn validate() -> Result<()> {
    match RULES.last() {
        Some(rule) if rule.predicate == Predicate::Always => {}
        _ => return Err(Error::Internal("Intent table lacks a final default rule".to_string())),
    }

    for rule in RULES {
        match rule.refinements.last() {
            Some(r) if r.predicate == Predicate::Always => {}
            _ => {
                return Err(Error::Internal(format!(
                    "Topic {} lacks an unconditional fallback",
                    rule.topic
                )))
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_valid() {
        validate().unwrap();
    }

    #[test]
    fn test_reference_topic_order() {
        let order: Vec<Topic> = rules().iter().map(|r| r.topic).collect();
        assert_eq!(
            order,
            vec![
                Topic::Disease,
                Topic::Watering,
                Topic::Planting,
                Topic::Pest,
                Topic::Yellowing,
                Topic::Fertilizer,
                Topic::Soil,
                Topic::Default,
            ]
        );
    }

    #[test]
    fn test_early_blight_refinement_beats_generic_disease() {
        let m = classify_intent("what is early blight");
        assert_eq!(m.topic, Topic::Disease);
        assert_eq!(m.refinement, "early_blight");
        assert!(m.response.starts_with("Early blight is a fungal disease"));
    }

    #[test]
    fn test_late_blight_refinement() {
        let m = classify_intent("My potatoes have LATE BLIGHT");
        assert_eq!(m.refinement, "late_blight");
    }

    #[test]
    fn test_generic_disease() {
        let m = classify_intent("my plant looks sick");
        assert_eq!(m.topic, Topic::Disease);
        assert_eq!(m.refinement, GENERAL);
    }

    #[test]
    fn test_watering_checked_before_planting() {
        let m = classify_intent("how much water does my plant need");
        assert_eq!(m.topic, Topic::Watering);
        assert_eq!(m.refinement, "amount");
    }

    #[test]
    fn test_watering_timing() {
        assert_eq!(classify_intent("when should I irrigate? irrigation time").refinement, "timing");
    }

    #[test]
    fn test_planting_tomato_beats_timing() {
        let m = classify_intent("when do I plant tomatoes");
        assert_eq!(m.topic, Topic::Planting);
        assert_eq!(m.refinement, "tomato");
    }

    #[test]
    fn test_organic_pest_control() {
        let m = classify_intent("natural way to get rid of aphids");
        assert_eq!(m.topic, Topic::Pest);
        assert_eq!(m.refinement, "organic");
    }

    #[test]
    fn test_single_response_topics() {
        assert_eq!(classify_intent("leaves turning yellow").topic, Topic::Yellowing);
        assert_eq!(classify_intent("which fertilizer is best").topic, Topic::Fertilizer);
        assert_eq!(classify_intent("my dirt is hard").topic, Topic::Soil);
    }

    #[test]
    fn test_unmatched_input_gets_default() {
        assert_eq!(classify("xyzzy"), DEFAULT_RESPONSE);
        assert_eq!(classify(""), DEFAULT_RESPONSE);
        assert_eq!(classify_intent("xyzzy").topic, Topic::Default);
    }

    #[test]
    fn test_predicate_matching() {
        assert!(Predicate::AnyOf(&["bug"]).matches("ladybugs everywhere"));
        assert!(!Predicate::AnyOf(&["bug"]).matches("beetles everywhere"));
        assert!(Predicate::Always.matches(""));
    }
}

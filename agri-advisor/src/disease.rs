//! Disease catalogue
//!
//! The classes the prediction service reports, with the advisory text,
//! severity and display color it attaches to each, and the watering
//! adjustment applied when a plant carries the disease.

use agri_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Disease class as labelled by the prediction service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiseaseClass {
    #[serde(rename = "Healthy")]
    Healthy,
    #[serde(rename = "Early Blight")]
    EarlyBlight,
    #[serde(rename = "Late Blight")]
    LateBlight,
}

impl DiseaseClass {
    /// Classes in the order the service reports probabilities
    pub const ALL: [DiseaseClass; 3] = [
        DiseaseClass::Healthy,
        DiseaseClass::EarlyBlight,
        DiseaseClass::LateBlight,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DiseaseClass::Healthy => "Healthy",
            DiseaseClass::EarlyBlight => "Early Blight",
            DiseaseClass::LateBlight => "Late Blight",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DiseaseClass::Healthy => {
                "The plant appears to be healthy with no visible disease symptoms."
            }
            DiseaseClass::EarlyBlight => {
                "Early blight is a fungal disease that causes dark brown spots with concentric rings on leaves."
            }
            DiseaseClass::LateBlight => {
                "Late blight is a serious fungal disease that can quickly destroy entire plants."
            }
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            DiseaseClass::Healthy => {
                "Continue regular monitoring and maintain current care practices."
            }
            DiseaseClass::EarlyBlight => {
                "Remove infected leaves, improve air circulation, and consider fungicide treatment."
            }
            DiseaseClass::LateBlight => {
                "Immediate action required: Remove infected plants, apply fungicide, and improve drainage."
            }
        }
    }

    pub fn severity(&self) -> &'static str {
        match self {
            DiseaseClass::Healthy => "None",
            DiseaseClass::EarlyBlight => "Moderate",
            DiseaseClass::LateBlight => "High",
        }
    }

    /// Hex display color for the severity badge
    pub fn color(&self) -> &'static str {
        match self {
            DiseaseClass::Healthy => "#00e600",
            DiseaseClass::EarlyBlight => "#ffa500",
            DiseaseClass::LateBlight => "#ff0000",
        }
    }

    /// Multiplier on water need; fungal disease calls for less water
    pub fn water_adjustment(&self) -> f64 {
        match self {
            DiseaseClass::Healthy => 1.0,
            DiseaseClass::EarlyBlight => 0.8,
            DiseaseClass::LateBlight => 0.6,
        }
    }
}

impl fmt::Display for DiseaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DiseaseClass {
    type Err = Error;

    /// Accepts the service label ("Early Blight") case-insensitively, and
    /// the snake_case spelling ("early_blight") used on the command line
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('_', " ");
        DiseaseClass::ALL
            .iter()
            .copied()
            .find(|d| d.label().to_lowercase() == wanted)
            .ok_or_else(|| Error::NotFound(format!("Unknown disease class: {}", s.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_back() {
        for class in DiseaseClass::ALL {
            assert_eq!(class.label().parse::<DiseaseClass>().unwrap(), class);
        }
        assert_eq!("early_blight".parse::<DiseaseClass>().unwrap(), DiseaseClass::EarlyBlight);
        assert_eq!("LATE BLIGHT".parse::<DiseaseClass>().unwrap(), DiseaseClass::LateBlight);
    }

    #[test]
    fn test_unknown_label_is_not_found() {
        assert!(matches!("Powdery Mildew".parse::<DiseaseClass>(), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_water_adjustment_decreases_with_severity() {
        assert_eq!(DiseaseClass::Healthy.water_adjustment(), 1.0);
        assert_eq!(DiseaseClass::EarlyBlight.water_adjustment(), 0.8);
        assert_eq!(DiseaseClass::LateBlight.water_adjustment(), 0.6);
    }

    #[test]
    fn test_serde_uses_service_labels() {
        let json = serde_json::to_string(&DiseaseClass::EarlyBlight).unwrap();
        assert_eq!(json, "\"Early Blight\"");
        let parsed: DiseaseClass = serde_json::from_str("\"Late Blight\"").unwrap();
        assert_eq!(parsed, DiseaseClass::LateBlight);
    }
}

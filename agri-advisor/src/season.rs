//! Month to season resolution
//!
//! Fixed meteorological mapping:
//! - December, January, February: winter
//! - March, April, May: spring
//! - June, July, August: summer
//! - September, October, November: fall

use agri_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Season tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Month::January => "january",
            Month::February => "february",
            Month::March => "march",
            Month::April => "april",
            Month::May => "may",
            Month::June => "june",
            Month::July => "july",
            Month::August => "august",
            Month::September => "september",
            Month::October => "october",
            Month::November => "november",
            Month::December => "december",
        }
    }

    /// Season this month belongs to (exhaustive, one season per month)
    pub fn season(&self) -> Season {
        match self {
            Month::December | Month::January | Month::February => Season::Winter,
            Month::March | Month::April | Month::May => Season::Spring,
            Month::June | Month::July | Month::August => Season::Summer,
            Month::September | Month::October | Month::November => Season::Fall,
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Month {
    type Err = Error;

    /// Full month name, case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Month::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown month: {}", s.trim())))
    }
}

/// Season for a month name
pub fn season_of(month: &str) -> Result<Season> {
    month.parse::<Month>().map(|m| m.season())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_month_maps_to_expected_season() {
        let expected = [
            ("january", Season::Winter),
            ("february", Season::Winter),
            ("march", Season::Spring),
            ("april", Season::Spring),
            ("may", Season::Spring),
            ("june", Season::Summer),
            ("july", Season::Summer),
            ("august", Season::Summer),
            ("september", Season::Fall),
            ("october", Season::Fall),
            ("november", Season::Fall),
            ("december", Season::Winter),
        ];
        for (month, season) in expected {
            assert_eq!(season_of(month).unwrap(), season, "{}", month);
        }
    }

    #[test]
    fn test_each_season_has_three_months() {
        for season in Season::ALL {
            let count = Month::ALL.iter().filter(|m| m.season() == season).count();
            assert_eq!(count, 3, "{}", season);
        }
    }

    #[test]
    fn test_month_parse_is_case_insensitive() {
        assert_eq!(season_of("MARCH").unwrap(), Season::Spring);
        assert_eq!(season_of("  December ").unwrap(), Season::Winter);
    }

    #[test]
    fn test_unknown_month_is_invalid_input() {
        for bad in ["", "smarch", "jan", "13"] {
            let err = season_of(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "{:?}", bad);
        }
    }

    #[test]
    fn test_season_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Season::Fall).unwrap(), "\"fall\"");
        assert_eq!(Season::Fall.to_string(), "fall");
    }
}

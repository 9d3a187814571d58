//! Travel modes supported by the directions provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown travel mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown travel mode: {0}")]
pub struct InvalidTravelMode(String);

/// A travel method for which a distinct route may exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    /// Every supported mode, in the order routes are presented.
    pub const ALL: [TravelMode; 4] = [
        TravelMode::Driving,
        TravelMode::Walking,
        TravelMode::Bicycling,
        TravelMode::Transit,
    ];

    /// The provider's name for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a mode case-insensitively.
///
/// Requests use lowercase names while step-level `travel_mode` fields in
/// responses come back uppercase (`"DRIVING"`), so both are accepted.
impl FromStr for TravelMode {
    type Err = InvalidTravelMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TravelMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| InvalidTravelMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_modes_in_presentation_order() {
        let names: Vec<_> = TravelMode::ALL.iter().map(TravelMode::as_str).collect();
        assert_eq!(names, vec!["driving", "walking", "bicycling", "transit"]);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("driving".parse::<TravelMode>().unwrap(), TravelMode::Driving);
        assert_eq!("TRANSIT".parse::<TravelMode>().unwrap(), TravelMode::Transit);
        assert_eq!("Walking".parse::<TravelMode>().unwrap(), TravelMode::Walking);
    }

    #[test]
    fn parse_unknown_mode() {
        let err = "flying".parse::<TravelMode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown travel mode: flying");
    }

    #[test]
    fn serde_uses_provider_names() {
        assert_eq!(
            serde_json::to_string(&TravelMode::Bicycling).unwrap(),
            "\"bicycling\""
        );
        let mode: TravelMode = serde_json::from_str("\"transit\"").unwrap();
        assert_eq!(mode, TravelMode::Transit);
    }
}

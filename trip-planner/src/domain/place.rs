//! Place identifiers and place references.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid place identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid place id: {reason}")]
pub struct InvalidPlaceId {
    reason: &'static str,
}

/// A stable external place identifier, as issued by the places provider.
///
/// Place ids are opaque, but they are embedded in pipe-delimited query
/// parameters, so this type rejects anything that would corrupt that
/// encoding: empty strings, whitespace, and `|`.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::PlaceId;
///
/// let id = PlaceId::parse("ChIJN1t_tDeuEmsRUsoyG83frY4").unwrap();
/// assert_eq!(id.as_provider_ref(), "place_id:ChIJN1t_tDeuEmsRUsoyG83frY4");
///
/// assert!(PlaceId::parse("").is_err());
/// assert!(PlaceId::parse("a|b").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaceId(String);

impl PlaceId {
    /// Parse a place id from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidPlaceId> {
        if s.is_empty() {
            return Err(InvalidPlaceId {
                reason: "must not be empty",
            });
        }

        if s.chars().any(char::is_whitespace) {
            return Err(InvalidPlaceId {
                reason: "must not contain whitespace",
            });
        }

        if s.contains('|') {
            return Err(InvalidPlaceId {
                reason: "must not contain '|'",
            });
        }

        Ok(PlaceId(s.to_string()))
    }

    /// Returns the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Renders the id as a provider place reference (`place_id:<id>`).
    pub fn as_provider_ref(&self) -> String {
        format!("place_id:{}", self.0)
    }
}

impl FromStr for PlaceId {
    type Err = InvalidPlaceId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlaceId::parse(s)
    }
}

impl TryFrom<String> for PlaceId {
    type Error = InvalidPlaceId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PlaceId::parse(&value)
    }
}

impl From<PlaceId> for String {
    fn from(id: PlaceId) -> Self {
        id.0
    }
}

impl fmt::Debug for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlaceId({})", self.0)
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A saved place usable as a trip origin, destination or waypoint.
///
/// Values are immutable once fetched; holders clone them rather than
/// sharing references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRef {
    #[serde(rename = "placeId")]
    pub id: PlaceId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub photo_refs: Vec<String>,
}

impl PlaceRef {
    /// Creates a place with just an id, name and position.
    pub fn new(id: PlaceId, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name: name.into(),
            latitude,
            longitude,
            address: None,
            phone: None,
            website: None,
            photo_refs: Vec::new(),
        }
    }

    /// Sets the postal address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ids() {
        assert!(PlaceId::parse("ChIJN1t_tDeuEmsRUsoyG83frY4").is_ok());
        assert!(PlaceId::parse("X").is_ok());
        assert!(PlaceId::parse("abc-123_DEF").is_ok());
    }

    #[test]
    fn reject_empty() {
        assert_eq!(
            PlaceId::parse("").unwrap_err().to_string(),
            "invalid place id: must not be empty"
        );
    }

    #[test]
    fn reject_whitespace() {
        assert!(PlaceId::parse("a b").is_err());
        assert!(PlaceId::parse(" a").is_err());
        assert!(PlaceId::parse("a\n").is_err());
    }

    #[test]
    fn reject_pipe() {
        assert!(PlaceId::parse("a|b").is_err());
        assert!(PlaceId::parse("|").is_err());
    }

    #[test]
    fn provider_ref() {
        let id = PlaceId::parse("X").unwrap();
        assert_eq!(id.as_provider_ref(), "place_id:X");
    }

    #[test]
    fn display_and_debug() {
        let id = PlaceId::parse("abc").unwrap();
        assert_eq!(format!("{}", id), "abc");
        assert_eq!(format!("{:?}", id), "PlaceId(abc)");
    }

    #[test]
    fn deserialize_rejects_invalid_id() {
        let result: Result<PlaceId, _> = serde_json::from_str("\"has space\"");
        assert!(result.is_err());

        let id: PlaceId = serde_json::from_str("\"ok\"").unwrap();
        assert_eq!(id.as_str(), "ok");
    }

    #[test]
    fn place_ref_serializes_camel_case() {
        let place = PlaceRef::new(PlaceId::parse("P1").unwrap(), "Harbour", -33.85, 151.21)
            .with_address("1 Harbour St");
        let json = serde_json::to_value(&place).unwrap();

        assert_eq!(json["placeId"], "P1");
        assert_eq!(json["address"], "1 Harbour St");
        assert!(json["photoRefs"].as_array().unwrap().is_empty());

        let back: PlaceRef = serde_json::from_value(json).unwrap();
        assert_eq!(back, place);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any id without whitespace or pipes parses and keeps its text
        #[test]
        fn valid_ids_roundtrip(s in "[A-Za-z0-9_:-]{1,40}") {
            let id = PlaceId::parse(&s).unwrap();
            prop_assert_eq!(id.as_str(), s.as_str());
        }

        /// Ids containing a pipe are always rejected
        #[test]
        fn pipes_rejected(a in "[a-z]{0,5}", b in "[a-z]{0,5}") {
            let s = format!("{a}|{b}");
            prop_assert!(PlaceId::parse(&s).is_err());
        }
    }
}

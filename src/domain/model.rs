use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::TrackerError;

/// 使用者對某一天的心情標記
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoodTag {
    Great,
    Good,
    Meh,
    Low,
    Awful,
}

impl MoodTag {
    pub const ALL: [MoodTag; 5] = [
        MoodTag::Great,
        MoodTag::Good,
        MoodTag::Meh,
        MoodTag::Low,
        MoodTag::Awful,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            MoodTag::Great => ":D",
            MoodTag::Good => ":)",
            MoodTag::Meh => ":/",
            MoodTag::Low => ":(",
            MoodTag::Awful => "T^T",
        }
    }
}

impl fmt::Display for MoodTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for MoodTag {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoodTag::ALL
            .into_iter()
            .find(|tag| tag.symbol() == s.trim())
            .ok_or_else(|| TrackerError::parse(format!("Unknown mood tag: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Places provider 的回應（GeoJSON FeatureCollection 的子集）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlacesResponse {
    #[serde(default)]
    pub features: Vec<PlaceFeature>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceFeature {
    #[serde(default)]
    pub properties: PlaceProperties,
    #[serde(default)]
    pub geometry: PlaceGeometry,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceProperties {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub formatted: Option<String>,
}

/// `coordinates` 的順序是 `[lon, lat]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceGeometry {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

impl PlaceGeometry {
    pub fn position(&self) -> Option<LatLon> {
        match self.coordinates.as_slice() {
            [lon, lat, ..] => Some(LatLon::new(*lat, *lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicRecord {
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
    pub categories: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_tag_symbols_roundtrip() {
        for tag in MoodTag::ALL {
            assert_eq!(tag.symbol().parse::<MoodTag>().unwrap(), tag);
        }
        assert!("xD".parse::<MoodTag>().is_err());
    }

    #[test]
    fn test_geometry_reads_lon_then_lat() {
        let geometry = PlaceGeometry {
            coordinates: vec![77.391, 28.5355],
        };
        let position = geometry.position().unwrap();
        assert_eq!(position.lat, 28.5355);
        assert_eq!(position.lon, 77.391);

        assert!(PlaceGeometry { coordinates: vec![1.0] }.position().is_none());
    }

    #[test]
    fn test_places_response_tolerates_missing_fields() {
        let json = serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {"properties": {"name": "A"}, "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
                {"properties": {}}
            ]
        });
        let response: PlacesResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.features.len(), 2);
        assert_eq!(response.features[0].properties.name.as_deref(), Some("A"));
        assert!(response.features[1].properties.categories.is_empty());
        assert!(response.features[1].geometry.position().is_none());
    }
}

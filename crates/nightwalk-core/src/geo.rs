use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A WGS84 point as the backend and the map both express it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `[lat, lng]` pair, the shape polylines use.
    #[must_use]
    pub const fn to_pair(self) -> [f64; 2] {
        [self.lat, self.lng]
    }

    #[must_use]
    pub const fn from_pair(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[0],
            lng: pair[1],
        }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

impl std::str::FromStr for LatLng {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_coordinates(s)
    }
}

fn coordinate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(-?\d+\.?\d*)(?:\s*,\s*|\s+)(-?\d+\.?\d*)$")
            .expect("coordinate pattern is valid")
    })
}

/// Parse `"25.033, 121.565"` (comma and/or whitespace separated) into a point.
///
/// # Errors
///
/// Returns [`CoreError::InvalidCoordinates`] when the text is not two numbers
/// or the point falls outside the valid latitude/longitude range.
pub fn parse_coordinates(input: &str) -> Result<LatLng, CoreError> {
    let invalid = |reason: &str| CoreError::InvalidCoordinates {
        input: input.to_owned(),
        reason: reason.to_owned(),
    };

    let caps = coordinate_pattern()
        .captures(input.trim())
        .ok_or_else(|| invalid("expected \"lat, lng\""))?;

    let lat = caps[1]
        .parse::<f64>()
        .map_err(|e| invalid(&format!("latitude: {e}")))?;
    let lng = caps[2]
        .parse::<f64>()
        .map_err(|e| invalid(&format!("longitude: {e}")))?;

    let point = LatLng::new(lat, lng);
    if !point.is_valid() {
        return Err(invalid("coordinates out of range"));
    }
    Ok(point)
}

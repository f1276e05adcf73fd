use serde::{Deserialize, Serialize};

use crate::geo::LatLng;
use crate::road::RoadSafetyData;
use crate::summary::SafetyApiResponse;

/// Payload of a `location_update` frame from the live-location socket.
///
/// The simulator may embed a fresh road payload and an already-converted
/// safety view model alongside the position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roads: Option<RoadSafetyData>,
    #[serde(
        default,
        rename = "safetyData",
        skip_serializing_if = "Option::is_none"
    )]
    pub safety_data: Option<SafetyApiResponse>,
}

impl LocationUpdate {
    #[must_use]
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

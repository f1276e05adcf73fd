//! Road-segment safety payload.
//!
//! Passed through from the backend untouched. Note the backend's road scale
//! differs from the area summary: roads use `level` 3 for the safest tier
//! and a 60-point threshold, so road `level`/`label` are kept as sent.

use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    pub road_name: String,
    pub road_type: String,
    pub safety_score: f64,
    pub level: i32,
    pub label: String,
    pub cctv_count: u32,
    pub metro_count: u32,
    /// Ordered `[lat, lng]` polyline.
    pub nodes: Vec<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robbery_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streetlight_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub police_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<LatLng>,
}

impl Road {
    #[must_use]
    pub fn points(&self) -> Vec<LatLng> {
        self.nodes.iter().copied().map(LatLng::from_pair).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSafetySummary {
    pub overall_score: f64,
    pub level: i32,
    pub label: String,
    pub total_roads: u32,
    pub total_cctv: u32,
    pub total_metro: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_robbery: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_streetlight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_police: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSafetyData {
    pub roads: Vec<Road>,
    pub summary: RoadSafetySummary,
}

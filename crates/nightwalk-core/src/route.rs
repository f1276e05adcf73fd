//! Candidate routes compared by the backend's `find_safe_routes` endpoint.

use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub segment_index: u32,
    pub location: LatLng,
    pub cctv_count: u32,
    pub metro_count: u32,
    pub robbery_count: u32,
    pub streetlight_count: u32,
    pub police_count: u32,
    pub safety_score: f64,
    pub level: i32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub total_segments: u32,
    pub total_cctv: u32,
    pub total_metro: u32,
    pub total_robbery: u32,
    pub total_streetlight: u32,
    pub total_police: u32,
    pub overall_score: f64,
    pub level: i32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedRoute {
    pub route_index: u32,
    pub is_recommended: bool,
    /// `[lat, lng]` polyline.
    pub geometry: Vec<[f64; 2]>,
    pub distance_m: f64,
    pub duration_s: f64,
    pub summary: RouteSummary,
    #[serde(default)]
    pub segments: Vec<RouteSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeRoutesResponse {
    pub start: LatLng,
    pub end: LatLng,
    pub radius_m: f64,
    pub total_routes: u32,
    pub recommended_route_index: u32,
    pub routes: Vec<AnalyzedRoute>,
}

impl SafeRoutesResponse {
    #[must_use]
    pub fn recommended(&self) -> Option<&AnalyzedRoute> {
        self.routes
            .iter()
            .find(|r| r.is_recommended)
            .or_else(|| {
                self.routes
                    .iter()
                    .find(|r| r.route_index == self.recommended_route_index)
            })
    }
}

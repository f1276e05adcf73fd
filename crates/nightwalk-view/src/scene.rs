//! Map rendering: turns the current view model into a [`MapScene`].
//!
//! Rendering is pure. Which layers appear is decided by [`MapViewConfig`];
//! the only state is the [`Viewport`], which follows the center and keeps
//! whatever zoom the user chose.

use nightwalk_core::{LatLng, Meta, Road, SafeRoutesResponse, SafetyPlace};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::components::hours_text;
use crate::marker::UserMarker;
use crate::style::{
    place_icon, road_color, road_level_color, safety_color, Icon, ALTERNATE_ROUTE_COLOR,
    ANALYSIS_COLOR, TRAIL_COLOR, USER_MARKER_COLOR,
};

pub const DEFAULT_ZOOM: u8 = 15;

/// Characters `encodeURIComponent` leaves alone.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Optional map layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct MapViewConfig {
    pub movement_trail: bool,
    pub road_overlay: bool,
    pub current_position: bool,
    pub analysis_circle: bool,
    pub user_markers: bool,
    pub route_overlay: bool,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            movement_trail: true,
            road_overlay: true,
            current_position: true,
            analysis_circle: true,
            user_markers: true,
            route_overlay: true,
        }
    }
}

impl MapViewConfig {
    /// Roads and the analysis area only, for the standalone road view.
    #[must_use]
    pub fn roads_only() -> Self {
        Self {
            movement_trail: false,
            road_overlay: true,
            current_position: false,
            analysis_circle: true,
            user_markers: false,
            route_overlay: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
}

impl Viewport {
    #[must_use]
    pub fn new(center: LatLng) -> Self {
        Self {
            center,
            zoom: DEFAULT_ZOOM,
        }
    }

    /// Moves to `center`, keeping zoom. Returns whether the center changed.
    pub fn recenter(&mut self, center: LatLng) -> bool {
        if self.center == center {
            return false;
        }
        self.center = center;
        true
    }
}

/// Center and radius of the most recent area analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisArea {
    pub center: LatLng,
    pub radius_m: f64,
}

impl From<&Meta> for AnalysisArea {
    fn from(meta: &Meta) -> Self {
        Self {
            center: meta.center,
            radius_m: meta.radius_m,
        }
    }
}

/// Everything the map draws, borrowed from application state.
#[derive(Debug, Clone, Copy)]
pub struct MapViewInput<'a> {
    pub viewport: Viewport,
    pub places: &'a [SafetyPlace],
    pub roads: &'a [Road],
    pub trail: &'a [LatLng],
    pub analysis: Option<AnalysisArea>,
    pub is_moving: bool,
    pub markers: &'a [UserMarker],
    pub routes: Option<&'a SafeRoutesResponse>,
}

impl MapViewInput<'_> {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            places: &[],
            roads: &[],
            trail: &[],
            analysis: None,
            is_moving: false,
            markers: &[],
            routes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PopupAction {
    Call { number: String },
    Directions { url: String },
    Search { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popup {
    pub title: String,
    pub lines: Vec<String>,
    /// Colored label shown beside the title, e.g. a road's safety level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<PopupAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub text: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneMarker {
    pub position: LatLng,
    pub icon: Option<Icon>,
    pub color: Option<&'static str>,
    pub popup: Popup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneCircle {
    pub center: LatLng,
    pub radius_m: f64,
    pub color: &'static str,
    pub fill_opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolylineKind {
    Trail,
    Road,
    Route { recommended: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenePolyline {
    pub kind: PolylineKind,
    pub points: Vec<LatLng>,
    pub color: &'static str,
    pub weight: u8,
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<&'static str>,
    pub popup: Popup,
}

/// Pinned icon at the viewport center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PositionIcon {
    pub icon: Icon,
    pub moving: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapScene {
    pub center: LatLng,
    pub zoom: u8,
    pub polylines: Vec<ScenePolyline>,
    pub circles: Vec<SceneCircle>,
    pub markers: Vec<SceneMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_position: Option<PositionIcon>,
}

#[must_use]
pub fn directions_url(position: LatLng) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={},{}",
        position.lat, position.lng
    )
}

#[must_use]
pub fn search_url(name: &str) -> String {
    let encoded = utf8_percent_encode(name, QUERY_COMPONENT);
    format!("https://www.google.com/search?q={encoded}")
}

fn coords(p: LatLng) -> String {
    format!("{:.6}, {:.6}", p.lat, p.lng)
}

#[must_use]
pub fn render_map(config: &MapViewConfig, input: &MapViewInput<'_>) -> MapScene {
    let mut scene = MapScene {
        center: input.viewport.center,
        zoom: input.viewport.zoom,
        polylines: Vec::new(),
        circles: Vec::new(),
        markers: Vec::new(),
        current_position: None,
    };

    if config.movement_trail {
        if let Some(trail) = trail_polyline(input.trail) {
            scene.polylines.push(trail);
        }
    }

    if config.road_overlay {
        scene.polylines.extend(input.roads.iter().map(road_polyline));
    }

    if config.route_overlay {
        if let Some(routes) = input.routes {
            push_routes(&mut scene, routes);
        }
    }

    if config.current_position {
        scene.current_position = Some(PositionIcon {
            icon: if input.is_moving { Icon::Runner } else { Icon::Person },
            moving: input.is_moving,
        });
    }

    if config.analysis_circle {
        if let Some(area) = input.analysis {
            push_analysis_area(&mut scene, area);
        }
    }

    if config.user_markers {
        for marker in input.markers {
            push_user_marker(&mut scene, marker);
        }
    }

    scene
        .markers
        .extend(input.places.iter().map(place_marker));

    tracing::trace!(
        polylines = scene.polylines.len(),
        circles = scene.circles.len(),
        markers = scene.markers.len(),
        "map scene rendered"
    );
    scene
}

fn trail_polyline(trail: &[LatLng]) -> Option<ScenePolyline> {
    let (first, last) = match trail {
        [first, .., last] => (*first, *last),
        _ => return None,
    };
    Some(ScenePolyline {
        kind: PolylineKind::Trail,
        points: trail.to_vec(),
        color: TRAIL_COLOR,
        weight: 4,
        opacity: 0.8,
        dash: Some("10, 5"),
        popup: Popup {
            title: "Movement trail".to_owned(),
            lines: vec![
                format!("Points: {}", trail.len()),
                format!("Start: {}", coords(first)),
                format!("End: {}", coords(last)),
            ],
            badge: None,
            actions: Vec::new(),
        },
    })
}

fn road_polyline(road: &Road) -> ScenePolyline {
    ScenePolyline {
        kind: PolylineKind::Road,
        points: road.points(),
        color: road_color(road.safety_score),
        weight: 5,
        opacity: 0.7,
        dash: None,
        popup: Popup {
            title: road.road_name.clone(),
            lines: vec![
                format!("Type: {}", road.road_type),
                format!("Safety score: {}", road.safety_score),
                format!("CCTV: {}", road.cctv_count),
                format!("Metro stations: {}", road.metro_count),
            ],
            badge: Some(Badge {
                text: road.label.clone(),
                color: road_level_color(road.level),
            }),
            actions: Vec::new(),
        },
    }
}

fn push_routes(scene: &mut MapScene, routes: &SafeRoutesResponse) {
    let recommended = routes.recommended().map(|r| r.route_index);
    // Alternates first so the recommended route is drawn on top.
    let mut ordered: Vec<_> = routes.routes.iter().collect();
    ordered.sort_by_key(|r| Some(r.route_index) == recommended);

    for route in ordered {
        let is_recommended = Some(route.route_index) == recommended;
        scene.polylines.push(ScenePolyline {
            kind: PolylineKind::Route {
                recommended: is_recommended,
            },
            points: route.geometry.iter().copied().map(LatLng::from_pair).collect(),
            color: if is_recommended {
                road_color(route.summary.overall_score)
            } else {
                ALTERNATE_ROUTE_COLOR
            },
            weight: if is_recommended { 7 } else { 4 },
            opacity: if is_recommended { 0.9 } else { 0.6 },
            dash: (!is_recommended).then_some("8, 6"),
            popup: Popup {
                title: format!(
                    "Route {}{}",
                    route.route_index + 1,
                    if is_recommended { " (recommended)" } else { "" }
                ),
                lines: vec![
                    format!("Distance: {:.0}m", route.distance_m),
                    format!("Duration: {:.0} min", route.duration_s / 60.0),
                    format!(
                        "Safety score: {} ({})",
                        route.summary.overall_score, route.summary.label
                    ),
                    format!(
                        "CCTV: {}, streetlights: {}, police: {}",
                        route.summary.total_cctv,
                        route.summary.total_streetlight,
                        route.summary.total_police
                    ),
                ],
                badge: None,
                actions: Vec::new(),
            },
        });
    }
}

fn push_analysis_area(scene: &mut MapScene, area: AnalysisArea) {
    scene.markers.push(SceneMarker {
        position: area.center,
        icon: Some(Icon::Target),
        color: Some(ANALYSIS_COLOR),
        popup: Popup {
            title: "Analysis center".to_owned(),
            lines: vec![
                format!("Coordinates: {}", coords(area.center)),
                format!("Radius: {}m", area.radius_m),
            ],
            badge: None,
            actions: Vec::new(),
        },
    });
    scene.circles.push(SceneCircle {
        center: area.center,
        radius_m: area.radius_m,
        color: ANALYSIS_COLOR,
        fill_opacity: 0.1,
        dash: Some("5, 5"),
    });
}

fn push_user_marker(scene: &mut MapScene, marker: &UserMarker) {
    scene.markers.push(SceneMarker {
        position: marker.position,
        icon: None,
        color: None,
        popup: Popup {
            title: marker.label.clone(),
            lines: vec![
                format!("Coordinates: {}", coords(marker.position)),
                format!("Radius: {}m", marker.radius_m),
            ],
            badge: None,
            actions: Vec::new(),
        },
    });
    scene.circles.push(SceneCircle {
        center: marker.position,
        radius_m: marker.radius_m,
        color: USER_MARKER_COLOR,
        fill_opacity: 0.2,
        dash: None,
    });
}

fn place_marker(place: &SafetyPlace) -> SceneMarker {
    let mut lines = Vec::with_capacity(2);
    let mut actions = Vec::with_capacity(3);

    if let Some(phone) = place.phone() {
        lines.push(phone.to_owned());
        actions.push(PopupAction::Call {
            number: phone.to_owned(),
        });
    }
    lines.push(hours_text(place));
    actions.push(PopupAction::Directions {
        url: directions_url(place.location),
    });
    actions.push(PopupAction::Search {
        url: search_url(&place.name),
    });

    SceneMarker {
        position: place.location,
        icon: Some(place_icon(place.place_type)),
        color: Some(safety_color(place.safety)),
        popup: Popup {
            title: place.name.clone(),
            lines,
            badge: None,
            actions,
        },
    }
}

#[cfg(test)]
#[path = "scene_test.rs"]
mod tests;

//! Icons, colors and labels shared by the map and the panels.

use nightwalk_core::{PlaceType, SafetyClass, SafetyCode};
use serde::Serialize;

pub const ANALYSIS_COLOR: &str = "#6366f1";
pub const USER_MARKER_COLOR: &str = "#3b82f6";
pub const TRAIL_COLOR: &str = "#3b82f6";
pub const ALTERNATE_ROUTE_COLOR: &str = "#94a3b8";

const ROAD_SAFE: &str = "#22c55e";
const ROAD_CAUTION: &str = "#eab308";
const ROAD_DANGER: &str = "#ef4444";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Store,
    Shield,
    Camera,
    Train,
    Lightbulb,
    AlertTriangle,
    MapPin,
    Target,
    Person,
    Runner,
}

/// Map marker icon for a place; unrecognized types fall back to the store icon.
#[must_use]
pub fn place_icon(place_type: PlaceType) -> Icon {
    match place_type {
        PlaceType::Police => Icon::Shield,
        PlaceType::Cctv => Icon::Camera,
        PlaceType::Metro => Icon::Train,
        PlaceType::Streetlight => Icon::Lightbulb,
        PlaceType::RobberyIncident => Icon::AlertTriangle,
        PlaceType::Store | PlaceType::Unknown => Icon::Store,
    }
}

/// List-row icon; unlike the map, unknown types get a plain pin.
#[must_use]
pub fn list_icon(place_type: PlaceType) -> Icon {
    match place_type {
        PlaceType::Unknown => Icon::MapPin,
        other => place_icon(other),
    }
}

#[must_use]
pub fn safety_color(code: SafetyCode) -> &'static str {
    match code.class() {
        SafetyClass::Safe => "#3CCF4E",
        SafetyClass::Caution => "#FFC107",
        SafetyClass::Incident => "#DC2626",
        SafetyClass::Unknown => "#FF5252",
    }
}

/// Polyline color for a road or route score. Uses the road scale (60/40).
#[must_use]
pub fn road_color(score: f64) -> &'static str {
    if score >= 60.0 {
        ROAD_SAFE
    } else if score >= 40.0 {
        ROAD_CAUTION
    } else {
        ROAD_DANGER
    }
}

/// Color for a backend road `level`, where 3 is the safest tier.
#[must_use]
pub fn road_level_color(level: i32) -> &'static str {
    match level {
        3 => ROAD_SAFE,
        2 => ROAD_CAUTION,
        _ => ROAD_DANGER,
    }
}

#[must_use]
pub fn type_label(place_type: PlaceType) -> &'static str {
    match place_type {
        PlaceType::Store => "Store",
        PlaceType::Police => "Police station",
        PlaceType::Cctv => "CCTV",
        PlaceType::Metro => "Metro station",
        PlaceType::Streetlight => "Streetlight",
        PlaceType::RobberyIncident => "Robbery incident",
        PlaceType::Unknown => "Other",
    }
}

/// Background tone of a list row or panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Safe,
    Caution,
    Incident,
    Danger,
}

#[must_use]
pub fn place_tone(code: SafetyCode) -> Tone {
    match code.class() {
        SafetyClass::Safe => Tone::Safe,
        SafetyClass::Caution => Tone::Caution,
        SafetyClass::Incident => Tone::Incident,
        SafetyClass::Unknown => Tone::Danger,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icons_by_type() {
        assert_eq!(place_icon(PlaceType::Police), Icon::Shield);
        assert_eq!(place_icon(PlaceType::RobberyIncident), Icon::AlertTriangle);
        assert_eq!(place_icon(PlaceType::Unknown), Icon::Store);
        assert_eq!(list_icon(PlaceType::Unknown), Icon::MapPin);
        assert_eq!(list_icon(PlaceType::Metro), Icon::Train);
    }

    #[test]
    fn safety_colors() {
        assert_eq!(safety_color(SafetyCode(1)), "#3CCF4E");
        assert_eq!(safety_color(SafetyCode(2)), "#FFC107");
        assert_eq!(safety_color(SafetyCode(-1)), "#DC2626");
        assert_eq!(safety_color(SafetyCode(0)), "#FF5252");
        assert_eq!(safety_color(SafetyCode(7)), "#FF5252");
    }

    #[test]
    fn road_colors_at_boundaries() {
        assert_eq!(road_color(60.0), "#22c55e");
        assert_eq!(road_color(59.9), "#eab308");
        assert_eq!(road_color(40.0), "#eab308");
        assert_eq!(road_color(39.9), "#ef4444");
    }

    #[test]
    fn road_level_colors_use_inverted_scale() {
        assert_eq!(road_level_color(3), "#22c55e");
        assert_eq!(road_level_color(2), "#eab308");
        assert_eq!(road_level_color(1), "#ef4444");
    }

    #[test]
    fn tones() {
        assert_eq!(place_tone(SafetyCode::INCIDENT), Tone::Incident);
        assert_eq!(place_tone(SafetyCode(5)), Tone::Danger);
    }
}

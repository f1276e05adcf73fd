//! Panel models: score indicator, area summary, place list, road summary.
//!
//! Each component is a plain value built from the view model so a front end
//! only has to lay it out.

use nightwalk_core::{RoadSafetyData, SafetyApiResponse, SafetyLevel, SafetyPlace};
use serde::Serialize;

use crate::style::{list_icon, place_tone, road_level_color, safety_color, type_label, Icon, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    Smile,
    Neutral,
    Frown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreIndicator {
    pub level: SafetyLevel,
    pub label: &'static str,
    pub color: &'static str,
    pub face: Face,
    pub score: f64,
    /// Bar fill in percent, `min(score, 100)`.
    pub progress: f64,
}

impl ScoreIndicator {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        let level = SafetyLevel::from_score(score);
        let (color, face) = match level {
            SafetyLevel::Safe => ("#4CAF50", Face::Smile),
            SafetyLevel::Caution => ("#FFD700", Face::Neutral),
            SafetyLevel::Danger => ("#DC2626", Face::Frown),
        };
        Self {
            level,
            label: level.label(),
            color,
            face,
            score,
            progress: score.min(100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryPanel {
    pub tone: Tone,
    pub label: String,
    pub status: &'static str,
    pub score_text: String,
    pub safe_places: u32,
    pub warning_zones: u32,
    pub lighting_text: String,
    pub police_distance_text: String,
    pub last_incident_text: String,
    /// `lat, lng` to six decimals, only when the response carried `meta`.
    pub center_text: Option<String>,
}

impl SummaryPanel {
    #[must_use]
    pub fn from_response(data: &SafetyApiResponse) -> Self {
        let summary = &data.summary;
        let analysis = summary.analysis();
        let (tone, status) = match summary.level() {
            SafetyLevel::Safe => (Tone::Safe, "This area is safe"),
            SafetyLevel::Caution => (
                Tone::Caution,
                "Stay alert here; travel with company if you can",
            ),
            SafetyLevel::Danger => (Tone::Danger, "High risk at night; avoid this area"),
        };

        Self {
            tone,
            label: summary.label().to_owned(),
            status,
            score_text: format!("{:.1}", summary.safety_score()),
            safe_places: analysis.safe_places,
            warning_zones: analysis.warning_zones,
            lighting_text: format!("{:.1}", analysis.lighting_score),
            police_distance_text: format!("{}m", analysis.police_distance_m),
            last_incident_text: format!("{} days ago", analysis.last_incident_days),
            center_text: data
                .center()
                .map(|c| format!("{:.6}, {:.6}", c.lat, c.lng)),
        }
    }
}

/// Opening-hours line shared by list rows and map popups.
#[must_use]
pub fn hours_text(place: &SafetyPlace) -> String {
    if let Some(open) = place.open_now {
        return open_label(open).to_owned();
    }
    match place.hours.as_ref().and_then(|h| h.regular.first()) {
        Some(slot) => format!("Today {}-{}", slot.open, slot.close),
        None => "Hours unknown".to_owned(),
    }
}

fn open_label(open: bool) -> &'static str {
    if open {
        "Open now"
    } else {
        "Closed"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceRow {
    pub icon: Icon,
    pub icon_color: &'static str,
    pub tone: Tone,
    pub name: String,
    pub type_label: &'static str,
    pub distance_text: String,
    pub open_status: Option<&'static str>,
    pub incident_lines: Vec<String>,
    pub phone: Option<String>,
    pub signals: Vec<String>,
}

impl PlaceRow {
    #[must_use]
    pub fn from_place(place: &SafetyPlace) -> Self {
        let incident_lines = place
            .incident()
            .map(|d| {
                [
                    d.date.map(|v| format!("Date: {v}")),
                    d.time.map(|v| format!("Time: {v}")),
                    d.location_desc.map(|v| format!("Location: {v}")),
                ]
                .into_iter()
                .flatten()
                .collect()
            })
            .unwrap_or_default();

        Self {
            icon: list_icon(place.place_type),
            icon_color: safety_color(place.safety),
            tone: place_tone(place.safety),
            name: place.name.clone(),
            type_label: type_label(place.place_type),
            distance_text: format!("{}m", place.distance_m),
            open_status: place.open_now.map(open_label),
            incident_lines,
            phone: place.phone().map(str::to_owned),
            signals: place.signals.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceList {
    pub title: String,
    pub rows: Vec<PlaceRow>,
}

/// Rows for `places`, or `None` when there is nothing to list.
#[must_use]
pub fn place_list(places: &[SafetyPlace]) -> Option<PlaceList> {
    if places.is_empty() {
        return None;
    }
    Some(PlaceList {
        title: format!("Safe places ({})", places.len()),
        rows: places.iter().map(PlaceRow::from_place).collect(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadSummaryPanel {
    pub label: String,
    pub badge_color: &'static str,
    pub overall_score: f64,
    pub total_roads: u32,
    pub total_cctv: u32,
    pub total_metro: u32,
}

impl RoadSummaryPanel {
    #[must_use]
    pub fn from_data(data: &RoadSafetyData) -> Self {
        let s = &data.summary;
        Self {
            label: s.label.clone(),
            badge_color: road_level_color(s.level),
            overall_score: s.overall_score,
            total_roads: s.total_roads,
            total_cctv: s.total_cctv,
            total_metro: s.total_metro,
        }
    }
}

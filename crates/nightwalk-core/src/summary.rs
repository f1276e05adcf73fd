//! Area safety summary and the view model the map renders.
//!
//! A summary's `level` and `label` are derived from `safety_score` on
//! construction and on deserialization, so the two can never disagree no
//! matter where the JSON came from.

use serde::{Deserialize, Serialize};

use crate::geo::LatLng;
use crate::place::SafetyPlace;
use crate::CoreError;

/// Scores at or above this are [`SafetyLevel::Safe`].
pub const SAFE_THRESHOLD: f64 = 70.0;
/// Scores at or above this (and below [`SAFE_THRESHOLD`]) are [`SafetyLevel::Caution`].
pub const CAUTION_THRESHOLD: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SafetyLevel {
    Safe,
    Caution,
    Danger,
}

impl SafetyLevel {
    /// Three-way threshold classification. Lower bounds are inclusive and a
    /// NaN score falls through to [`SafetyLevel::Danger`].
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= SAFE_THRESHOLD {
            Self::Safe
        } else if score >= CAUTION_THRESHOLD {
            Self::Caution
        } else {
            Self::Danger
        }
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Safe => 1,
            Self::Caution => 2,
            Self::Danger => 3,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Caution => "caution",
            Self::Danger => "danger",
        }
    }
}

impl From<SafetyLevel> for u8 {
    fn from(level: SafetyLevel) -> Self {
        level.as_u8()
    }
}

impl TryFrom<u8> for SafetyLevel {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Safe),
            2 => Ok(Self::Caution),
            3 => Ok(Self::Danger),
            other => Err(CoreError::InvalidLevel(other)),
        }
    }
}

impl std::fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyAnalysis {
    pub safe_places: u32,
    pub warning_zones: u32,
    /// Streetlight density; not clamped, so it can exceed 1.
    pub lighting_score: f64,
    pub police_distance_m: f64,
    pub last_incident_days: u32,
}

#[derive(Debug, Deserialize)]
struct SummaryWire {
    safety_score: f64,
    analysis: SafetyAnalysis,
}

impl From<SummaryWire> for SafetySummary {
    fn from(wire: SummaryWire) -> Self {
        Self::from_score(wire.safety_score, wire.analysis)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SummaryWire")]
pub struct SafetySummary {
    level: SafetyLevel,
    label: String,
    safety_score: f64,
    analysis: SafetyAnalysis,
}

impl SafetySummary {
    #[must_use]
    pub fn from_score(safety_score: f64, analysis: SafetyAnalysis) -> Self {
        let level = SafetyLevel::from_score(safety_score);
        Self {
            level,
            label: level.label().to_owned(),
            safety_score,
            analysis,
        }
    }

    #[must_use]
    pub fn level(&self) -> SafetyLevel {
        self.level
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn safety_score(&self) -> f64 {
        self.safety_score
    }

    #[must_use]
    pub fn analysis(&self) -> &SafetyAnalysis {
        &self.analysis
    }
}

/// Analysis context echoed back by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub at: String,
    pub center: LatLng,
    pub radius_m: f64,
    pub tz: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyApiResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    pub summary: SafetySummary,
    #[serde(default)]
    pub places: Vec<SafetyPlace>,
}

impl SafetyApiResponse {
    /// Analysis center, when the backend echoed one.
    #[must_use]
    pub fn center(&self) -> Option<LatLng> {
        self.meta.as_ref().map(|m| m.center)
    }

    /// Same response re-centered on `center`, keeping every other field.
    #[must_use]
    pub fn with_center(mut self, center: LatLng) -> Self {
        if let Some(meta) = self.meta.as_mut() {
            meta.center = center;
        }
        self
    }
}

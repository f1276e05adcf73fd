//! Points of interest returned by the safety backend.
//!
//! Every resource bucket (`cctv`, `metro`, `criminal`, `streetlight`,
//! `police`) uses the same record shape; incident-only fields are present on
//! `robbery_incident` entries. The backend sends `phone: ""` rather than
//! omitting the key, so [`SafetyPlace::phone`] filters empty strings.

use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceType {
    Store,
    Police,
    Cctv,
    Metro,
    Streetlight,
    RobberyIncident,
    #[serde(other)]
    Unknown,
}

impl PlaceType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Police => "police",
            Self::Cctv => "cctv",
            Self::Metro => "metro",
            Self::Streetlight => "streetlight",
            Self::RobberyIncident => "robbery_incident",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PlaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw integer safety code attached to each place.
///
/// Kept as the backend's integer so unknown codes survive a round trip;
/// use [`SafetyCode::class`] to interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SafetyCode(pub i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafetyClass {
    Safe,
    Caution,
    Incident,
    Unknown,
}

impl SafetyCode {
    pub const SAFE: Self = Self(1);
    pub const CAUTION: Self = Self(2);
    pub const INCIDENT: Self = Self(-1);

    #[must_use]
    pub const fn class(self) -> SafetyClass {
        match self.0 {
            1 => SafetyClass::Safe,
            2 => SafetyClass::Caution,
            -1 => SafetyClass::Incident,
            _ => SafetyClass::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySlot {
    pub dow: String,
    pub open: String,
    pub close: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub tz: String,
    #[serde(default)]
    pub regular: Vec<WeeklySlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyPlace {
    pub safety: SafetyCode,
    #[serde(rename = "type")]
    pub place_type: PlaceType,
    pub name: String,
    pub location: LatLng,
    pub distance_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<OpeningHours>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signals: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_desc: Option<String>,
}

/// Incident-specific fields of a `robbery_incident` place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncidentDetails<'a> {
    pub date: Option<&'a str>,
    pub time: Option<&'a str>,
    pub location_desc: Option<&'a str>,
}

impl SafetyPlace {
    /// Dialable phone number, if the backend supplied a non-empty one.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref().filter(|p| !p.trim().is_empty())
    }

    #[must_use]
    pub fn is_incident(&self) -> bool {
        self.place_type == PlaceType::RobberyIncident
    }

    /// Incident details; `None` for every type other than `robbery_incident`.
    #[must_use]
    pub fn incident(&self) -> Option<IncidentDetails<'_>> {
        fn non_empty(s: &Option<String>) -> Option<&str> {
            s.as_deref().filter(|v| !v.is_empty())
        }

        self.is_incident().then(|| IncidentDetails {
            date: non_empty(&self.incident_date),
            time: non_empty(&self.incident_time),
            location_desc: non_empty(&self.location_desc),
        })
    }
}

//! Raw `get_safety_data` response shape, before conversion to the view model.
//!
//! The backend groups places into per-type resource buckets, truncated to a
//! couple of entries each, while `summary.analysis` carries the full counts.
//! Counts and buckets the backend leaves out are treated as zero/empty.

use nightwalk_core::{Meta, SafetyPlace};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
pub struct RawSafetyResponse {
    #[serde(default)]
    pub meta: Option<Meta>,
    pub summary: RawSummary,
    pub resources: RawResources,
}

#[derive(Debug, Deserialize)]
pub struct RawSummary {
    pub safety_score: f64,
    #[serde(default)]
    pub analysis: RawAnalysis,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAnalysis {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cctv_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metro_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub robbery_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub streetlight_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub police_count: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawResources {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cctv: Vec<SafetyPlace>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metro: Vec<SafetyPlace>,
    /// Reported incidents (`robbery_incident` places).
    #[serde(default, deserialize_with = "null_as_default")]
    pub criminal: Vec<SafetyPlace>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub streetlight: Vec<SafetyPlace>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub police: Vec<SafetyPlace>,
}

/// Explicit `null` reads as the type's default, like an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

//! Conversion from the raw `get_safety_data` payload to [`SafetyApiResponse`].
//!
//! Only the `metro`, `streetlight` and `police` buckets become map places, in
//! that order. CCTV cameras and reported incidents still count towards the
//! summary through `analysis`, but are not listed.

use nightwalk_core::{SafetyAnalysis, SafetyApiResponse, SafetySummary};

use crate::error::ApiError;
use crate::types::RawSafetyResponse;

/// Streetlight count that maps to a lighting score of 1.0.
pub const LIGHTING_DIVISOR: f64 = 30.0;
/// Reported as the police distance when no station is in range.
pub const NO_POLICE_DISTANCE_M: f64 = 999.0;
/// The backend has no incident history yet; this is reported for every area.
pub const LAST_INCIDENT_DAYS: u32 = 30;

/// Validates a raw JSON body and converts it into the view model.
///
/// # Errors
///
/// Returns [`ApiError::Schema`] if the body has no `resources` object, no
/// numeric `summary.safety_score`, or a malformed resource record. Nothing is
/// returned on failure.
pub fn convert_value(body: serde_json::Value) -> Result<SafetyApiResponse, ApiError> {
    if !body
        .get("resources")
        .is_some_and(serde_json::Value::is_object)
    {
        tracing::error!(
            keys = ?body.as_object().map(|o| o.keys().cloned().collect::<Vec<_>>()),
            "safety payload has no resources object"
        );
        return Err(ApiError::schema(
            "resources",
            "response has no resources object",
        ));
    }

    if !body
        .get("summary")
        .and_then(|s| s.get("safety_score"))
        .is_some_and(serde_json::Value::is_number)
    {
        return Err(ApiError::schema(
            "summary.safety_score",
            "response has no numeric safety score",
        ));
    }

    let raw: RawSafetyResponse =
        serde_json::from_value(body).map_err(|e| ApiError::schema("payload", e.to_string()))?;

    Ok(convert(raw))
}

/// Converts an already-typed raw payload. Infallible: every field the view
/// model needs is present by construction.
#[must_use]
pub fn convert(raw: RawSafetyResponse) -> SafetyApiResponse {
    let RawSafetyResponse {
        meta,
        summary,
        resources,
    } = raw;
    let counts = summary.analysis;

    let police_distance_m = resources
        .police
        .first()
        .map_or(NO_POLICE_DISTANCE_M, |p| p.distance_m);

    tracing::debug!(
        metro = resources.metro.len(),
        streetlight = resources.streetlight.len(),
        police = resources.police.len(),
        ignored_cctv = resources.cctv.len(),
        ignored_criminal = resources.criminal.len(),
        "converting safety payload"
    );

    let places = resources
        .metro
        .into_iter()
        .chain(resources.streetlight)
        .chain(resources.police)
        .collect::<Vec<_>>();

    let analysis = SafetyAnalysis {
        safe_places: counts
            .cctv_count
            .saturating_add(counts.metro_count)
            .saturating_add(counts.police_count),
        warning_zones: counts.robbery_count,
        lighting_score: f64::from(counts.streetlight_count) / LIGHTING_DIVISOR,
        police_distance_m,
        last_incident_days: LAST_INCIDENT_DAYS,
    };

    SafetyApiResponse {
        meta,
        summary: SafetySummary::from_score(summary.safety_score, analysis),
        places,
    }
}

/// Loads a view model from pasted JSON text.
///
/// Text in the raw backend shape (it has a `resources` key) is converted;
/// anything else must already be a [`SafetyApiResponse`].
///
/// # Errors
///
/// Returns [`ApiError::Deserialize`] for text that is not valid JSON or not a
/// view model, and the [`convert_value`] errors for raw payloads.
pub fn parse_json_input(text: &str) -> Result<SafetyApiResponse, ApiError> {
    let value: serde_json::Value =
        serde_json::from_str(text.trim()).map_err(|e| ApiError::Deserialize {
            context: "JSON input".to_owned(),
            source: e,
        })?;

    if value.get("resources").is_some() {
        return convert_value(value);
    }

    serde_json::from_value(value).map_err(|e| ApiError::Deserialize {
        context: "JSON input (view model)".to_owned(),
        source: e,
    })
}

#[cfg(test)]
#[path = "convert_test.rs"]
mod tests;

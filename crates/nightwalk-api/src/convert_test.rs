use nightwalk_core::{PlaceType, SafetyLevel};
use serde_json::{json, Value};

use super::*;

fn place(kind: &str, safety: i32, name: &str, distance_m: u32) -> Value {
    json!({
        "safety": safety,
        "type": kind,
        "name": name,
        "location": { "lat": 25.034, "lng": 121.565 },
        "distance_m": distance_m,
        "phone": ""
    })
}

/// The night-time Xinyi sample: one entry per bucket, police empty.
fn sample_payload() -> Value {
    json!({
        "meta": {
            "at": "2025-11-08T23:00:00+08:00",
            "center": { "lat": 25.033964, "lng": 121.564468 },
            "radius_m": 200,
            "tz": "Asia/Taipei"
        },
        "summary": {
            "safety_score": 45.5,
            "analysis": {
                "cctv_count": 8,
                "metro_count": 2,
                "robbery_count": 1,
                "streetlight_count": 25,
                "police_count": 0
            }
        },
        "resources": {
            "cctv": [place("cctv", 1, "CAM-12345", 65)],
            "metro": [place("metro", 1, "City Hall Exit 1", 120)],
            "criminal": [place("robbery_incident", -1, "Robbery 2024-10-15", 180)],
            "streetlight": [place("streetlight", 1, "LIGHT-67890", 45)],
            "police": []
        }
    })
}

fn payload_with(score: f64, counts: Value, resources: Value) -> Value {
    json!({
        "summary": { "safety_score": score, "analysis": counts },
        "resources": resources
    })
}

// -----------------------------------------------------------------------
// convert_value
// -----------------------------------------------------------------------

#[test]
fn sample_payload_converts_to_caution_view() {
    let view = convert_value(sample_payload()).unwrap();
    let summary = &view.summary;

    assert_eq!(summary.level(), SafetyLevel::Caution);
    assert_eq!(summary.label(), "caution");
    assert!((summary.safety_score() - 45.5).abs() < f64::EPSILON);

    let analysis = summary.analysis();
    assert_eq!(analysis.safe_places, 10);
    assert_eq!(analysis.warning_zones, 1);
    assert!((analysis.lighting_score - 25.0 / 30.0).abs() < 1e-12);
    assert!((analysis.police_distance_m - 999.0).abs() < f64::EPSILON);
    assert_eq!(analysis.last_incident_days, 30);

    let names: Vec<&str> = view.places.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["City Hall Exit 1", "LIGHT-67890"]);
}

#[test]
fn meta_is_carried_through_unchanged() {
    let view = convert_value(sample_payload()).unwrap();
    let meta = view.meta.unwrap();
    assert_eq!(meta.at, "2025-11-08T23:00:00+08:00");
    assert_eq!(meta.tz, "Asia/Taipei");
    assert!((meta.radius_m - 200.0).abs() < f64::EPSILON);
}

#[test]
fn missing_meta_stays_absent() {
    let body = payload_with(80.0, json!({}), json!({}));
    let view = convert_value(body).unwrap();
    assert!(view.meta.is_none());
}

#[test]
fn places_keep_metro_streetlight_police_order() {
    let body = payload_with(
        50.0,
        json!({}),
        json!({
            "police": [place("police", 1, "Xinyi Precinct", 340)],
            "streetlight": [place("streetlight", 1, "L1", 10), place("streetlight", 1, "L2", 20)],
            "cctv": [place("cctv", 1, "C1", 5), place("cctv", 1, "C2", 6)],
            "criminal": [place("robbery_incident", -1, "R1", 50)],
            "metro": [place("metro", 1, "M1", 90)]
        }),
    );
    let view = convert_value(body).unwrap();
    let kinds: Vec<PlaceType> = view.places.iter().map(|p| p.place_type).collect();
    assert_eq!(
        kinds,
        [
            PlaceType::Metro,
            PlaceType::Streetlight,
            PlaceType::Streetlight,
            PlaceType::Police
        ]
    );
    assert!(view
        .places
        .iter()
        .all(|p| p.place_type != PlaceType::Cctv && p.place_type != PlaceType::RobberyIncident));
}

#[test]
fn police_distance_uses_first_station() {
    let body = payload_with(
        90.0,
        json!({ "police_count": 2 }),
        json!({
            "police": [place("police", 1, "Near", 340), place("police", 1, "Far", 610)]
        }),
    );
    let view = convert_value(body).unwrap();
    assert!((view.summary.analysis().police_distance_m - 340.0).abs() < f64::EPSILON);
}

#[test]
fn lighting_score_is_not_clamped() {
    let zero = convert_value(payload_with(
        10.0,
        json!({ "streetlight_count": 0 }),
        json!({}),
    ))
    .unwrap();
    assert!(zero.summary.analysis().lighting_score.abs() < f64::EPSILON);

    let bright = convert_value(payload_with(
        10.0,
        json!({ "streetlight_count": 45 }),
        json!({}),
    ))
    .unwrap();
    assert!((bright.summary.analysis().lighting_score - 1.5).abs() < f64::EPSILON);
}

#[test]
fn missing_and_null_counts_read_as_zero() {
    let body = payload_with(
        72.0,
        json!({ "cctv_count": null, "metro_count": 3 }),
        json!({ "police": null }),
    );
    let view = convert_value(body).unwrap();
    let analysis = view.summary.analysis();
    assert_eq!(analysis.safe_places, 3);
    assert_eq!(analysis.warning_zones, 0);
    assert!((analysis.police_distance_m - 999.0).abs() < f64::EPSILON);
    assert_eq!(view.summary.level(), SafetyLevel::Safe);
}

#[test]
fn boundary_scores_take_higher_tier() {
    let at_70 = convert_value(payload_with(70.0, json!({}), json!({}))).unwrap();
    assert_eq!(at_70.summary.level(), SafetyLevel::Safe);
    let at_40 = convert_value(payload_with(40.0, json!({}), json!({}))).unwrap();
    assert_eq!(at_40.summary.level(), SafetyLevel::Caution);
    let below = convert_value(payload_with(39.9, json!({}), json!({}))).unwrap();
    assert_eq!(below.summary.level(), SafetyLevel::Danger);
    assert_eq!(below.summary.label(), "danger");
}

#[test]
fn missing_resources_is_schema_error() {
    let mut body = sample_payload();
    body.as_object_mut().unwrap().remove("resources");
    let err = convert_value(body).unwrap_err();
    assert!(
        matches!(err, ApiError::Schema { ref field, .. } if field == "resources"),
        "expected Schema(resources), got: {err:?}"
    );
}

#[test]
fn non_object_resources_is_schema_error() {
    let mut body = sample_payload();
    body["resources"] = json!([]);
    assert!(matches!(
        convert_value(body),
        Err(ApiError::Schema { .. })
    ));
}

#[test]
fn missing_score_is_schema_error() {
    let body = json!({ "summary": { "analysis": {} }, "resources": {} });
    let err = convert_value(body).unwrap_err();
    assert!(
        matches!(err, ApiError::Schema { ref field, .. } if field == "summary.safety_score"),
        "got: {err:?}"
    );
}

#[test]
fn malformed_place_is_schema_error() {
    let body = payload_with(50.0, json!({}), json!({ "metro": [{ "name": "no type" }] }));
    assert!(matches!(
        convert_value(body),
        Err(ApiError::Schema { ref field, .. }) if field == "payload"
    ));
}

// -----------------------------------------------------------------------
// parse_json_input
// -----------------------------------------------------------------------

#[test]
fn json_input_accepts_raw_backend_shape() {
    let text = sample_payload().to_string();
    let view = parse_json_input(&text).unwrap();
    assert_eq!(view.places.len(), 2);
}

#[test]
fn json_input_accepts_view_model_shape() {
    let text = r#"
    {
      "meta": {
        "at": "2025-11-08T23:00:00+08:00",
        "center": { "lat": 25.033964, "lng": 121.564468 },
        "radius_m": 200,
        "tz": "Asia/Taipei"
      },
      "summary": {
        "level": 2,
        "label": "caution",
        "safety_score": 82.0,
        "analysis": {
          "safe_places": 12, "warning_zones": 3, "lighting_score": 0.8,
          "police_distance_m": 340, "last_incident_days": 47
        }
      },
      "places": [{
        "safety": 1, "type": "store", "name": "7-ELEVEN Shifu",
        "location": { "lat": 25.03452, "lng": 121.56501 },
        "distance_m": 65, "open_now": true, "phone": "+8862647392323"
      }]
    }"#;
    let view = parse_json_input(text).unwrap();
    assert_eq!(view.summary.level(), SafetyLevel::Safe);
    assert_eq!(view.summary.analysis().last_incident_days, 47);
    assert_eq!(view.places[0].place_type, PlaceType::Store);
}

#[test]
fn json_input_rejects_invalid_json() {
    assert!(matches!(
        parse_json_input("{ not json"),
        Err(ApiError::Deserialize { .. })
    ));
}

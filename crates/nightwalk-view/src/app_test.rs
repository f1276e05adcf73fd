use super::*;
use nightwalk_core::{Meta, RoadSafetySummary, SafetyAnalysis, SafetySummary};

fn start() -> LatLng {
    LatLng::new(25.0330, 121.5654)
}

fn safety(score: f64) -> SafetyApiResponse {
    SafetyApiResponse {
        meta: Some(Meta {
            at: "2025-11-08T23:00:00+08:00".to_owned(),
            center: LatLng::new(25.04, 121.55),
            radius_m: 200.0,
            tz: "Asia/Taipei".to_owned(),
        }),
        summary: SafetySummary::from_score(
            score,
            SafetyAnalysis {
                safe_places: 3,
                warning_zones: 0,
                lighting_score: 0.4,
                police_distance_m: 999.0,
                last_incident_days: 30,
            },
        ),
        places: Vec::new(),
    }
}

fn roads() -> RoadSafetyData {
    RoadSafetyData {
        roads: Vec::new(),
        summary: RoadSafetySummary {
            overall_score: 62.0,
            level: 3,
            label: "safe".to_owned(),
            total_roads: 0,
            total_cctv: 0,
            total_metro: 0,
            total_robbery: None,
            total_streetlight: None,
            total_police: None,
        },
    }
}

fn update(lat: f64, lng: f64) -> LocationUpdate {
    LocationUpdate {
        lat,
        lng,
        roads: None,
        safety_data: None,
    }
}

#[test]
fn location_update_recenters_and_extends_trail() {
    let mut state = AppState::new(start());
    let cmd = state.apply(AppEvent::LocationUpdated(update(25.05, 121.52)));

    assert_eq!(state.center(), LatLng::new(25.05, 121.52));
    assert_eq!(state.trail, vec![LatLng::new(25.05, 121.52)]);
    assert!(state.is_moving);
    assert_eq!(
        cmd,
        Some(Command::ScheduleSettle {
            generation: 1,
            after: Duration::from_millis(500)
        })
    );
}

#[test]
fn only_latest_settle_clears_moving() {
    let mut state = AppState::new(start()).with_settle_delay(Duration::from_millis(20));
    state.apply(AppEvent::LocationUpdated(update(25.05, 121.52)));
    state.apply(AppEvent::LocationUpdated(update(25.06, 121.52)));

    state.apply(AppEvent::MovementSettled { generation: 1 });
    assert!(state.is_moving, "stale settle must not clear a newer movement");

    state.apply(AppEvent::MovementSettled { generation: 2 });
    assert!(!state.is_moving);
}

#[test]
fn embedded_payloads_replace_current_data() {
    let mut state = AppState::new(start());
    state.apply(AppEvent::SafetyLoaded(Ok(safety(80.0))));

    let mut u = update(25.05, 121.52);
    u.roads = Some(roads());
    u.safety_data = Some(safety(30.0));
    state.apply(AppEvent::LocationUpdated(u));

    assert_eq!(state.roads.data().map(|r| r.summary.level), Some(3));
    let indicator = state.score_indicator().unwrap();
    assert_eq!(indicator.label, "danger");
}

#[test]
fn update_without_safety_keeps_previous_data() {
    let mut state = AppState::new(start());
    state.apply(AppEvent::SafetyLoaded(Ok(safety(80.0))));
    state.apply(AppEvent::LocationUpdated(update(25.05, 121.52)));
    assert_eq!(state.summary_panel().unwrap().label, "safe");
}

#[test]
fn failed_load_shows_retryable_banner_cleared_by_success() {
    let mut state = AppState::new(start());
    state.apply(AppEvent::SafetyLoaded(Err(
        "API request failed: 500 Internal Server Error".to_owned(),
    )));

    let banner = state.banner.clone().unwrap();
    assert_eq!(banner.retry, Some(RetryTarget::Safety));
    assert!(banner.message.contains("500"));
    assert!(state.safety.is_none());

    state.apply(AppEvent::SafetyLoaded(Ok(safety(55.0))));
    assert!(state.banner.is_none());
}

#[test]
fn road_loading_lifecycle() {
    let mut state = AppState::new(start());
    state.apply(AppEvent::RoadsLoading);
    assert!(state.roads.is_loading());

    state.apply(AppEvent::RoadsLoaded(Err("timeout".to_owned())));
    assert!(matches!(state.roads, LoadState::Failed(_)));
    assert_eq!(state.banner.as_ref().and_then(|b| b.retry), Some(RetryTarget::Roads));

    state.apply(AppEvent::RoadsLoaded(Ok(roads())));
    assert!(state.road_summary().is_some());
    assert!(state.banner.is_none());
}

#[test]
fn safety_success_does_not_clear_road_banner() {
    let mut state = AppState::new(start());
    state.apply(AppEvent::RoadsLoaded(Err("timeout".to_owned())));
    state.apply(AppEvent::SafetyLoaded(Ok(safety(55.0))));
    assert!(state.banner.is_some());

    state.apply(AppEvent::DismissError);
    assert!(state.banner.is_none());
}

#[test]
fn imported_json_recenters_on_meta() {
    let mut state = AppState::new(start());
    state.apply(AppEvent::SafetyImported(safety(55.0)));
    assert_eq!(state.center(), LatLng::new(25.04, 121.55));
}

#[test]
fn host_location_recenters() {
    let mut state = AppState::new(start());
    state.show_current_position = false;
    state.apply(AppEvent::HostLocation(LatLng::new(24.99, 121.4)));
    assert_eq!(state.center(), LatLng::new(24.99, 121.4));
    assert!(state.show_current_position);
}

#[test]
fn host_location_recenters_loaded_analysis() {
    let mut state = AppState::new(start());
    state.apply(AppEvent::SafetyLoaded(Ok(safety(55.0))));
    state.apply(AppEvent::HostLocation(LatLng::new(24.99, 121.4)));

    let data = state.safety.as_ref().unwrap();
    assert_eq!(data.center(), Some(LatLng::new(24.99, 121.4)));
    assert_eq!(data.summary.safety_score(), 55.0);
    let panel = state.summary_panel().unwrap();
    assert_eq!(panel.center_text.as_deref(), Some("24.990000, 121.400000"));
}

#[test]
fn retry_after_failed_safety_load_requests_reload() {
    let mut state = AppState::new(start());
    state.apply(AppEvent::SafetyLoaded(Err("connection refused".to_owned())));

    assert_eq!(
        state.apply(AppEvent::Retry),
        Some(Command::Reload(RetryTarget::Safety))
    );
    assert!(state.banner.is_none());
}

#[test]
fn retry_after_failed_roads_load_marks_roads_loading() {
    let mut state = AppState::new(start());
    state.apply(AppEvent::RoadsLoaded(Err("timeout".to_owned())));

    assert_eq!(
        state.apply(AppEvent::Retry),
        Some(Command::Reload(RetryTarget::Roads))
    );
    assert!(state.roads.is_loading());
}

#[test]
fn retry_without_retryable_banner_does_nothing() {
    let mut state = AppState::new(start());
    assert_eq!(state.apply(AppEvent::Retry), None);

    state.apply(AppEvent::AddMarker {
        position: LatLng::new(95.0, 121.54),
        radius_m: 120.0,
        label: "Nowhere".to_owned(),
    });
    assert_eq!(state.apply(AppEvent::Retry), None);
    assert!(state.banner.is_some());
}

#[test]
fn route_search_remembers_destination_for_retry() {
    let mut state = AppState::new(start());
    let to = LatLng::new(25.04, 121.57);
    state.apply(AppEvent::RoutesRequested { to });
    state.apply(AppEvent::RoutesLoaded(Err("no route".to_owned())));

    assert_eq!(state.route_destination(), Some(to));
    assert_eq!(
        state.apply(AppEvent::Retry),
        Some(Command::Reload(RetryTarget::Routes))
    );
}

#[test]
fn emergency_call_dials_police() {
    let mut state = AppState::new(start());
    assert_eq!(
        state.apply(AppEvent::EmergencyCall),
        Some(Command::PhoneCall("110".to_owned()))
    );
}

#[test]
fn popup_actions_become_host_commands() {
    let mut state = AppState::new(start());
    assert_eq!(
        state.apply(AppEvent::PopupAction(PopupAction::Call {
            number: "02-2345-6789".to_owned(),
        })),
        Some(Command::PhoneCall("02-2345-6789".to_owned()))
    );
    assert_eq!(
        state.apply(AppEvent::PopupAction(PopupAction::Search {
            url: "https://www.google.com/search?q=x".to_owned(),
        })),
        Some(Command::OpenPage {
            url: "https://www.google.com/search?q=x".to_owned(),
            title: None,
        })
    );
    assert!(matches!(
        state.apply(AppEvent::PopupAction(PopupAction::Directions {
            url: "https://maps.example/dir".to_owned(),
        })),
        Some(Command::OpenPage { title: Some(_), .. })
    ));
}

#[test]
fn markers_added_and_removed() {
    let mut state = AppState::new(start());
    state.apply(AppEvent::AddMarker {
        position: LatLng::new(25.02, 121.54),
        radius_m: 120.0,
        label: "Gym".to_owned(),
    });
    assert_eq!(state.markers.len(), 1);
    assert_eq!(state.center(), LatLng::new(25.02, 121.54));

    let id = state.markers.as_slice()[0].id;
    state.apply(AppEvent::RemoveMarker(id));
    assert!(state.markers.is_empty());
}

#[test]
fn invalid_marker_shows_banner_without_retry() {
    let mut state = AppState::new(start());
    state.apply(AppEvent::AddMarker {
        position: LatLng::new(95.0, 121.54),
        radius_m: 120.0,
        label: "Nowhere".to_owned(),
    });
    assert!(state.markers.is_empty());
    assert_eq!(state.banner.as_ref().map(|b| b.retry), Some(None));
}

#[test]
fn scene_reflects_state() {
    let mut state = AppState::new(start());
    state.apply(AppEvent::SafetyLoaded(Ok(safety(72.0))));
    state.apply(AppEvent::LocationUpdated(update(25.05, 121.52)));
    state.apply(AppEvent::LocationUpdated(update(25.06, 121.53)));

    let scene = state.scene(&MapViewConfig::default());
    assert_eq!(scene.center, LatLng::new(25.06, 121.53));
    assert_eq!(scene.polylines.len(), 1, "trail with two points");
    assert_eq!(scene.circles.len(), 1, "analysis circle from meta");
    assert_eq!(
        scene.current_position.map(|p| p.moving),
        Some(true)
    );

    state.show_current_position = false;
    assert!(state.scene(&MapViewConfig::default()).current_position.is_none());
}

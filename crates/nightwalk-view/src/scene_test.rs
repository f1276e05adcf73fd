use super::*;
use nightwalk_core::{AnalyzedRoute, PlaceType, RouteSummary, SafetyCode};

fn place(name: &str, phone: &str) -> SafetyPlace {
    SafetyPlace {
        safety: SafetyCode(1),
        place_type: PlaceType::Police,
        name: name.to_owned(),
        location: LatLng::new(25.03289, 121.56234),
        distance_m: 340.0,
        open_now: Some(true),
        phone: Some(phone.to_owned()),
        address: None,
        hours: None,
        signals: Vec::new(),
        incident_date: None,
        incident_time: None,
        location_desc: None,
    }
}

fn road(score: f64) -> Road {
    Road {
        road_name: "Songren Rd".to_owned(),
        road_type: "primary".to_owned(),
        safety_score: score,
        level: 3,
        label: "safe".to_owned(),
        cctv_count: 4,
        metro_count: 1,
        nodes: vec![[25.0331, 121.5681], [25.0352, 121.5683]],
        robbery_count: None,
        streetlight_count: None,
        police_count: None,
        center: None,
    }
}

fn route(index: u32, recommended: bool, score: f64) -> AnalyzedRoute {
    AnalyzedRoute {
        route_index: index,
        is_recommended: recommended,
        geometry: vec![[25.03, 121.56], [25.04, 121.57]],
        distance_m: 1520.0,
        duration_s: 300.0,
        summary: RouteSummary {
            total_segments: 2,
            total_cctv: 3,
            total_metro: 0,
            total_robbery: 0,
            total_streetlight: 9,
            total_police: 1,
            overall_score: score,
            level: 3,
            label: "safe".to_owned(),
        },
        segments: Vec::new(),
    }
}

fn viewport() -> Viewport {
    Viewport::new(LatLng::new(25.033, 121.5654))
}

#[test]
fn empty_input_renders_only_position_icon() {
    let scene = render_map(&MapViewConfig::default(), &MapViewInput::new(viewport()));
    assert_eq!(scene.zoom, DEFAULT_ZOOM);
    assert!(scene.polylines.is_empty());
    assert!(scene.circles.is_empty());
    assert!(scene.markers.is_empty());
    assert_eq!(
        scene.current_position,
        Some(PositionIcon {
            icon: Icon::Person,
            moving: false
        })
    );
}

#[test]
fn moving_flag_switches_position_icon() {
    let input = MapViewInput {
        is_moving: true,
        ..MapViewInput::new(viewport())
    };
    let scene = render_map(&MapViewConfig::default(), &input);
    assert_eq!(scene.current_position.map(|p| p.icon), Some(Icon::Runner));

    let scene = render_map(&MapViewConfig::roads_only(), &input);
    assert!(scene.current_position.is_none());
}

#[test]
fn trail_needs_more_than_one_point() {
    let one = [LatLng::new(25.0, 121.0)];
    let input = MapViewInput {
        trail: &one,
        ..MapViewInput::new(viewport())
    };
    assert!(render_map(&MapViewConfig::default(), &input).polylines.is_empty());

    let three = [
        LatLng::new(25.0, 121.0),
        LatLng::new(25.1, 121.1),
        LatLng::new(25.2, 121.2),
    ];
    let input = MapViewInput {
        trail: &three,
        ..MapViewInput::new(viewport())
    };
    let scene = render_map(&MapViewConfig::default(), &input);
    let trail = &scene.polylines[0];
    assert_eq!(trail.kind, PolylineKind::Trail);
    assert_eq!(trail.popup.lines[0], "Points: 3");
    assert_eq!(trail.popup.lines[1], "Start: 25.000000, 121.000000");
    assert_eq!(trail.popup.lines[2], "End: 25.200000, 121.200000");
}

#[test]
fn roads_colored_by_score_and_hidden_when_disabled() {
    let roads = [road(75.0), road(45.0), road(12.0)];
    let input = MapViewInput {
        roads: &roads,
        ..MapViewInput::new(viewport())
    };
    let scene = render_map(&MapViewConfig::default(), &input);
    let colors: Vec<_> = scene.polylines.iter().map(|p| p.color).collect();
    assert_eq!(colors, vec!["#22c55e", "#eab308", "#ef4444"]);
    assert_eq!(scene.polylines[0].popup.title, "Songren Rd");
    assert_eq!(scene.polylines[0].points.len(), 2);

    let config = MapViewConfig {
        road_overlay: false,
        ..MapViewConfig::default()
    };
    assert!(render_map(&config, &input).polylines.is_empty());
}

#[test]
fn road_level_is_a_badge_not_popup_text() {
    let roads = [road(75.0)];
    let input = MapViewInput {
        roads: &roads,
        ..MapViewInput::new(viewport())
    };
    let scene = render_map(&MapViewConfig::default(), &input);
    let popup = &scene.polylines[0].popup;
    assert_eq!(
        popup.badge,
        Some(Badge {
            text: "safe".to_owned(),
            color: "#22c55e",
        })
    );
    assert!(popup.lines.iter().all(|line| !line.contains('#')));
}

#[test]
fn analysis_area_adds_center_marker_and_dashed_circle() {
    let input = MapViewInput {
        analysis: Some(AnalysisArea {
            center: LatLng::new(25.033_964, 121.564_468),
            radius_m: 200.0,
        }),
        ..MapViewInput::new(viewport())
    };
    let scene = render_map(&MapViewConfig::default(), &input);
    assert_eq!(scene.markers[0].icon, Some(Icon::Target));
    assert_eq!(scene.markers[0].popup.lines[1], "Radius: 200m");
    assert_eq!(scene.circles[0].color, "#6366f1");
    assert_eq!(scene.circles[0].dash, Some("5, 5"));
    assert!((scene.circles[0].radius_m - 200.0).abs() < f64::EPSILON);
}

#[test]
fn user_markers_render_with_blue_circle() {
    let markers = [UserMarker::new(LatLng::new(25.04, 121.55), 150.0, "Office").unwrap()];
    let input = MapViewInput {
        markers: &markers,
        ..MapViewInput::new(viewport())
    };
    let scene = render_map(&MapViewConfig::default(), &input);
    assert_eq!(scene.markers[0].popup.title, "Office");
    assert_eq!(scene.circles[0].color, "#3b82f6");
    assert!((scene.circles[0].fill_opacity - 0.2).abs() < f64::EPSILON);
}

#[test]
fn place_popup_actions() {
    let places = [place("Xinyi Precinct", "110"), place("CAM 1", "")];
    let input = MapViewInput {
        places: &places,
        ..MapViewInput::new(viewport())
    };
    let scene = render_map(&MapViewConfig::default(), &input);

    let with_phone = &scene.markers[0];
    assert_eq!(with_phone.icon, Some(Icon::Shield));
    assert_eq!(with_phone.color, Some("#3CCF4E"));
    assert_eq!(with_phone.popup.lines, vec!["110", "Open now"]);
    assert_eq!(
        with_phone.popup.actions,
        vec![
            PopupAction::Call {
                number: "110".to_owned()
            },
            PopupAction::Directions {
                url: "https://www.google.com/maps/search/?api=1&query=25.03289,121.56234".to_owned()
            },
            PopupAction::Search {
                url: "https://www.google.com/search?q=Xinyi%20Precinct".to_owned()
            },
        ]
    );

    let without_phone = &scene.markers[1];
    assert_eq!(without_phone.popup.actions.len(), 2);
    assert!(!matches!(
        without_phone.popup.actions[0],
        PopupAction::Call { .. }
    ));
}

#[test]
fn search_url_encodes_like_uri_component() {
    assert_eq!(
        search_url("市政府站 1 號出口"),
        "https://www.google.com/search?q=%E5%B8%82%E6%94%BF%E5%BA%9C%E7%AB%99%201%20%E8%99%9F%E5%87%BA%E5%8F%A3"
    );
    assert_eq!(
        search_url("A&B (north)"),
        "https://www.google.com/search?q=A%26B%20(north)"
    );
}

#[test]
fn recommended_route_is_highlighted_and_drawn_last() {
    let routes = SafeRoutesResponse {
        start: LatLng::new(25.03, 121.56),
        end: LatLng::new(25.04, 121.57),
        radius_m: 100.0,
        total_routes: 2,
        recommended_route_index: 0,
        routes: vec![route(0, true, 72.0), route(1, false, 55.0)],
    };
    let input = MapViewInput {
        routes: Some(&routes),
        ..MapViewInput::new(viewport())
    };
    let scene = render_map(&MapViewConfig::default(), &input);
    assert_eq!(scene.polylines.len(), 2);

    let alternate = &scene.polylines[0];
    assert_eq!(alternate.kind, PolylineKind::Route { recommended: false });
    assert_eq!(alternate.color, "#94a3b8");

    let best = &scene.polylines[1];
    assert_eq!(best.kind, PolylineKind::Route { recommended: true });
    assert_eq!(best.color, "#22c55e");
    assert_eq!(best.popup.title, "Route 1 (recommended)");
    assert_eq!(best.popup.lines[1], "Duration: 5 min");
}

#[test]
fn viewport_recenter_keeps_zoom() {
    let mut vp = viewport();
    vp.zoom = 17;
    assert!(!vp.recenter(LatLng::new(25.033, 121.5654)));
    assert!(vp.recenter(LatLng::new(25.05, 121.52)));
    assert_eq!(vp.zoom, 17);
    assert_eq!(vp.center, LatLng::new(25.05, 121.52));
}

#[test]
fn scene_serializes_for_front_ends() {
    let places = [place("Xinyi Precinct", "110")];
    let input = MapViewInput {
        places: &places,
        ..MapViewInput::new(viewport())
    };
    let json = serde_json::to_value(render_map(&MapViewConfig::default(), &input)).unwrap();
    assert_eq!(json["zoom"], 15);
    assert_eq!(json["markers"][0]["icon"], "shield");
    assert_eq!(json["markers"][0]["popup"]["actions"][0]["kind"], "call");
    assert_eq!(json["current_position"]["icon"], "person");
}

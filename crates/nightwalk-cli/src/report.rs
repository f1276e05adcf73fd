//! Plain-text output for the one-shot subcommands.

use nightwalk_core::{RoadSafetyData, SafeRoutesResponse, SafetyApiResponse};
use nightwalk_view::{place_list, RoadSummaryPanel, ScoreIndicator, SummaryPanel};

pub(crate) fn print_safety(data: &SafetyApiResponse) {
    let indicator = ScoreIndicator::from_score(data.summary.safety_score());
    let panel = SummaryPanel::from_response(data);

    println!("{} ({})  {}", panel.label, panel.score_text, panel.status);
    println!("  progress       {:.0}%", indicator.progress);
    println!("  safe places    {}", panel.safe_places);
    println!("  warning zones  {}", panel.warning_zones);
    println!("  lighting       {}", panel.lighting_text);
    println!("  police         {}", panel.police_distance_text);
    println!("  last incident  {}", panel.last_incident_text);
    if let Some(center) = &panel.center_text {
        println!("  center         {center}");
    }

    let Some(list) = place_list(&data.places) else {
        return;
    };
    println!();
    println!("{}", list.title);
    for row in &list.rows {
        let open = row.open_status.map(|s| format!("  [{s}]")).unwrap_or_default();
        println!("  {:<16} {:<28} {:>7}{open}", row.type_label, row.name, row.distance_text);
        for line in &row.incident_lines {
            println!("      {line}");
        }
        if let Some(phone) = &row.phone {
            println!("      tel {phone}");
        }
        if !row.signals.is_empty() {
            println!("      {}", row.signals.join(", "));
        }
    }
}

pub(crate) fn print_roads(data: &RoadSafetyData) {
    let panel = RoadSummaryPanel::from_data(data);
    println!(
        "{}  overall {}  roads {}  cctv {}  metro {}",
        panel.label, panel.overall_score, panel.total_roads, panel.total_cctv, panel.total_metro
    );
    for road in &data.roads {
        println!(
            "  {:<28} {:<12} {:>6.1}  {}  cctv {} metro {}",
            road.road_name, road.road_type, road.safety_score, road.label, road.cctv_count, road.metro_count
        );
    }
}

pub(crate) fn print_routes(routes: &SafeRoutesResponse) {
    let recommended = routes.recommended().map(|r| r.route_index);
    println!("{} candidate routes", routes.total_routes);
    for route in &routes.routes {
        let marker = if Some(route.route_index) == recommended {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} route {}  {:.0}m  {:.0} min  score {} ({})",
            route.route_index + 1,
            route.distance_m,
            route.duration_s / 60.0,
            route.summary.overall_score,
            route.summary.label
        );
    }
}

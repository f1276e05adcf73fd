//! Long-running `follow` session.
//!
//! Wires the pieces together the way the embedded map does: announce the
//! share through the host bridge, load the initial area, then apply live
//! location updates until ctrl-c. All state changes happen on this task; the
//! live client, stdin keys, reloads and settle timers only send events into
//! the channel.

use std::sync::Arc;
use std::time::Duration;

use nightwalk_api::{RoadQuery, RouteRequest, SafetyApiClient};
use nightwalk_bridge::{BridgeClient, MemoryHost, PageOpen};
use nightwalk_core::{AppConfig, LatLng};
use nightwalk_live::{LiveLocationClient, ReconnectPolicy};
use nightwalk_view::{AppEvent, AppState, Command, RetryTarget};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const HOST_LOCATION_TIMEOUT: Duration = Duration::from_secs(2);
pub(crate) const DEFAULT_ROUTE_RADIUS_M: u32 = 100;

const KEY_HELP: &str = "keys: r = retry, d = dismiss error, sos = call 110";

/// Everything [`execute`] needs to carry out a [`Command`].
struct Context {
    api: SafetyApiClient,
    bridge: BridgeClient,
    query: RoadQuery,
    tx: mpsc::UnboundedSender<AppEvent>,
}

/// Bridge used from the terminal. There is no device shell here, so an
/// in-process host stands in and answers location requests with `center`.
pub(crate) fn host_bridge(center: LatLng) -> BridgeClient {
    BridgeClient::new(Arc::new(MemoryHost::with_location(center)))
}

pub(crate) async fn follow(config: &AppConfig, center: LatLng, live_url: &str) -> anyhow::Result<()> {
    let api = SafetyApiClient::from_config(config)?;
    let query = RoadQuery {
        search_radius_m: config.search_radius_m,
        safety_radius_m: config.safety_radius_m,
    };

    let bridge = host_bridge(center);
    if bridge.notify("Location sharing", "A contact is sharing their location with you") {
        tracing::info!("location sharing notification sent");
    } else {
        tracing::warn!("host not available; notification not sent");
    }

    let mut state = AppState::new(center)
        .with_settle_delay(Duration::from_millis(config.movement_settle_ms));
    if let Some(position) = bridge.locate(HOST_LOCATION_TIMEOUT).await {
        state.apply(AppEvent::HostLocation(position));
    }

    state.apply(AppEvent::RoadsLoading);
    let roads = api
        .load_road_safety(state.center(), query)
        .await
        .map_err(|e| e.to_string());
    state.apply(AppEvent::RoadsLoaded(roads));
    let safety = api
        .load_safety_data(state.center())
        .await
        .map_err(|e| e.to_string());
    state.apply(AppEvent::SafetyLoaded(safety));
    print_status(&state);

    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();
    let live_tx = tx.clone();
    let live = LiveLocationClient::connect(
        live_url,
        ReconnectPolicy::from_config(config),
        move |update| {
            if live_tx.send(AppEvent::LocationUpdated(update)).is_err() {
                tracing::debug!("session ended; dropping location update");
            }
        },
    )?;
    tracing::info!(%live_url, "following live location");
    println!("{KEY_HELP}");
    tokio::spawn(read_keys(tx.clone()));

    let ctx = Context {
        api,
        bridge,
        query,
        tx,
    };

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            Some(event) = rx.recv() => {
                let show = !matches!(event, AppEvent::MovementSettled { .. });
                if let Some(command) = state.apply(event) {
                    execute(command, &ctx, &state);
                }
                if show {
                    print_status(&state);
                }
            }
        }
    }

    live.disconnect().await;
    tracing::info!(points = state.trail.len(), "session ended");
    Ok(())
}

fn execute(command: Command, ctx: &Context, state: &AppState) {
    match command {
        Command::ScheduleSettle { generation, after } => {
            let tx = ctx.tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(after).await;
                if tx.send(AppEvent::MovementSettled { generation }).is_err() {
                    tracing::debug!(generation, "session ended; dropping settle timer");
                }
            });
        }
        Command::Reload(target) => {
            let api = ctx.api.clone();
            let tx = ctx.tx.clone();
            let center = state.center();
            let query = ctx.query;
            let destination = state.route_destination();
            tokio::spawn(async move {
                let Some(event) = reload(&api, target, center, query, destination).await else {
                    return;
                };
                if tx.send(event).is_err() {
                    tracing::debug!(?target, "session ended; dropping reload result");
                }
            });
        }
        host @ (Command::PhoneCall(_) | Command::OpenPage { .. }) => {
            println!("{}", run_host_command(&ctx.bridge, host));
        }
    }
}

async fn reload(
    api: &SafetyApiClient,
    target: RetryTarget,
    center: LatLng,
    query: RoadQuery,
    destination: Option<LatLng>,
) -> Option<AppEvent> {
    match target {
        RetryTarget::Safety => {
            let result = api.load_safety_data(center).await;
            Some(AppEvent::SafetyLoaded(result.map_err(|e| e.to_string())))
        }
        RetryTarget::Roads => {
            let result = api.load_road_safety(center, query).await;
            Some(AppEvent::RoadsLoaded(result.map_err(|e| e.to_string())))
        }
        RetryTarget::Routes => {
            let Some(to) = destination else {
                tracing::warn!("route retry without a destination");
                return None;
            };
            let request = RouteRequest::new(center, to, DEFAULT_ROUTE_RADIUS_M);
            let result = api.find_safe_routes(&request).await;
            Some(AppEvent::RoutesLoaded(result.map_err(|e| e.to_string())))
        }
    }
}

/// Hands a call or page request to the host and returns the line to show.
pub(crate) fn run_host_command(bridge: &BridgeClient, command: Command) -> String {
    match command {
        Command::PhoneCall(number) => {
            if bridge.phone_call(&number) {
                format!("Call request for {number} sent to host")
            } else {
                format!("No host available; dial {number} directly")
            }
        }
        Command::OpenPage { url, title } => {
            match bridge.open_page_or_direct(&url, title.as_deref()) {
                PageOpen::Host => format!("Opened {url} on host"),
                PageOpen::Direct(url) => format!("Open {url}"),
            }
        }
        other => {
            tracing::debug!(?other, "not a host command");
            String::new()
        }
    }
}

fn key_event(line: &str) -> Option<AppEvent> {
    match line.trim().to_ascii_lowercase().as_str() {
        "r" | "retry" => Some(AppEvent::Retry),
        "d" | "dismiss" => Some(AppEvent::DismissError),
        "sos" | "110" => Some(AppEvent::EmergencyCall),
        _ => None,
    }
}

async fn read_keys(tx: mpsc::UnboundedSender<AppEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match key_event(&line) {
                Some(event) => {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
                None if line.trim().is_empty() => {}
                None => println!("{KEY_HELP}"),
            },
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "stdin closed");
                return;
            }
        }
    }
}

fn print_status(state: &AppState) {
    let center = state.center();
    let score = state
        .score_indicator()
        .map(|s| format!("{:.0} ({})", s.score, s.label))
        .unwrap_or_else(|| "-".to_owned());
    let roads = state.roads.data().map_or(0, |r| r.roads.len());
    println!(
        "{center}  score {score}  roads {roads}  trail {}{}",
        state.trail.len(),
        if state.is_moving { "  moving" } else { "" }
    );
    if let Some(banner) = &state.banner {
        let hint = if banner.retry.is_some() { "  (r to retry)" } else { "" };
        println!("  ! {}{hint}", banner.message);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, disconnecting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_events() {
        assert_eq!(key_event("r"), Some(AppEvent::Retry));
        assert_eq!(key_event(" SOS "), Some(AppEvent::EmergencyCall));
        assert_eq!(key_event("110"), Some(AppEvent::EmergencyCall));
        assert_eq!(key_event("d"), Some(AppEvent::DismissError));
        assert_eq!(key_event("quit"), None);
    }

    #[test]
    fn emergency_call_reaches_host() {
        let host = Arc::new(MemoryHost::new());
        let bridge = BridgeClient::new(host.clone());
        let mut state = AppState::new(LatLng::new(25.033, 121.565));

        let command = state.apply(AppEvent::EmergencyCall).unwrap();
        let line = run_host_command(&bridge, command);

        assert_eq!(line, "Call request for 110 sent to host");
        let sent = host.sent_envelopes();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].name, "phone_call");
        assert_eq!(sent[0].data, serde_json::json!("110"));
    }

    #[test]
    fn call_without_host_tells_user_to_dial() {
        let bridge = BridgeClient::detached();
        assert!(!bridge.is_available());
        let line = run_host_command(&bridge, Command::PhoneCall("110".to_owned()));
        assert_eq!(line, "No host available; dial 110 directly");
    }

    #[test]
    fn page_without_host_is_opened_directly() {
        let bridge = BridgeClient::detached();
        let line = run_host_command(
            &bridge,
            Command::OpenPage {
                url: "https://www.google.com/search?q=station".to_owned(),
                title: None,
            },
        );
        assert_eq!(line, "Open https://www.google.com/search?q=station");
    }

    #[tokio::test]
    async fn terminal_host_answers_location_with_center() {
        let center = LatLng::new(25.04, 121.55);
        let bridge = host_bridge(center);
        assert_eq!(bridge.locate(Duration::from_secs(1)).await, Some(center));
    }
}

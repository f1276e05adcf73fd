//! Application state and the single reducer that mutates it.
//!
//! Every change goes through [`AppState::apply`]. The reducer never waits on
//! anything; when it needs something to happen later it returns a
//! [`Command`] for the orchestrator to carry out.

use std::time::Duration;

use nightwalk_core::{LatLng, LocationUpdate, RoadSafetyData, SafeRoutesResponse, SafetyApiResponse};
use uuid::Uuid;

use crate::components::{place_list, PlaceList, RoadSummaryPanel, ScoreIndicator, SummaryPanel};
use crate::marker::{MarkerSet, UserMarker};
use crate::scene::{
    render_map, AnalysisArea, MapScene, MapViewConfig, MapViewInput, PopupAction, Viewport,
};

pub const DEFAULT_SETTLE: Duration = Duration::from_millis(500);

/// Police emergency line dialled by the emergency button.
pub const EMERGENCY_NUMBER: &str = "110";

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Which load the banner's retry button re-runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryTarget {
    Safety,
    Roads,
    Routes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: String,
    pub retry: Option<RetryTarget>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    LocationUpdated(LocationUpdate),
    /// Emitted by the orchestrator once the settle delay for `generation` ran out.
    MovementSettled { generation: u64 },
    SafetyLoaded(Result<SafetyApiResponse, String>),
    /// A view model loaded from pasted JSON; the map jumps to its center.
    SafetyImported(SafetyApiResponse),
    RoadsLoading,
    RoadsLoaded(Result<RoadSafetyData, String>),
    /// A route search from the current center to `to` has started.
    RoutesRequested { to: LatLng },
    RoutesLoaded(Result<SafeRoutesResponse, String>),
    HostLocation(LatLng),
    AddMarker {
        position: LatLng,
        radius_m: f64,
        label: String,
    },
    RemoveMarker(Uuid),
    /// The banner's retry button.
    Retry,
    /// A popup button was pressed.
    PopupAction(PopupAction),
    EmergencyCall,
    DismissError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send [`AppEvent::MovementSettled`] with `generation` after `after`.
    ScheduleSettle { generation: u64, after: Duration },
    /// Re-run the load that failed.
    Reload(RetryTarget),
    /// Ask the host to dial `number`.
    PhoneCall(String),
    /// Ask the host to open `url`, or open it directly when there is no host.
    OpenPage { url: String, title: Option<String> },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub viewport: Viewport,
    pub safety: Option<SafetyApiResponse>,
    pub roads: LoadState<RoadSafetyData>,
    pub routes: Option<SafeRoutesResponse>,
    pub trail: Vec<LatLng>,
    pub is_moving: bool,
    pub show_current_position: bool,
    pub markers: MarkerSet,
    pub banner: Option<ErrorBanner>,
    settle_after: Duration,
    movement_generation: u64,
    route_destination: Option<LatLng>,
}

impl AppState {
    #[must_use]
    pub fn new(center: LatLng) -> Self {
        Self {
            viewport: Viewport::new(center),
            safety: None,
            roads: LoadState::Idle,
            routes: None,
            trail: Vec::new(),
            is_moving: false,
            show_current_position: true,
            markers: MarkerSet::default(),
            banner: None,
            settle_after: DEFAULT_SETTLE,
            movement_generation: 0,
            route_destination: None,
        }
    }

    #[must_use]
    pub fn with_settle_delay(mut self, settle_after: Duration) -> Self {
        self.settle_after = settle_after;
        self
    }

    #[must_use]
    pub fn center(&self) -> LatLng {
        self.viewport.center
    }

    pub fn apply(&mut self, event: AppEvent) -> Option<Command> {
        match event {
            AppEvent::LocationUpdated(update) => return Some(self.on_location(update)),
            AppEvent::MovementSettled { generation } => {
                if generation == self.movement_generation {
                    self.is_moving = false;
                }
            }
            AppEvent::SafetyLoaded(Ok(data)) => {
                tracing::info!(score = data.summary.safety_score(), "safety data applied");
                self.clear_banner_for(RetryTarget::Safety);
                self.safety = Some(data);
            }
            AppEvent::SafetyLoaded(Err(message)) => {
                self.show_error(
                    format!("Could not load safety data: {message}"),
                    Some(RetryTarget::Safety),
                );
            }
            AppEvent::SafetyImported(data) => {
                if let Some(center) = data.center() {
                    self.viewport.recenter(center);
                }
                self.safety = Some(data);
            }
            AppEvent::RoadsLoading => self.roads = LoadState::Loading,
            AppEvent::RoadsLoaded(Ok(data)) => {
                self.clear_banner_for(RetryTarget::Roads);
                self.roads = LoadState::Loaded(data);
            }
            AppEvent::RoadsLoaded(Err(message)) => {
                let message = format!("Could not load road safety data: {message}");
                self.roads = LoadState::Failed(message.clone());
                self.show_error(message, Some(RetryTarget::Roads));
            }
            AppEvent::RoutesRequested { to } => {
                self.route_destination = Some(to);
                self.routes = None;
            }
            AppEvent::RoutesLoaded(Ok(routes)) => {
                self.clear_banner_for(RetryTarget::Routes);
                self.routes = Some(routes);
            }
            AppEvent::RoutesLoaded(Err(message)) => {
                self.show_error(
                    format!("Could not find routes: {message}"),
                    Some(RetryTarget::Routes),
                );
            }
            AppEvent::HostLocation(position) => {
                tracing::info!(lat = position.lat, lng = position.lng, "host location received");
                self.viewport.recenter(position);
                self.show_current_position = true;
                self.safety = self.safety.take().map(|data| data.with_center(position));
            }
            AppEvent::AddMarker {
                position,
                radius_m,
                label,
            } => match UserMarker::new(position, radius_m, &label) {
                Ok(marker) => {
                    self.viewport.recenter(marker.position);
                    self.markers.add(marker);
                }
                Err(e) => self.show_error(e.to_string(), None),
            },
            AppEvent::RemoveMarker(id) => {
                if !self.markers.remove(id) {
                    tracing::debug!(%id, "marker already removed");
                }
            }
            AppEvent::Retry => return self.on_retry(),
            AppEvent::PopupAction(action) => return Some(popup_command(action)),
            AppEvent::EmergencyCall => {
                tracing::warn!(number = EMERGENCY_NUMBER, "emergency call requested");
                return Some(Command::PhoneCall(EMERGENCY_NUMBER.to_owned()));
            }
            AppEvent::DismissError => self.banner = None,
        }
        None
    }

    fn on_retry(&mut self) -> Option<Command> {
        let Some(target) = self.banner.as_ref().and_then(|b| b.retry) else {
            tracing::debug!("retry requested with nothing to retry");
            return None;
        };
        self.banner = None;
        if target == RetryTarget::Roads {
            self.roads = LoadState::Loading;
        }
        tracing::info!(?target, "retrying failed load");
        Some(Command::Reload(target))
    }

    fn on_location(&mut self, update: LocationUpdate) -> Command {
        let position = update.position();
        self.viewport.recenter(position);
        self.show_current_position = true;
        self.is_moving = true;
        self.trail.push(position);

        if let Some(roads) = update.roads {
            self.roads = LoadState::Loaded(roads);
        }
        match update.safety_data {
            Some(data) => self.safety = Some(data),
            None => tracing::debug!("location update carried no safety data"),
        }

        self.movement_generation = self.movement_generation.wrapping_add(1);
        Command::ScheduleSettle {
            generation: self.movement_generation,
            after: self.settle_after,
        }
    }

    fn show_error(&mut self, message: String, retry: Option<RetryTarget>) {
        tracing::error!(%message, ?retry, "showing error banner");
        self.banner = Some(ErrorBanner { message, retry });
    }

    fn clear_banner_for(&mut self, target: RetryTarget) {
        if self
            .banner
            .as_ref()
            .is_some_and(|b| b.retry == Some(target))
        {
            self.banner = None;
        }
    }

    /// Destination of the last route search, if any.
    #[must_use]
    pub fn route_destination(&self) -> Option<LatLng> {
        self.route_destination
    }

    #[must_use]
    pub fn scene(&self, config: &MapViewConfig) -> MapScene {
        let input = MapViewInput {
            viewport: self.viewport,
            places: self
                .safety
                .as_ref()
                .map(|s| s.places.as_slice())
                .unwrap_or_default(),
            roads: self
                .roads
                .data()
                .map(|r| r.roads.as_slice())
                .unwrap_or_default(),
            trail: &self.trail,
            analysis: self
                .safety
                .as_ref()
                .and_then(|s| s.meta.as_ref())
                .map(AnalysisArea::from),
            is_moving: self.is_moving,
            markers: self.markers.as_slice(),
            routes: self.routes.as_ref(),
        };
        let config = MapViewConfig {
            current_position: config.current_position && self.show_current_position,
            ..*config
        };
        render_map(&config, &input)
    }

    #[must_use]
    pub fn score_indicator(&self) -> Option<ScoreIndicator> {
        self.safety
            .as_ref()
            .map(|s| ScoreIndicator::from_score(s.summary.safety_score()))
    }

    #[must_use]
    pub fn summary_panel(&self) -> Option<SummaryPanel> {
        self.safety.as_ref().map(SummaryPanel::from_response)
    }

    #[must_use]
    pub fn place_list(&self) -> Option<PlaceList> {
        self.safety.as_ref().and_then(|s| place_list(&s.places))
    }

    #[must_use]
    pub fn road_summary(&self) -> Option<RoadSummaryPanel> {
        self.roads.data().map(RoadSummaryPanel::from_data)
    }
}

fn popup_command(action: PopupAction) -> Command {
    match action {
        PopupAction::Call { number } => Command::PhoneCall(number),
        PopupAction::Directions { url } => Command::OpenPage {
            url,
            title: Some("Directions".to_owned()),
        },
        PopupAction::Search { url } => Command::OpenPage { url, title: None },
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;

//! Presentation layer: map scene rendering, panels, and application state.

pub mod app;
pub mod components;
pub mod error;
pub mod marker;
pub mod scene;
pub mod style;

pub use app::{AppEvent, AppState, Command, ErrorBanner, LoadState, RetryTarget};
pub use components::{
    hours_text, place_list, PlaceList, PlaceRow, RoadSummaryPanel, ScoreIndicator, SummaryPanel,
};
pub use error::ViewError;
pub use marker::{MarkerSet, UserMarker};
pub use scene::{
    directions_url, render_map, search_url, AnalysisArea, Badge, MapScene, MapViewConfig,
    MapViewInput, PopupAction, Viewport,
};

pub mod app_config;
pub mod config;
pub mod geo;
pub mod live;
pub mod place;
pub mod road;
pub mod route;
pub mod summary;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{parse_coordinates, LatLng};
pub use live::LocationUpdate;
pub use place::{OpeningHours, PlaceType, SafetyClass, SafetyCode, SafetyPlace, WeeklySlot};
pub use road::{Road, RoadSafetyData, RoadSafetySummary};
pub use route::{AnalyzedRoute, RouteSegment, RouteSummary, SafeRoutesResponse};
pub use summary::{Meta, SafetyAnalysis, SafetyApiResponse, SafetyLevel, SafetySummary};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid coordinates \"{input}\": {reason}")]
    InvalidCoordinates { input: String, reason: String },

    #[error("invalid safety level: {0}")]
    InvalidLevel(u8),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

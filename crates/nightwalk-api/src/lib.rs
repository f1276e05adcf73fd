pub mod client;
pub mod convert;
pub mod error;
pub mod types;

pub use client::{RoadQuery, RouteRequest, SafetyApiClient};
pub use convert::{convert, convert_value, parse_json_input};
pub use error::ApiError;
pub use types::{RawAnalysis, RawResources, RawSafetyResponse, RawSummary};

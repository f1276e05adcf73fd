//! HTTP client for the safety backend.
//!
//! Wraps `reqwest` with the backend's three endpoints. Non-2xx statuses
//! surface as [`ApiError::Fetch`]; the safety endpoint's body is validated and
//! converted, the road and route endpoints are returned as sent.

use std::time::Duration;

use nightwalk_core::{AppConfig, LatLng, RoadSafetyData, SafeRoutesResponse, SafetyApiResponse};
use reqwest::{Client, Url};
use serde::Serialize;

use crate::convert::convert_value;
use crate::error::ApiError;

pub const DEFAULT_SEARCH_RADIUS_M: u32 = 100;
pub const DEFAULT_SAFETY_RADIUS_M: u32 = 50;

/// Radii for the nearby-roads query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadQuery {
    /// How far from the center to look for road segments.
    pub search_radius_m: u32,
    /// How far from each segment to count safety features.
    pub safety_radius_m: u32,
}

impl Default for RoadQuery {
    fn default() -> Self {
        Self {
            search_radius_m: DEFAULT_SEARCH_RADIUS_M,
            safety_radius_m: DEFAULT_SAFETY_RADIUS_M,
        }
    }
}

/// Body of `POST /find_safe_routes`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteRequest {
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    pub radius_m: u32,
}

impl RouteRequest {
    #[must_use]
    pub fn new(start: LatLng, end: LatLng, radius_m: u32) -> Self {
        Self {
            start_lat: start.lat,
            start_lng: start.lng,
            end_lat: end.lat,
            end_lng: end.lng,
            radius_m,
        }
    }
}

/// Client for the safety backend.
///
/// Use [`SafetyApiClient::from_config`] in the application or
/// [`SafetyApiClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct SafetyApiClient {
    client: Client,
    base_url: Url,
}

impl SafetyApiClient {
    /// # Errors
    ///
    /// See [`SafetyApiClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::with_base_url(
            &config.api_base_url,
            config.http_timeout_secs,
            &config.user_agent,
        )
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed, or [`ApiError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so endpoint joins append to the path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetches the raw `get_safety_data` body for `center`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Fetch`] on a non-2xx status.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the body is not JSON.
    pub async fn fetch_safety_raw(&self, center: LatLng) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint_url(
            "get_safety_data",
            &[
                ("center_lat", center.lat.to_string()),
                ("center_lng", center.lng.to_string()),
            ],
        )?;
        tracing::info!(%url, "requesting safety data");
        self.request_json(self.client.get(url.clone()), &url).await
    }

    /// Fetches and converts the area safety view model for `center`.
    ///
    /// # Errors
    ///
    /// Everything [`SafetyApiClient::fetch_safety_raw`] returns, plus
    /// [`ApiError::Schema`] when the body cannot become a view model.
    pub async fn load_safety_data(&self, center: LatLng) -> Result<SafetyApiResponse, ApiError> {
        let raw = self.fetch_safety_raw(center).await?;
        let view = convert_value(raw)?;
        tracing::info!(
            safety_score = view.summary.safety_score(),
            label = view.summary.label(),
            places = view.places.len(),
            "safety data loaded"
        );
        Ok(view)
    }

    /// Fetches nearby road segments with their safety scores, unmodified.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Fetch`] on a non-2xx status.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the body does not match the road payload.
    pub async fn load_road_safety(
        &self,
        center: LatLng,
        query: RoadQuery,
    ) -> Result<RoadSafetyData, ApiError> {
        let url = self.endpoint_url(
            "get_nearby_roads_safety",
            &[
                ("center_lat", center.lat.to_string()),
                ("center_lng", center.lng.to_string()),
                ("search_radius_m", query.search_radius_m.to_string()),
                ("safety_radius_m", query.safety_radius_m.to_string()),
            ],
        )?;
        tracing::info!(%url, "requesting road safety data");
        let body = self.request_json(self.client.get(url.clone()), &url).await?;
        let data: RoadSafetyData =
            serde_json::from_value(body).map_err(|e| ApiError::Deserialize {
                context: "get_nearby_roads_safety".to_owned(),
                source: e,
            })?;
        tracing::info!(roads = data.roads.len(), "road safety data loaded");
        Ok(data)
    }

    /// Asks the backend to compare candidate routes between two points.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Fetch`] on a non-2xx status (the backend's `error`
    ///   message is kept in `detail`).
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the body does not match the route payload.
    pub async fn find_safe_routes(
        &self,
        request: &RouteRequest,
    ) -> Result<SafeRoutesResponse, ApiError> {
        let url = self.endpoint_url("find_safe_routes", &[])?;
        tracing::info!(%url, ?request, "requesting safe routes");
        let body = self
            .request_json(self.client.post(url.clone()).json(request), &url)
            .await?;
        serde_json::from_value(body).map_err(|e| ApiError::Deserialize {
            context: "find_safe_routes".to_owned(),
            source: e,
        })
    }

    /// Joins `path` onto the base URL and appends percent-encoded query pairs.
    fn endpoint_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends `request`, maps a non-2xx status to [`ApiError::Fetch`], and
    /// parses the body as JSON.
    async fn request_json(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> Result<serde_json::Value, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let detail = response
                .text()
                .await
                .ok()
                .and_then(|body| serde_json::from_str::<serde_json::Value>(&body).ok())
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned));
            tracing::error!(status = status.as_u16(), %url, ?detail, "backend returned an error status");
            return Err(ApiError::Fetch {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_owned(),
                url: url.to_string(),
                detail,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

use crate::geo::LatLng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub api_base_url: String,
    pub live_url: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub reconnect_base_ms: u64,
    pub reconnect_max_delay_ms: u64,
    /// `0` disables the ceiling.
    pub reconnect_max_attempts: u32,
    pub default_center: LatLng,
    pub search_radius_m: u32,
    pub safety_radius_m: u32,
    pub movement_settle_ms: u64,
}

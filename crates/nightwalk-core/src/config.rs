use crate::app_config::{AppConfig, Environment};
use crate::geo::parse_coordinates;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; only malformed values are errors.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_url = |var: &str, default: &str, schemes: &[&str]| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        let scheme_ok = raw
            .split_once("://")
            .is_some_and(|(scheme, rest)| schemes.contains(&scheme) && !rest.is_empty());
        if scheme_ok {
            Ok(raw)
        } else {
            Err(invalid(
                var,
                format!("expected a {} URL, got \"{raw}\"", schemes.join("/")),
            ))
        }
    };

    let env = parse_environment(&or_default("NIGHTWALK_ENV", "development"));
    let log_level = or_default("NIGHTWALK_LOG_LEVEL", "info");

    let api_base_url = parse_url(
        "NIGHTWALK_API_BASE_URL",
        "http://127.0.0.1:5001",
        &["http", "https"],
    )?;
    let live_url = parse_url("NIGHTWALK_LIVE_URL", "ws://localhost:8080", &["ws", "wss"])?;

    let http_timeout_secs = parse_u64("NIGHTWALK_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("NIGHTWALK_USER_AGENT", "nightwalk/0.1 (safety-map)");

    let reconnect_base_ms = parse_u64("NIGHTWALK_RECONNECT_BASE_MS", "5000")?;
    let reconnect_max_delay_ms = parse_u64("NIGHTWALK_RECONNECT_MAX_DELAY_MS", "60000")?;
    let reconnect_max_attempts = parse_u32("NIGHTWALK_RECONNECT_MAX_ATTEMPTS", "10")?;
    if reconnect_base_ms == 0 {
        return Err(invalid(
            "NIGHTWALK_RECONNECT_BASE_MS",
            "reconnect delay must be at least 1 ms".to_string(),
        ));
    }
    if reconnect_max_delay_ms < reconnect_base_ms {
        return Err(invalid(
            "NIGHTWALK_RECONNECT_MAX_DELAY_MS",
            format!("must not be below NIGHTWALK_RECONNECT_BASE_MS ({reconnect_base_ms})"),
        ));
    }

    let center_raw = or_default("NIGHTWALK_DEFAULT_CENTER", "25.0330,121.5654");
    let default_center = parse_coordinates(&center_raw)
        .map_err(|e| invalid("NIGHTWALK_DEFAULT_CENTER", e.to_string()))?;

    let search_radius_m = parse_u32("NIGHTWALK_SEARCH_RADIUS_M", "100")?;
    let safety_radius_m = parse_u32("NIGHTWALK_SAFETY_RADIUS_M", "50")?;
    let movement_settle_ms = parse_u64("NIGHTWALK_MOVEMENT_SETTLE_MS", "500")?;

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        live_url,
        http_timeout_secs,
        user_agent,
        reconnect_base_ms,
        reconnect_max_delay_ms,
        reconnect_max_attempts,
        default_center,
        search_radius_m,
        safety_radius_m,
        movement_settle_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

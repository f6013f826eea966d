use crate::app_config::{AppConfig, Environment};
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
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
        }
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_threshold = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<f64>().map_err(|e| invalid(var, e.to_string()))?;
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(
                var,
                format!("must be a finite, non-negative number, got {raw}"),
            ));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("GUESTAPP_ENV", "development"))?;
    let log_level = or_default("GUESTAPP_LOG_LEVEL", "info");
    let locations_path = PathBuf::from(or_default(
        "GUESTAPP_LOCATIONS_PATH",
        "./content/discover.json",
    ));
    let details_path = PathBuf::from(or_default(
        "GUESTAPP_DETAILS_PATH",
        "./content/discover-details.json",
    ));
    let content_strict = parse_bool("GUESTAPP_CONTENT_STRICT", "false")?;

    let desktop_min_width_px = parse_u32("GUESTAPP_DESKTOP_MIN_WIDTH_PX", "768")?;
    if desktop_min_width_px == 0 {
        return Err(invalid(
            "GUESTAPP_DESKTOP_MIN_WIDTH_PX",
            "breakpoint must be greater than zero".to_string(),
        ));
    }

    let overlay_dismiss_offset_px = parse_threshold("GUESTAPP_OVERLAY_DISMISS_OFFSET_PX", "60")?;
    let overlay_dismiss_velocity = parse_threshold("GUESTAPP_OVERLAY_DISMISS_VELOCITY", "400")?;
    let state_path = PathBuf::from(or_default("GUESTAPP_STATE_PATH", "./.guestapp/state.json"));

    Ok(AppConfig {
        env,
        log_level,
        locations_path,
        details_path,
        content_strict,
        desktop_min_width_px,
        overlay_dismiss_offset_px,
        overlay_dismiss_velocity,
        state_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GUESTAPP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! Environment Configuration Loader
//!
//! Loads environment variables from the canonical location: `/etc/floodzy/environment`
//! and collects them into [`Settings`].
//!
//! ## Usage
//!
//! Call `load_environment()` early in main() before reading settings:
//!
//! ```rust,no_run
//! use floodzy_core::config::{load_environment, Settings};
//!
//! load_environment();
//! let settings = Settings::from_env().unwrap();
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Alternative paths to check (in order of priority)
pub const ENV_FILE_PATHS: &[&str] = &["/etc/floodzy/environment", ".env"];

/// Load environment variables from the canonical configuration file.
///
/// This function:
/// 1. Checks `$FLOODZY_ENV_FILE` if set
/// 2. Then `/etc/floodzy/environment` (system-wide)
/// 3. Falls back to `.env` in current directory (development)
///
/// Existing environment variables are never overridden.
/// Returns the path that was loaded, or None if no file was found.
pub fn load_environment() -> Option<String> {
    if let Ok(custom_path) = std::env::var("FLOODZY_ENV_FILE") {
        if let Some(path) = try_load_env_file(&custom_path) {
            return Some(path);
        }
    }

    for path in ENV_FILE_PATHS {
        if let Some(loaded_path) = try_load_env_file(path) {
            return Some(loaded_path);
        }
    }

    debug!("No environment file found, using existing environment");
    None
}

fn try_load_env_file(path: &str) -> Option<String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return None;
    }

    match fs::read_to_string(path_obj) {
        Ok(content) => {
            let mut loaded_count = 0;
            let mut skipped_count = 0;

            for line in content.lines() {
                let line = line.trim();

                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                if let Some((key, value)) = parse_env_line(line) {
                    if std::env::var(&key).is_err() {
                        std::env::set_var(&key, &value);
                        loaded_count += 1;
                        debug!("Loaded: {}={}", key, if is_secret(&key) { "***" } else { &value });
                    } else {
                        skipped_count += 1;
                        debug!("Skipped (already set): {}", key);
                    }
                }
            }

            info!(
                "Loaded {} environment variables from {} ({} skipped - already set)",
                loaded_count, path, skipped_count
            );

            Some(path.to_string())
        }
        Err(e) => {
            warn!("Failed to read environment file {}: {}", path, e);
            None
        }
    }
}

fn is_secret(key: &str) -> bool {
    key.contains("KEY") || key.contains("TOKEN") || key.contains("SECRET")
}

/// Parse a single environment line into key-value pair.
fn parse_env_line(line: &str) -> Option<(String, String)> {
    // Handle: KEY=VALUE, KEY="VALUE", KEY='VALUE', export KEY=VALUE
    let line = line.strip_prefix("export ").unwrap_or(line);
    let mut parts = line.splitn(2, '=');
    let key = parts.next()?.trim();
    let value = parts.next()?.trim();

    if key.is_empty() {
        return None;
    }

    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);

    Some((key.to_string(), value.to_string()))
}

/// Get a configuration value with a default.
pub fn get_config(key: &str, default: &str) -> String {
    get_config_opt(key).unwrap_or_else(|| default.to_string())
}

/// Get an optional configuration value. Empty values count as unset.
pub fn get_config_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get a parsed configuration value, failing on malformed input.
fn get_config_parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match get_config_opt(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::config(format!("{} has an invalid value: {:?}", key, raw))),
        None => Ok(default),
    }
}

// =============================================================================
// SETTINGS
// =============================================================================

/// Upstream endpoint defaults
pub mod endpoints {
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const OPEN_WEATHER_BASE_URL: &str = "https://api.openweathermap.org";
    pub const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
    pub const BMKG_BASE_URL: &str = "https://data.bmkg.go.id";
    pub const PETABENCANA_BASE_URL: &str = "https://data.petabencana.id";
    pub const WATER_LEVEL_URL: &str = "https://poskobanjir.dsdadki.web.id/datatma.json";
    pub const PUMP_STATUS_URL: &str = "https://poskobanjir.dsdadki.web.id/datapompa.json";
}

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Deployment mode; controls whether internal details reach HTTP clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Development,
    Production,
}

impl std::str::FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(RunMode::Development),
            "production" | "prod" => Ok(RunMode::Production),
            other => Err(format!("Unknown run mode: {}", other)),
        }
    }
}

/// Process-wide settings, read once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub open_weather_api_key: Option<String>,
    pub open_weather_base_url: String,
    pub nominatim_base_url: String,
    pub bmkg_base_url: String,
    pub petabencana_base_url: String,
    pub water_level_url: String,
    pub pump_status_url: String,
    /// Timeout for each outbound collaborator call
    pub http_timeout: Duration,
    /// Deadline for answering one inbound request
    pub request_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub run_mode: RunMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: endpoints::GEMINI_BASE_URL.to_string(),
            open_weather_api_key: None,
            open_weather_base_url: endpoints::OPEN_WEATHER_BASE_URL.to_string(),
            nominatim_base_url: endpoints::NOMINATIM_BASE_URL.to_string(),
            bmkg_base_url: endpoints::BMKG_BASE_URL.to_string(),
            petabencana_base_url: endpoints::PETABENCANA_BASE_URL.to_string(),
            water_level_url: endpoints::WATER_LEVEL_URL.to_string(),
            pump_status_url: endpoints::PUMP_STATUS_URL.to_string(),
            http_timeout: Duration::from_secs(20),
            request_timeout: Duration::from_secs(60),
            host: "0.0.0.0".to_string(),
            port: 3000,
            run_mode: RunMode::Development,
        }
    }
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let run_mode = match get_config_opt("FLOODZY_ENV") {
            Some(raw) => raw.parse().map_err(Error::config)?,
            None => defaults.run_mode,
        };

        Ok(Self {
            gemini_api_key: get_config_opt("GEMINI_API_KEY"),
            gemini_model: get_config("GEMINI_MODEL", &defaults.gemini_model),
            gemini_base_url: get_config("GEMINI_BASE_URL", &defaults.gemini_base_url),
            open_weather_api_key: get_config_opt("OPEN_WEATHER_API_KEY"),
            open_weather_base_url: get_config("OPEN_WEATHER_BASE_URL", &defaults.open_weather_base_url),
            nominatim_base_url: get_config("NOMINATIM_BASE_URL", &defaults.nominatim_base_url),
            bmkg_base_url: get_config("BMKG_BASE_URL", &defaults.bmkg_base_url),
            petabencana_base_url: get_config("PETABENCANA_BASE_URL", &defaults.petabencana_base_url),
            water_level_url: get_config("WATER_LEVEL_URL", &defaults.water_level_url),
            pump_status_url: get_config("PUMP_STATUS_URL", &defaults.pump_status_url),
            http_timeout: Duration::from_secs(get_config_parsed("FLOODZY_HTTP_TIMEOUT_SECS", 20u64)?),
            request_timeout: Duration::from_secs(get_config_parsed("FLOODZY_REQUEST_TIMEOUT_SECS", 60u64)?),
            host: get_config("HOST", &defaults.host),
            port: get_config_parsed("PORT", defaults.port)?,
            run_mode,
        })
    }

    pub fn is_production(&self) -> bool {
        self.run_mode == RunMode::Production
    }

    /// Bind address as `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

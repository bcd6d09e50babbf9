//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from `GYMTRACK_*` environment variables
//! 2. If none are set, falls back to loading from a probed file
//! 3. If no file exists either, uses [`Config::default`]
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Unset variables keep their default value.
//! - `GYMTRACK_MAX_LOGS`: Event log ring-buffer capacity
//! - `GYMTRACK_STORAGE_DIR`: Directory for the persisted log slot
//! - `GYMTRACK_EXPORT_DIR`: Directory exports are written to
//! - `GYMTRACK_PRODUCTION`: Production mode (true/false)
//! - `GYMTRACK_MIN_LEVEL`: Least severe event log level (error/warn/info/debug)
//! - `GYMTRACK_LOG_LEVEL`: Default tracing filter directive
//! - `GYMTRACK_LOG_JSON`: Emit tracing output as JSON (true/false)
//! - `GYMTRACK_SLOW_QUERY_THRESHOLD_MS`: Slow query warning threshold
//! - `GYMTRACK_TICK_INTERVAL_MS`: Timer display tick interval
//! - `GYMTRACK_BACKEND_URL`: Hosted backend URL
//! - `GYMTRACK_BACKEND_ANON_KEY`: Hosted backend public key
//!
//! ## File Locations
//! The loader probes `gymtrack.toml`, `gymtrack.json`, `config.toml` and
//! `config.json` in the current directory, its parent, and next to the
//! executable, returning the first that exists.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use gymtrack_domain::constants::ENV_PREFIX;
use gymtrack_domain::{Config, GymTrackError, LogLevel, Result};

use crate::errors::InfraError;

const CONFIG_FILE_NAMES: [&str; 4] = ["gymtrack.toml", "gymtrack.json", "config.toml", "config.json"];

const ENV_KEYS: [&str; 11] = [
    "MAX_LOGS",
    "STORAGE_DIR",
    "EXPORT_DIR",
    "PRODUCTION",
    "MIN_LEVEL",
    "LOG_LEVEL",
    "LOG_JSON",
    "SLOW_QUERY_THRESHOLD_MS",
    "TICK_INTERVAL_MS",
    "BACKEND_URL",
    "BACKEND_ANON_KEY",
];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `GymTrackError::Config` if an environment value or the probed
/// file is invalid.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Environment configuration unusable, trying file");
            match probe_config_paths() {
                Some(path) => load_from_file(Some(path)),
                None => {
                    tracing::info!("No configuration found; using defaults");
                    Ok(Config::default())
                }
            }
        }
    }
}

/// Load configuration from environment variables
///
/// At least one `GYMTRACK_*` variable must be set; the rest keep defaults.
///
/// # Errors
/// Returns `GymTrackError::Config` if no variable is set or a value does not
/// parse.
pub fn load_from_env() -> Result<Config> {
    if !ENV_KEYS.iter().any(|key| std::env::var(env_key(key)).is_ok()) {
        return Err(GymTrackError::Config(format!(
            "No {ENV_PREFIX}_* environment variables set"
        )));
    }

    let mut config = Config::default();
    let logging = &mut config.logging;

    if let Some(max_logs) = env_parse::<usize>("MAX_LOGS")? {
        logging.max_logs = max_logs;
    }
    if let Some(dir) = env_opt("STORAGE_DIR") {
        logging.storage_dir = dir;
    }
    if let Some(dir) = env_opt("EXPORT_DIR") {
        logging.export_dir = dir;
    }
    logging.production = env_bool(&env_key("PRODUCTION"), logging.production);
    if let Some(minimum_level) = env_parse::<LogLevel>("MIN_LEVEL")? {
        logging.minimum_level = minimum_level;
    }
    if let Some(level) = env_opt("LOG_LEVEL") {
        logging.level = level;
    }
    logging.json_output = env_bool(&env_key("LOG_JSON"), logging.json_output);
    if let Some(threshold) = env_parse::<u64>("SLOW_QUERY_THRESHOLD_MS")? {
        logging.slow_query_threshold_ms = threshold;
    }

    if let Some(interval) = env_parse::<u64>("TICK_INTERVAL_MS")? {
        config.timer.tick_interval_ms = interval;
    }

    config.backend.url = env_opt("BACKEND_URL");
    config.backend.anon_key = env_opt("BACKEND_ANON_KEY");

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `GymTrackError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(GymTrackError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            GymTrackError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| GymTrackError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration, detecting the format by extension (`.json`/`.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| InfraError::from(e).into()),
        "json" => serde_json::from_str(contents)
            .map_err(|e| GymTrackError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(GymTrackError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_key(suffix: &str) -> String {
    format!("{ENV_PREFIX}_{suffix}")
}

/// Non-empty value of `GYMTRACK_<suffix>`.
fn env_opt(suffix: &str) -> Option<String> {
    std::env::var(env_key(suffix)).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(suffix: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(suffix)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                GymTrackError::Config(format!("Invalid value for {}: {e}", env_key(suffix)))
            })
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use gymtrack_domain::constants::{DEFAULT_MAX_LOGS, DEFAULT_TICK_INTERVAL_MS};
    use once_cell::sync::Lazy;
    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(env_key(key));
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("GYMTRACK_TEST_BOOL_ON", "on");
        std::env::set_var("GYMTRACK_TEST_BOOL_UPPER", "TRUE");
        std::env::set_var("GYMTRACK_TEST_BOOL_OFF", "off");

        assert!(env_bool("GYMTRACK_TEST_BOOL_ON", false));
        assert!(env_bool("GYMTRACK_TEST_BOOL_UPPER", false));
        assert!(!env_bool("GYMTRACK_TEST_BOOL_OFF", true));

        std::env::remove_var("GYMTRACK_TEST_BOOL_MISSING");
        assert!(env_bool("GYMTRACK_TEST_BOOL_MISSING", true));

        std::env::remove_var("GYMTRACK_TEST_BOOL_ON");
        std::env::remove_var("GYMTRACK_TEST_BOOL_UPPER");
        std::env::remove_var("GYMTRACK_TEST_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_overrides_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("GYMTRACK_MAX_LOGS", "250");
        std::env::set_var("GYMTRACK_PRODUCTION", "true");
        std::env::set_var("GYMTRACK_BACKEND_URL", "https://db.example.test");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.logging.max_logs, 250);
        assert!(config.logging.production);
        assert_eq!(config.backend.url.as_deref(), Some("https://db.example.test"));
        assert_eq!(config.timer.tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);

        clear_env();
    }

    #[test]
    fn test_load_from_env_minimum_level() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("GYMTRACK_MIN_LEVEL", "warn");
        let config = load_from_env().expect("config from env");
        assert_eq!(config.logging.minimum_level, LogLevel::Warn);

        std::env::set_var("GYMTRACK_MIN_LEVEL", "verbose");
        let err = load_from_env().unwrap_err();
        assert!(
            matches!(&err, GymTrackError::Config(msg) if msg.contains("GYMTRACK_MIN_LEVEL")),
            "unexpected error: {err:?}"
        );

        clear_env();
    }

    #[test]
    fn test_load_from_env_without_vars_fails() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, GymTrackError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("GYMTRACK_TICK_INTERVAL_MS", "fast");

        let err = load_from_env().unwrap_err();
        assert!(
            matches!(&err, GymTrackError::Config(msg) if msg.contains("GYMTRACK_TICK_INTERVAL_MS")),
            "unexpected error: {err:?}"
        );

        clear_env();
    }

    #[test]
    fn test_load_from_file_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gymtrack.toml");
        std::fs::write(
            &path,
            r#"
[logging]
max_logs = 40
export_dir = "exports"

[timer]
tick_interval_ms = 250
"#,
        )
        .unwrap();

        let config = load_from_file(Some(path)).expect("toml config");
        assert_eq!(config.logging.max_logs, 40);
        assert_eq!(config.logging.export_dir, "exports");
        assert_eq!(config.timer.tick_interval_ms, 250);
        assert!(!config.logging.production);
    }

    #[test]
    fn test_load_from_file_json() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(br#"{ "logging": { "json_output": true } }"#).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).expect("json config");
        assert!(config.logging.json_output);
        assert_eq!(config.logging.max_logs, DEFAULT_MAX_LOGS);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/gymtrack.toml"))).unwrap_err();
        assert!(matches!(err, GymTrackError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_parse_config_invalid_toml() {
        let err = parse_config("[logging\nmax_logs = 1", Path::new("gymtrack.toml")).unwrap_err();
        assert!(matches!(err, GymTrackError::Config(msg) if msg.starts_with("Invalid TOML format")));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("logging: {}", Path::new("gymtrack.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}

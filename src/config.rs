//! Runtime configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `PORT` | `5000` |
//! | `SOILSENSE_HOST` | `0.0.0.0` |
//! | `SOILSENSE_MODEL_DIR` | `<exe dir>/models` if present, else `./models` |
//! | `SOILSENSE_LOG_MODE` | `stdout` (or `file`) |
//! | `SOILSENSE_LOG_FILE` | `logs/soilsense.log` |
//!
//! `RUST_LOG` is read by the logging setup directly.

use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_LOG_FILE: &str = "logs/soilsense.log";
pub const MODEL_DIR_NAME: &str = "models";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 1 and 65535 (got {0:?})")]
    InvalidPort(String),

    #[error("SOILSENSE_LOG_MODE must be \"stdout\" or \"file\" (got {0:?})")]
    InvalidLogMode(String),
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    #[default]
    Stdout,
    File,
}

/// Settings for the web server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub model_dir: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

/// Pick the model directory: explicit override, then `models/` next to the
/// executable, then `./models`.
#[must_use]
pub fn resolve_model_dir(override_dir: Option<&str>, exe_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir.map(str::trim).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    exe_dir
        .map(|d| d.join(MODEL_DIR_NAME))
        .filter(|d| d.is_dir())
        .unwrap_or_else(|| PathBuf::from(MODEL_DIR_NAME))
}

fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), exe_dir().as_deref())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a variable is set to an unusable value.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        exe_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|p| *p > 0)
                .ok_or(ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let log_mode = match lookup("SOILSENSE_LOG_MODE").as_deref().map(str::trim) {
            None | Some("" | "stdout") => LogMode::Stdout,
            Some("file") => LogMode::File,
            Some(other) => return Err(ConfigError::InvalidLogMode(other.to_string())),
        };

        Ok(Self {
            host: lookup("SOILSENSE_HOST")
                .filter(|h| !h.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            model_dir: resolve_model_dir(lookup("SOILSENSE_MODEL_DIR").as_deref(), exe_dir),
            log_mode,
            log_file: lookup("SOILSENSE_LOG_FILE")
                .map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from),
        })
    }

    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]), None).expect("config");
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.model_dir, PathBuf::from("models"));
        assert_eq!(config.log_mode, LogMode::Stdout);
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(
            lookup(&[
                ("PORT", "8080"),
                ("SOILSENSE_HOST", "127.0.0.1"),
                ("SOILSENSE_MODEL_DIR", "/srv/models"),
                ("SOILSENSE_LOG_MODE", "file"),
                ("SOILSENSE_LOG_FILE", "/var/log/soil.log"),
            ]),
            None,
        )
        .expect("config");
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.model_dir, PathBuf::from("/srv/models"));
        assert_eq!(config.log_mode, LogMode::File);
        assert_eq!(config.log_file, PathBuf::from("/var/log/soil.log"));
    }

    #[test]
    fn test_bad_values_are_errors() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("PORT", "http")]), None).err(),
            Some(ConfigError::InvalidPort("http".into()))
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("PORT", "0")]), None).err(),
            Some(ConfigError::InvalidPort("0".into()))
        );
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("SOILSENSE_LOG_MODE", "syslog")]), None),
            Err(ConfigError::InvalidLogMode(_))
        ));
    }

    #[test]
    fn test_model_dir_prefers_exe_sibling_when_present() {
        let temp = tempdir().expect("tempdir");
        assert_eq!(
            resolve_model_dir(None, Some(temp.path())),
            PathBuf::from("models")
        );

        std::fs::create_dir(temp.path().join("models")).expect("mkdir");
        assert_eq!(
            resolve_model_dir(None, Some(temp.path())),
            temp.path().join("models")
        );
        assert_eq!(
            resolve_model_dir(Some("elsewhere"), Some(temp.path())),
            PathBuf::from("elsewhere")
        );
    }
}

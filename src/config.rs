//! Application configuration: catalog location, template search order, logging.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration parsed from TOML or JSON.
///
/// All fields have defaults. Load from a file with [`AppConfig::from_path`],
/// let [`AppConfig::discover`] look for one in the working directory, or use
/// [`AppConfig::default`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Root of the catalog directory tree.
    pub root_directory: PathBuf,
    /// Factory templates to search, in order. The first capable floor wins.
    pub templates: Vec<String>,
    /// Log sink settings.
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root_directory: PathBuf::from("."),
            templates: vec!["small".to_string(), "medium".to_string(), "large".to_string()],
            logging: LoggingConfig::default(),
        }
    }
}

/// Log sink settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Append-only log file. Unset means stderr only.
    pub file: Option<PathBuf>,
    /// Minimum level: `trace`, `debug`, `info`, `warn` or `error`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"logging.level"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Accepted values for `logging.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Files [`AppConfig::discover`] looks for, in order.
pub const DEFAULT_PATHS: &[&str] = &["config.toml", "config.json"];

impl AppConfig {
    /// Loads the first of [`DEFAULT_PATHS`] that exists, or the defaults.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a found file cannot be read or parsed.
    pub fn discover() -> Result<Self, ConfigError> {
        Self::discover_in(Path::new("."))
    }

    /// Like [`AppConfig::discover`], relative to `dir`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a found file cannot be read or parsed.
    pub fn discover_in(dir: &Path) -> Result<Self, ConfigError> {
        DEFAULT_PATHS
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
            .map_or_else(|| Ok(Self::default()), |path| Self::from_path(&path))
    }

    /// Parses a configuration file; `.json` files as JSON, anything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or is invalid.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the JSON is invalid or contains unknown fields.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError {
            field: "json".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.templates.is_empty() {
            errors.push(ConfigError {
                field: "templates".into(),
                message: "must list at least one factory template".into(),
            });
        }
        for (i, id) in self.templates.iter().enumerate() {
            if id.trim().is_empty() {
                errors.push(ConfigError {
                    field: format!("templates[{i}]"),
                    message: "must not be blank".into(),
                });
            } else if self.templates[..i].contains(id) {
                errors.push(ConfigError {
                    field: format!("templates[{i}]"),
                    message: format!("duplicate template \"{id}\""),
                });
            }
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigError {
                field: "logging.level".into(),
                message: format!(
                    "must be one of {}, got \"{}\"",
                    LOG_LEVELS.join(", "),
                    self.logging.level
                ),
            });
        }

        errors
    }
}

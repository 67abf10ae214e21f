//! # Application Configuration
//!
//! YAML configuration loaded at startup. Every field has a default, so an
//! empty file is a valid configuration.
//!
//! ```yaml
//! debug: true
//! log:
//!   level: debug
//!   format: pretty
//! views:
//!   directory: src/views
//!   layout: default
//! server:
//!   addr: 127.0.0.1:8080
//! routes:
//!   - pattern: /
//!     module: application
//!     controller: index
//!     action: index
//!   - pattern: /:module/:controller/:action
//! ```
//!
//! ## Environment Variables
//!
//! Applied on top of the file by [`AppConfig::apply_env`]:
//!
//! - `WAYMARK_DEBUG`: `1`/`true` enables debug mode, anything else disables it
//! - `WAYMARK_LOG_LEVEL`: overrides `log.level`
//! - `WAYMARK_LOG_FORMAT`: overrides `log.format`

use crate::logging::{LogConfig, LogFormat};
use crate::router::{InvalidMatcherError, Matcher};
use crate::view::DEFAULT_LAYOUT;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::{Path, PathBuf};

pub const ENV_DEBUG: &str = "WAYMARK_DEBUG";
pub const ENV_LOG_LEVEL: &str = "WAYMARK_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "WAYMARK_LOG_FORMAT";

#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Configuration is not valid YAML for [`AppConfig`]
    Parse(serde_yaml::Error),
    /// A configured route is not a valid matcher
    InvalidRoute(InvalidMatcherError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Cannot read configuration {}: {source}", path.display())
            }
            ConfigError::Parse(err) => write!(f, "Invalid configuration: {err}"),
            ConfigError::InvalidRoute(err) => write!(f, "Invalid route: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(err) => Some(err),
            ConfigError::InvalidRoute(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<InvalidMatcherError> for ConfigError {
    fn from(err: InvalidMatcherError) -> Self {
        ConfigError::InvalidRoute(err)
    }
}

/// `true`, `1`, `"1"`, `"true"` (any case) are truthy.
fn is_truthy(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "1" | "true")
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i == 1,
        Flag::Str(s) => is_truthy(&s),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Directory holding view scripts and `layouts/`
    pub directory: PathBuf,
    /// Layout applied to every view; `null` disables layouts
    pub layout: Option<String>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("src/views"),
            layout: Some(DEFAULT_LAYOUT.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
        }
    }
}

/// One entry of the `routes` list; omitted roles are read from the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteConfig {
    pub pattern: String,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub controller: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

impl RouteConfig {
    /// # Errors
    ///
    /// Same rules as [`Matcher::new`].
    pub fn to_matcher(&self) -> Result<Matcher, InvalidMatcherError> {
        Matcher::new(
            self.pattern.as_str(),
            self.module.as_deref(),
            self.controller.as_deref(),
            self.action.as_deref(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Detailed error bodies when set
    #[serde(deserialize_with = "deserialize_flag")]
    pub debug: bool,
    pub log: LogConfig,
    pub views: ViewSettings,
    pub server: ServerSettings,
    pub routes: Vec<RouteConfig>,
}

impl AppConfig {
    /// Read and parse a YAML file. Environment overrides are not applied.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read, [`ConfigError::Parse`]
    /// when it is not a valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed YAML or mistyped fields.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply the `WAYMARK_*` overrides from the process environment.
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any lookup, so tests need not touch the process environment.
    #[must_use]
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(debug) = lookup(ENV_DEBUG) {
            self.debug = is_truthy(&debug);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log.level = level;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.log.format = LogFormat::parse(&format);
        }
        self
    }

    /// Matchers for the `routes` section, in file order.
    ///
    /// # Errors
    ///
    /// The first invalid route.
    pub fn matchers(&self) -> Result<Vec<Matcher>, ConfigError> {
        self.routes
            .iter()
            .map(|route| route.to_matcher().map_err(ConfigError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Role;
    use std::collections::HashMap;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_yaml_str("").unwrap();
        assert!(!config.debug);
        assert_eq!(config.views.layout.as_deref(), Some(DEFAULT_LAYOUT));
        assert_eq!(config.server.addr, "127.0.0.1:8080");
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_debug_flag_forms() {
        for yaml in ["debug: true", "debug: 1", "debug: \"1\"", "debug: \"TRUE\""] {
            assert!(AppConfig::from_yaml_str(yaml).unwrap().debug, "{yaml}");
        }
        for yaml in ["debug: false", "debug: 0", "debug: \"no\""] {
            assert!(!AppConfig::from_yaml_str(yaml).unwrap().debug, "{yaml}");
        }
    }

    #[test]
    fn test_routes_section() {
        let yaml = "routes:\n  - pattern: /\n    module: m\n    controller: c\n    action: a\n  - pattern: /:module/:controller/:action\n";
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        let matchers = config.matchers().unwrap();
        assert_eq!(matchers.len(), 2);
        assert_eq!(matchers[0].fixed_value(Role::Module), Some("m"));
        assert_eq!(matchers[1].pattern(), "/:module/:controller/:action");
    }

    #[test]
    fn test_invalid_route() {
        let config = AppConfig::from_yaml_str("routes:\n  - pattern: /:controller/:action\n").unwrap();
        let err = config.matchers().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRoute(ref e) if e.role == Role::Module));
        assert!(err.to_string().contains("Missing module key or module value"));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            AppConfig::from_yaml_str("debug: [1, 2"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_DEBUG, "1"),
            (ENV_LOG_LEVEL, "warning"),
            (ENV_LOG_FORMAT, "compact"),
        ]
        .into_iter()
        .collect();
        let config = AppConfig::default()
            .apply_overrides(|name| env.get(name).map(|v| (*v).to_string()));
        assert!(config.debug);
        assert_eq!(config.log.level, "warning");
        assert_eq!(config.log.format, LogFormat::Compact);
    }
}

//! Configuration System
//!
//! Loads configuration from a TOML file and applies `DASHBOARD_*`
//! environment variable overrides on top.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::auth::IdentityToolkitConfig;
use crate::data::DATASET_URL;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:8091".to_string(),
        "http://127.0.0.1:8091".to_string(),
    ]
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl ApiConfig {
    /// Socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which identity provider backs the auth gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Memory,
    IdentityToolkit,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Memory => "memory",
            ProviderKind::IdentityToolkit => "identity_toolkit",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(ProviderKind::Memory),
            "identity_toolkit" | "identity-toolkit" => Ok(ProviderKind::IdentityToolkit),
            other => Err(ConfigError::Invalid(format!(
                "unknown auth provider '{}' (expected memory or identity_toolkit)",
                other
            ))),
        }
    }
}

/// Identity provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub provider: ProviderKind,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_auth_base_url")]
    pub base_url: String,

    #[serde(default = "default_auth_timeout")]
    pub request_timeout_ms: u64,

    /// Sessions with no open event stream are forgotten after this long
    #[serde(default = "default_session_idle")]
    pub session_idle_secs: u64,
}

fn default_auth_base_url() -> String {
    IdentityToolkitConfig::default().base_url
}

fn default_auth_timeout() -> u64 {
    10_000
}

fn default_session_idle() -> u64 {
    3600
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: String::new(),
            base_url: default_auth_base_url(),
            request_timeout_ms: default_auth_timeout(),
            session_idle_secs: default_session_idle(),
        }
    }
}

impl AuthConfig {
    pub fn identity_toolkit(&self) -> IdentityToolkitConfig {
        IdentityToolkitConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Static UI configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// Directory holding the built UI bundle; not served when unset
    #[serde(default)]
    pub dist_dir: Option<String>,

    #[serde(default = "default_dataset_url")]
    pub dataset_url: String,
}

fn default_dataset_url() -> String {
    DATASET_URL.to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dist_dir: None,
            dataset_url: default_dataset_url(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// `EnvFilter` directive for this crate and the HTTP layer
    pub fn filter_directive(&self) -> String {
        format!("overdose_dashboard={},tower_http=debug", self.level)
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Candidate config file locations, in search order
    pub fn search_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("overdose-dashboard").join("config.toml")),
            Some(PathBuf::from("/etc/overdose-dashboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load from the first readable default location, or the environment
    pub fn load_default() -> Self {
        for path in Self::search_paths() {
            if path.exists() {
                match Self::load_with_env(&path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `DASHBOARD_*` overrides from a lookup function
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("DASHBOARD_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("DASHBOARD_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid DASHBOARD_API_PORT"),
            }
        }

        if let Some(provider) = lookup("DASHBOARD_AUTH_PROVIDER") {
            match provider.parse() {
                Ok(kind) => self.auth.provider = kind,
                Err(e) => tracing::warn!("Ignoring DASHBOARD_AUTH_PROVIDER: {}", e),
            }
        }
        if let Some(key) = lookup("DASHBOARD_AUTH_API_KEY") {
            self.auth.api_key = key;
        }

        if let Some(dist) = lookup("DASHBOARD_UI_DIST") {
            self.ui.dist_dir = Some(dist);
        }

        if let Some(level) = lookup("DASHBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("DASHBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    format!(
        r#"# Overdose Dashboard Configuration
#
# Environment variables override these settings:
# - DASHBOARD_API_HOST
# - DASHBOARD_API_PORT
# - DASHBOARD_AUTH_PROVIDER
# - DASHBOARD_AUTH_API_KEY
# - DASHBOARD_UI_DIST
# - DASHBOARD_LOG_LEVEL
# - DASHBOARD_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

# Allowed CORS origins (the trunk dev server)
cors_origins = ["http://localhost:8091", "http://127.0.0.1:8091"]

[auth]
# Identity provider: memory (development) or identity_toolkit
provider = "memory"

# Web API key for the identity toolkit
api_key = ""

# Identity toolkit base URL
base_url = "https://identitytoolkit.googleapis.com/v1"

# Request timeout (ms)
request_timeout_ms = 10000

# Forget sessions idle this long with no open event stream (seconds)
session_idle_secs = 3600

[ui]
# Built UI bundle served at / (trunk build output)
# dist_dir = "dashboard-ui/dist"

# Dataset catalog page linked from the dashboard
dataset_url = "{}"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#,
        DATASET_URL
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.addr(), "0.0.0.0:8090");
        assert_eq!(config.auth.provider, ProviderKind::Memory);
        assert!(config.ui.dist_dir.is_none());
        assert_eq!(config.ui.dataset_url, DATASET_URL);
        assert_eq!(
            config.logging.filter_directive(),
            "overdose_dashboard=info,tower_http=debug"
        );
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.port, 8090);
        assert_eq!(config.auth.provider, ProviderKind::Memory);
        assert_eq!(config.auth.request_timeout_ms, 10_000);
        assert_eq!(config.auth.session_idle_secs, 3600);
        assert_eq!(config.ui.dataset_url, DATASET_URL);
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[api]
port = 9000

[auth]
provider = "identity_toolkit"
api_key = "abc"

[ui]
dist_dir = "dist"

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.auth.provider, ProviderKind::IdentityToolkit);
        assert_eq!(config.auth.identity_toolkit().api_key, "abc");
        assert_eq!(config.ui.dist_dir.as_deref(), Some("dist"));
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_load_errors_name_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[auth]\nprovider = \"ldap\"").unwrap();

        match Config::load(file.path()) {
            Err(ConfigError::Parse { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected parse error, got {:?}", other),
        }

        let missing = Config::load(Path::new("/nonexistent/overdose-dashboard.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DASHBOARD_API_PORT", "7000"),
            ("DASHBOARD_AUTH_PROVIDER", "identity-toolkit"),
            ("DASHBOARD_AUTH_API_KEY", "key"),
            ("DASHBOARD_UI_DIST", "/srv/ui"),
            ("DASHBOARD_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.port, 7000);
        assert_eq!(config.auth.provider, ProviderKind::IdentityToolkit);
        assert_eq!(config.auth.api_key, "key");
        assert_eq!(config.ui.dist_dir.as_deref(), Some("/srv/ui"));
        assert_eq!(
            config.logging.filter_directive(),
            "overdose_dashboard=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            "DASHBOARD_API_PORT" => Some("not-a-port".to_string()),
            "DASHBOARD_AUTH_PROVIDER" => Some("ldap".to_string()),
            _ => None,
        });
        assert_eq!(config.api.port, 8090);
        assert_eq!(config.auth.provider, ProviderKind::Memory);
    }
}

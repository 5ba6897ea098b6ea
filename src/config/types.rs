// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use super::database::{DatabaseConfig, DatabaseSettings};
use super::profile::Profile;
use crate::logger::AccessLogFormat;

/// Settings as deserialized from the layered sources, before validation
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub debug: bool,
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default)]
    pub database: DatabaseSettings,
    pub paths: PathsConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Main configuration structure, immutable once built
#[derive(Debug, Clone)]
pub struct Config {
    pub profile: Profile,
    pub debug: bool,
    pub secret_key: SecretKey,
    pub database: DatabaseConfig,
    pub paths: PathsConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Secret key material. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    pub const fn new(value: String) -> Self {
        Self(value)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Filesystem locations. Relative entries are resolved against `base_dir`.
#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    pub base_dir: PathBuf,
    /// Root of the served script assets (contains `yandex/`)
    pub asset_dir: PathBuf,
    pub template_dir: PathBuf,
    pub static_root: PathBuf,
    pub media_root: PathBuf,
}

impl PathsConfig {
    /// Anchor every relative directory at `base_dir`
    pub fn anchored(&self) -> Self {
        Self {
            base_dir: self.base_dir.clone(),
            asset_dir: self.anchor(&self.asset_dir),
            template_dir: self.anchor(&self.template_dir),
            static_root: self.anchor(&self.static_root),
            media_root: self.anchor(&self.media_root),
        }
    }

    fn anchor(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default)]
    pub access_log_format: AccessLogFormat,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
    /// Seconds to wait for in-flight connections on shutdown
    pub shutdown_grace: u64,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
}

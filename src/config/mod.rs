// Configuration module entry point
// Builds the immutable process-wide configuration from the selected profile

mod database;
mod error;
mod profile;
mod state;
mod types;

use std::net::SocketAddr;

use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};

use database::DatabaseConfig;
use profile::DEV_SECRET_KEY;
use types::{SecretKey, Settings};

// Re-export public types
pub use error::ConfigError;
pub use profile::Profile;
pub use state::AppState;
pub use types::Config;

/// Prefix for nested environment overrides, e.g. `LANDING_SERVER__PORT=9000`
const ENV_PREFIX: &str = "LANDING";

impl Config {
    /// Load configuration for `profile` from `<config_path>.toml` (extension optional)
    ///
    /// Sources, lowest priority first: defaults, `<path>.toml`, `<path>.<profile>.toml`,
    /// `LANDING_*` environment, `PORT`/`DATABASE_URL`/`SECRET_KEY`, profile overrides.
    pub fn load_from(config_path: &str, profile: Profile) -> Result<Self, ConfigError> {
        let stem = config_path.strip_suffix(".toml").unwrap_or(config_path);
        let builder = Self::defaults()?
            .add_source(File::new(&format!("{stem}.toml"), FileFormat::Toml).required(false))
            .add_source(
                File::new(&format!("{stem}.{}.toml", profile.name()), FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("secret_key", std::env::var("SECRET_KEY").ok())?;

        Self::build(builder, profile)
    }

    /// Build configuration from a single extra source on top of the defaults
    #[cfg(test)]
    pub fn from_source<S>(source: S, profile: Profile) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        Self::build(Self::defaults()?.add_source(source), profile)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("debug", false)?
            .set_default("paths.base_dir", ".")?
            .set_default("paths.asset_dir", "assets")?
            .set_default("paths.template_dir", "templates")?
            .set_default("paths.static_root", "staticfiles")?
            .set_default("paths.media_root", "media")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_grace", 10)?
            .set_default("http.server_name", concat!("landingpage/", env!("CARGO_PKG_VERSION")))
    }

    fn build(builder: ConfigBuilder<DefaultState>, profile: Profile) -> Result<Self, ConfigError> {
        let settings: Settings = profile.apply(builder)?.build()?.try_deserialize()?;
        Self::resolve(settings, profile)
    }

    /// Validate raw settings and turn them into the immutable configuration
    pub fn resolve(settings: Settings, profile: Profile) -> Result<Self, ConfigError> {
        let secret_key = settings
            .secret_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingField("secret_key"))?;
        if profile != Profile::Development && secret_key == DEV_SECRET_KEY {
            return Err(ConfigError::InsecureSecretKey);
        }

        let paths = settings.paths.anchored();
        let database = DatabaseConfig::from_settings(&settings.database, &paths.base_dir)?;

        Ok(Self {
            profile,
            debug: settings.debug,
            secret_key: SecretKey::new(secret_key),
            database,
            paths,
            server: settings.server,
            logging: settings.logging,
            performance: settings.performance,
            http: settings.http,
        })
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ConfigError::InvalidAddress { addr, source })
    }
}

// Deployment profile module
// Selects the override bundle applied on top of the common settings

use std::fmt;
use std::str::FromStr;

use config::builder::DefaultState;
use config::ConfigBuilder;

use super::error::ConfigError;

/// Environment variable holding the profile name
pub const PROFILE_ENV: &str = "LANDING_PROFILE";

/// Secret key forced by the development profile. Not a secret.
pub const DEV_SECRET_KEY: &str = "development-only-insecure-placeholder-key";

/// Embedded database file used by the development profile, relative to `paths.base_dir`
pub const DEV_DATABASE_FILE: &str = "db.sqlite3";

/// Named bundle of configuration overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Development,
    Production,
}

impl Profile {
    /// Read the profile from `LANDING_PROFILE`, falling back to production
    pub fn from_env() -> Result<Self, ConfigError> {
        std::env::var(PROFILE_ENV).map_or(Ok(Self::Production), |value| value.parse())
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    /// Apply this profile's overrides. Overrides beat every other source.
    pub fn apply(
        self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        match self {
            Self::Development => builder
                .set_override("debug", true)?
                .set_override("secret_key", DEV_SECRET_KEY)?
                .set_override("database.url", "")?
                .set_override("database.engine", "sqlite3")?
                .set_override("database.name", DEV_DATABASE_FILE),
            Self::Production => Ok(builder),
        }
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

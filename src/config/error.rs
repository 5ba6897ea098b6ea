// Configuration error module
// Every variant is fatal at startup

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Source(#[from] config::ConfigError),

    #[error("unknown deployment profile '{0}' (expected development or production)")]
    UnknownProfile(String),

    #[error("missing required setting: {0}")]
    MissingField(&'static str),

    #[error("secret_key must not reuse the development placeholder outside the development profile")]
    InsecureSecretKey,

    #[error("invalid database url: {0}")]
    InvalidDatabaseUrl(#[from] url::ParseError),

    #[error("unsupported database engine '{0}'")]
    UnsupportedDatabaseEngine(String),

    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid listen address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

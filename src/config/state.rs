// Application state module
// Everything a request handler may read, built once at startup

use crate::handler::static_files::{AssetReader, TemplateLoader};
use crate::routing::{self, Router};

use super::error::ConfigError;
use super::types::Config;

/// Application state
///
/// Shared behind an `Arc` by every connection; nothing in here changes after startup.
pub struct AppState {
    pub config: Config,
    pub router: Router,
    pub assets: AssetReader,
    pub templates: TemplateLoader,
}

impl AppState {
    /// Build state with the landing page route table
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let router = Router::compile(routing::landing_routes())?;
        Ok(Self::with_router(config, router))
    }

    pub fn with_router(config: Config, router: Router) -> Self {
        Self {
            assets: AssetReader::new(config.paths.asset_dir.clone()),
            templates: TemplateLoader::new(config.paths.template_dir.clone()),
            config,
            router,
        }
    }
}

//! Static file serving module
//!
//! Reads script assets and templates from disk on every request. Nothing is cached.

use crate::handler::error::HandlerError;
use crate::http;
use crate::logger;
use crate::routing::ScriptAsset;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::PathBuf;
use tokio::fs;

/// Content type for every served script
pub const SCRIPT_CONTENT_TYPE: &str = "application/x-javascript";

/// Resolves asset names under the asset directory and reads their bytes
#[derive(Debug, Clone)]
pub struct AssetReader {
    root: PathBuf,
}

impl AssetReader {
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Read the whole file into memory
    pub async fn read(&self, relative: &str) -> Result<Vec<u8>, HandlerError> {
        let path = self.resolve(relative);
        logger::log_debug(&format!("Reading asset {}", path.display()));
        fs::read(&path)
            .await
            .map_err(|source| HandlerError::ResourceNotFound { path, source })
    }
}

/// Loads templates by name from the template directory
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    root: PathBuf,
}

impl TemplateLoader {
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Render a template. Templates carry no substitutions, so this is the file contents.
    pub async fn render(&self, name: &str) -> Result<String, HandlerError> {
        let path = self.root.join(name);
        fs::read_to_string(&path)
            .await
            .map_err(|source| HandlerError::TemplateNotFound {
                name: name.to_string(),
                path,
                source,
            })
    }
}

/// Serve a script asset with the fixed JavaScript content type
pub async fn serve_script(
    assets: &AssetReader,
    asset: ScriptAsset,
) -> Result<Response<Full<Bytes>>, HandlerError> {
    let data = assets.read(asset.path).await?;
    Ok(http::build_bytes_response(
        Bytes::from(data),
        SCRIPT_CONTENT_TYPE,
    ))
}

/// Serve the landing page
pub async fn serve_index(
    templates: &TemplateLoader,
    template: &str,
) -> Result<Response<Full<Bytes>>, HandlerError> {
    let html = templates.render(template).await?;
    Ok(http::build_html_response(html))
}

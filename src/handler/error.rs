// Handler error module
// Failures are local to one request and surface as 500 responses

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("failed to read asset {path:?}")]
    ResourceNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("template '{name}' not found at {path:?}")]
    TemplateNotFound {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

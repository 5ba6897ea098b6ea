//! Request handler module
//!
//! Request dispatch plus the three handler kinds: landing page template,
//! script assets and the translate redirect.

pub mod error;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;

//! HTTP protocol layer module
//!
//! Response builders shared by the handlers, decoupled from routing.

pub mod response;

// Re-export commonly used types
pub use response::{
    build_404_response, build_500_response, build_bytes_response, build_debug_404_response,
    build_html_response, build_redirect_response,
};

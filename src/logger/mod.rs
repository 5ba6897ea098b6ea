//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Server lifecycle logging
//! - Access logging in combined, common or json format
//! - Error, warning and debug logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, AccessLogFormat};

use crate::config::Config;
use crate::routing::Route;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = config.logging.level.to_ascii_lowercase();
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        matches!(level.as_str(), "debug" | "trace"),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Landing page server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Profile: {}", config.profile));
    write_info(&format!("Debug: {}", config.debug));
    write_info(&format!("Database: {}", config.database.describe()));
    write_info(&format!("Assets: {}", config.paths.asset_dir.display()));
    write_info(&format!("Templates: {}", config.paths.template_dir.display()));
    write_info(&format!("Static root: {}", config.paths.static_root.display()));
    write_info(&format!("Media root: {}", config.paths.media_root.display()));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_route_table(routes: &[Route]) {
    write_info("[Routes]");
    for (i, route) in routes.iter().enumerate() {
        let name = route.name.map(|n| format!(" [{n}]")).unwrap_or_default();
        write_info(&format!(
            "  {}. {} -> {}{name}",
            i + 1,
            route.pattern.as_str(),
            route.handler.describe()
        ));
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Only written when `logging.level` is debug or trace
pub fn log_debug(message: &str) {
    if let Some(w) = writer::get() {
        if w.debug_enabled() {
            w.write_access(&format!("[DEBUG] {message}"));
        }
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &AccessLogFormat) {
    match writer::get() {
        Some(w) => w.write_access(&entry.format(format)),
        None => println!("{}", entry.format(format)),
    }
}

//! Logger module
//!
//! Logging utilities for the server:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Routing decision, error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, LogFormat};

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
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
    let site = config.site_options();
    write_info("======================================");
    write_info("Static export server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Asset directory: {}", config.site.asset_dir));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    write_info(&format!(
        "Indexing: {}",
        if site.allow_indexing { "allowed" } else { "blocked" }
    ));
    write_info(&format!("Noindex injection: {}", site.inject_noindex));
    if site.host_redirect.is_active() {
        write_info(&format!(
            "Host redirect: {} -> {}",
            site.host_redirect.from, site.host_redirect.to
        ));
    } else if site.host_redirect.enabled {
        write_info("Host redirect: off (hostnames not configured)");
    }
    write_info(&format!("Miss policy: {:?}", site.miss_policy));
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

/// Log the routing decision for a request
pub fn log_decision(method: &hyper::Method, path: &str, decision: &impl std::fmt::Display) {
    write_info(&format!("[Route] {method} {path} => {decision}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    match writer::get() {
        Some(w) => w.write_access(&entry.format(format)),
        None => println!("{}", entry.format(format)),
    }
}

/// Reopen log files after rotation
pub fn reopen() {
    if let Some(w) = writer::get() {
        if let Err(e) = w.reopen() {
            log_error(&format!("Failed to reopen log files: {e}"));
        }
    }
}

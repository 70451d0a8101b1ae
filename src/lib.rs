//! Edge server for a static site export.
//!
//! Requests go through an ordered pipeline: legacy and canonical-URL
//! redirects, an optional secondary-host redirect, robots.txt, asset lookup
//! with SPA fallback, and noindex injection into HTML.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
pub mod store;

//! Routing module
//!
//! Decides what a request maps to before any asset is read:
//! - Path canonicalization into asset keys
//! - The ordered redirect rule table
//! - The robots.txt policy

mod canonical;
mod request;
mod robots;
mod rules;

pub use canonical::asset_key;
pub use request::IncomingRequest;
pub use robots::{robots_txt, ROBOTS_CONTENT_TYPE, ROBOTS_PATH};
pub use rules::{
    default_legacy_redirects, Destination, PathPattern, Redirect, RedirectRule, RedirectTable,
};

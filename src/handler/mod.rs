//! Request handler module
//!
//! The request pipeline and the hyper-facing entry point that feeds it.

pub mod assets;
pub mod pipeline;
pub mod rewrite;
pub mod router;

// Re-export main entry point
pub use pipeline::{Pipeline, RoutingDecision};
pub use router::handle_request;

//! HTTP protocol layer module
//!
//! Response drafting, response builders and MIME detection, decoupled from the
//! routing rules that decide which response to produce.

pub mod draft;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use draft::ResponseDraft;
pub use response::{
    build_404_response, build_asset_response, build_redirect_response, build_text_response,
};

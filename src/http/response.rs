//! HTTP response building module
//!
//! Builders for the responses the pipeline can produce. They return drafts;
//! the connection layer finalizes them.

use super::draft::ResponseDraft;
use crate::store::Asset;
use hyper::header::{CONTENT_TYPE, LOCATION};
use hyper::StatusCode;

/// Build 404 Not Found response
pub fn build_404_response() -> ResponseDraft {
    ResponseDraft::new(StatusCode::NOT_FOUND, "404 Not Found")
        .with_header(CONTENT_TYPE, "text/plain; charset=utf-8")
}

/// Build redirect response (301 or 302)
pub fn build_redirect_response(location: &str, status: StatusCode) -> ResponseDraft {
    ResponseDraft::new(status, "Redirecting...")
        .with_header(LOCATION, location)
        .with_header(CONTENT_TYPE, "text/plain; charset=utf-8")
}

/// Build 200 response with a fixed text body
pub fn build_text_response(body: &'static str, content_type: &str) -> ResponseDraft {
    ResponseDraft::new(StatusCode::OK, body).with_header(CONTENT_TYPE, content_type)
}

/// Build 200 response carrying an asset as the store returned it
pub fn build_asset_response(asset: Asset) -> ResponseDraft {
    ResponseDraft::new(StatusCode::OK, asset.body).with_header(CONTENT_TYPE, &asset.content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_response() {
        let draft = build_redirect_response("https://example.com/", StatusCode::MOVED_PERMANENTLY);
        assert_eq!(draft.status, StatusCode::MOVED_PERMANENTLY);
        assert_eq!(draft.header(&LOCATION), Some("https://example.com/"));
    }

    #[test]
    fn test_404_response() {
        let draft = build_404_response();
        assert_eq!(draft.status, StatusCode::NOT_FOUND);
        assert_eq!(draft.body.as_ref(), b"404 Not Found");
    }

    #[test]
    fn test_asset_response_keeps_store_content_type() {
        let draft = build_asset_response(Asset::new("{}", "application/json"));
        assert_eq!(draft.status, StatusCode::OK);
        assert_eq!(draft.content_type(), "application/json");
    }
}

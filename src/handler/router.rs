//! Request entry point
//!
//! Converts the hyper request into an [`IncomingRequest`], runs the pipeline
//! and finalizes the response. Never fails: every request gets a response.

use crate::config::AppState;
use crate::logger::{self, AccessLogEntry};
use crate::routing::IncomingRequest;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::http::request::Parts;
use hyper::{Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// The request body is never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, _body) = req.into_parts();
    let incoming = IncomingRequest::from_parts(&parts, &state.pipeline.site().default_scheme);

    let decision = state.pipeline.decide(&incoming);
    if state.config.logging.log_decisions {
        logger::log_decision(&incoming.method, &incoming.path, &decision);
    }

    let draft = state.pipeline.execute(&incoming, decision).await;
    let status = draft.status.as_u16();
    let body_bytes = if incoming.is_head() { 0 } else { draft.body.len() };
    let response = draft.into_response(&state.config.server.server_name, incoming.is_head());

    if state.access_log_enabled.load(Ordering::Relaxed) {
        let mut entry = access_entry(&parts, &incoming, peer_addr);
        entry.status = status;
        entry.body_bytes = body_bytes;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn access_entry(parts: &Parts, incoming: &IncomingRequest, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        incoming.method.to_string(),
        incoming.path.clone(),
    );
    entry.query.clone_from(&incoming.query);
    entry.http_version = http_version(parts.version).to_string();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}

const fn http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, SiteOptions};
    use crate::handler::Pipeline;
    use crate::store::MemoryStore;
    use http_body_util::BodyExt;
    use hyper::header::{CONTENT_LENGTH, LOCATION};
    use hyper::{Method, StatusCode};

    fn state() -> Arc<AppState> {
        let mut config = Config::load_from("__missing_test_config__").unwrap();
        config.logging.access_log = false;
        let store = MemoryStore::new().with("/index.html", "<html><head></head>home</html>", "text/html");
        let pipeline = Pipeline::new(SiteOptions::default(), Arc::new(store));
        Arc::new(AppState::new(&config, pipeline))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_handle_get() {
        let req = Request::builder()
            .uri("/")
            .header("host", "example.com")
            .body(())
            .unwrap();
        let response = handle_request(req, state(), peer()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), b"<html><head></head>home</html>");
    }

    #[tokio::test]
    async fn test_handle_head() {
        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/")
            .body(())
            .unwrap();
        let response = handle_request(req, state(), peer()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_LENGTH], "30");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_handle_redirect_uses_host_header() {
        let req = Request::builder()
            .uri("/index.html")
            .header("host", "example.com")
            .body(())
            .unwrap();
        let response = handle_request(req, state(), peer()).await.unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[LOCATION], "http://example.com/");
    }

    #[test]
    fn test_http_version() {
        assert_eq!(http_version(Version::HTTP_11), "1.1");
        assert_eq!(http_version(Version::HTTP_2), "2");
    }
}

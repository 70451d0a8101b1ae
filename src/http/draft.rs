//! Response draft
//!
//! The pipeline builds a [`ResponseDraft`] first so that the HTML rewrite can
//! still change the body and headers before anything is sent.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE, SERVER};
use hyper::{Response, StatusCode};

/// Status, headers and body of a response that is not final yet
///
/// Header names are case-insensitive and setting a header replaces any
/// previous value.
#[derive(Debug, Clone)]
pub struct ResponseDraft {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ResponseDraft {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Set a header, replacing previous values; invalid values are dropped
    pub fn set_header(&mut self, name: HeaderName, value: &str) {
        match HeaderValue::from_str(value) {
            Ok(v) => {
                self.headers.insert(name, v);
            }
            Err(e) => {
                crate::logger::log_warning(&format!("Dropping header {name}: {e}"));
            }
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> &str {
        self.header(&CONTENT_TYPE).unwrap_or("")
    }

    /// Turn the draft into the response sent on the wire
    ///
    /// HEAD responses keep `Content-Length` of the full body but send no bytes.
    pub fn into_response(self, server_name: &str, is_head: bool) -> Response<Full<Bytes>> {
        let Self {
            status,
            headers,
            body,
        } = self;
        let content_length = body.len();
        let body = if is_head { Bytes::new() } else { body };

        let mut response = Response::new(Full::new(body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
            .headers_mut()
            .insert(CONTENT_LENGTH, HeaderValue::from(content_length));
        if let Ok(v) = HeaderValue::from_str(server_name) {
            response.headers_mut().insert(SERVER, v);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_headers_last_write_wins() {
        let mut draft = ResponseDraft::new(StatusCode::OK, "x")
            .with_header(CONTENT_TYPE, "text/html");
        draft.set_header(HeaderName::from_static("content-type"), "text/plain");
        assert_eq!(draft.content_type(), "text/plain");
        assert_eq!(draft.headers.len(), 1);
    }

    #[tokio::test]
    async fn test_into_response_head() {
        let draft = ResponseDraft::new(StatusCode::OK, "hello")
            .with_header(CONTENT_TYPE, "text/plain");
        let response = draft.into_response("test", true);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_LENGTH], "5");
        assert_eq!(response.headers()[SERVER], "test");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }
}

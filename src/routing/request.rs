//! Incoming request view
//!
//! The parts of an HTTP request the routing rules look at, detached from the
//! hyper body so that rules and the pipeline can be exercised directly.

use hyper::header::HOST;
use hyper::http::request::Parts;
use hyper::Method;

/// Method and URL of an inbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingRequest {
    pub method: Method,
    pub scheme: String,
    /// Host with optional port, as the client sent it
    pub host: Option<String>,
    pub path: String,
    /// Query string without the leading `?`
    pub query: Option<String>,
}

impl IncomingRequest {
    /// Build a request from a URL path with optional `?query`
    pub fn new(method: Method, scheme: &str, host: Option<&str>, path_and_query: &str) -> Self {
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (path_and_query, None),
        };
        Self {
            method,
            scheme: scheme.to_string(),
            host: host.map(ToString::to_string),
            path: path.to_string(),
            query,
        }
    }

    /// Extract the request view from hyper request parts
    ///
    /// Scheme comes from the absolute URI, then the first `X-Forwarded-Proto`
    /// entry, then `default_scheme`. Host comes from the URI authority, then
    /// `Host`.
    pub fn from_parts(parts: &Parts, default_scheme: &str) -> Self {
        let uri = &parts.uri;
        let scheme = uri
            .scheme_str()
            .or_else(|| {
                parts
                    .headers
                    .get("x-forwarded-proto")
                    .and_then(|v| v.to_str().ok())
                    .and_then(forwarded_scheme)
            })
            .unwrap_or(default_scheme);
        let host = uri.authority().map(ToString::to_string).or_else(|| {
            parts
                .headers
                .get(HOST)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        });

        Self {
            method: parts.method.clone(),
            scheme: scheme.to_ascii_lowercase(),
            host,
            path: uri.path().to_string(),
            query: uri.query().map(ToString::to_string),
        }
    }

    /// Host name with any port removed
    pub fn hostname(&self) -> Option<&str> {
        let host = self.host.as_deref()?;
        if let Some(rest) = host.strip_prefix('[') {
            // IPv6 literal, e.g. "[::1]:8080"
            return rest.split(']').next();
        }
        host.split(':').next()
    }

    /// `?query`, or an empty string when there is no query
    pub fn search(&self) -> String {
        self.query
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(|q| format!("?{q}"))
            .unwrap_or_default()
    }

    /// Scheme and host, e.g. `https://example.com`
    pub fn origin(&self) -> Option<String> {
        self.host
            .as_deref()
            .map(|host| format!("{}://{host}", self.scheme))
    }

    /// Resolve a site-relative target against the request origin
    ///
    /// Falls back to the relative target when the host is unknown.
    pub fn absolute(&self, target: &str) -> String {
        match self.origin() {
            Some(origin) => format!("{origin}{target}"),
            None => target.to_string(),
        }
    }

    /// GET and HEAD retrieve without side effects
    pub fn is_retrieval(&self) -> bool {
        self.method == Method::GET || self.method == Method::HEAD
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }
}

/// First hop of an `X-Forwarded-Proto` list, if it is http or https
fn forwarded_scheme(value: &str) -> Option<&str> {
    let first = value.split(',').next()?.trim();
    ["http", "https"]
        .into_iter()
        .find(|scheme| first.eq_ignore_ascii_case(scheme))
}

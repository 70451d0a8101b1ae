//! Redirect rule table
//!
//! An ordered list of rules evaluated first-match against the original
//! request path. At most one redirect is issued per request; rules never see
//! the output of another rule.
//!
//! Order of the built table:
//! 1. configured legacy redirects (or the built-in set when none are configured)
//! 2. `/index` and `/index.html` to `/`
//! 3. `.../index` and `.../index.html` to the parent directory
//! 4. `.html` suffix stripped, query preserved
//! 5. secondary host to primary host, when enabled

use super::request::IncomingRequest;
use super::robots::ROBOTS_PATH;
use crate::config::{RedirectEntry, RedirectMatch, SiteOptions};
use crate::logger;
use hyper::StatusCode;

/// Which requests a rule applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// `P`, `P/` and anything below `P/`
    Section(String),
    /// `P/<x>` with `<x>` non-empty; never `P` or `P/`
    Subpaths(String),
    Exact(String),
    /// `/index` or `/index.html`
    RootIndex,
    /// Any path whose final segment is `index` or `index.html`
    NestedIndex,
    /// Any path ending in `.html`
    HtmlSuffix,
    /// Any path on the given host, except robots.txt
    Host(String),
}

/// Where a matching rule sends the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A site path, resolved against the request origin
    Path(String),
    /// The request path without its final `index`/`index.html` segment
    ParentDirectory,
    /// The request path without `.html`, query preserved
    StripHtml,
    /// Same path and query on another host
    PrimaryHost { scheme: String, host: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRule {
    pub name: String,
    pub pattern: PathPattern,
    pub destination: Destination,
    pub status: StatusCode,
}

/// A redirect produced by the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
    pub status: StatusCode,
    /// Name of the rule that fired
    pub rule: String,
}

impl PathPattern {
    pub fn matches(&self, req: &IncomingRequest) -> bool {
        let path = req.path.as_str();
        match self {
            Self::Section(prefix) => {
                let prefix = prefix.trim_end_matches('/');
                path == prefix
                    || path
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            Self::Subpaths(prefix) => path
                .strip_prefix(prefix.trim_end_matches('/'))
                .and_then(|rest| rest.strip_prefix('/'))
                .is_some_and(|rest| !rest.is_empty()),
            Self::Exact(exact) => path == exact,
            Self::RootIndex => path == "/index" || path == "/index.html",
            Self::NestedIndex => path.ends_with("/index") || path.ends_with("/index.html"),
            Self::HtmlSuffix => path.ends_with(".html"),
            Self::Host(host) => {
                path != ROBOTS_PATH
                    && req
                        .hostname()
                        .is_some_and(|h| h.eq_ignore_ascii_case(host))
            }
        }
    }
}

impl Destination {
    fn location(&self, req: &IncomingRequest) -> String {
        let path = req.path.as_str();
        match self {
            Self::Path(target) => req.absolute(target),
            Self::ParentDirectory => {
                let parent = path
                    .strip_suffix("index.html")
                    .or_else(|| path.strip_suffix("index"))
                    .unwrap_or(path);
                req.absolute(parent)
            }
            Self::StripHtml => {
                let clean = match path.strip_suffix(".html").unwrap_or(path) {
                    "" => "/",
                    clean => clean,
                };
                req.absolute(&format!("{clean}{}", req.search()))
            }
            Self::PrimaryHost { scheme, host } => {
                format!("{scheme}://{host}{path}{}", req.search())
            }
        }
    }
}

impl RedirectRule {
    pub fn new(
        name: impl Into<String>,
        pattern: PathPattern,
        destination: Destination,
        status: StatusCode,
    ) -> Self {
        Self {
            name: name.into(),
            pattern,
            destination,
            status,
        }
    }

    /// Build a rule from a configured entry
    ///
    /// Codes outside 3xx fall back to 302.
    pub fn from_entry(entry: &RedirectEntry) -> Self {
        let status = match StatusCode::from_u16(entry.code) {
            Ok(code) if code.is_redirection() => code,
            _ => {
                logger::log_warning(&format!(
                    "Redirect for '{}' has invalid code {}, using 302",
                    entry.path, entry.code
                ));
                StatusCode::FOUND
            }
        };
        let pattern = match entry.kind {
            RedirectMatch::Section => PathPattern::Section(entry.path.clone()),
            RedirectMatch::Subpaths => PathPattern::Subpaths(entry.path.clone()),
            RedirectMatch::Exact => PathPattern::Exact(entry.path.clone()),
        };
        Self::new(
            format!("legacy:{}", entry.path),
            pattern,
            Destination::Path(entry.target.clone()),
            status,
        )
    }

    pub fn apply(&self, req: &IncomingRequest) -> Option<Redirect> {
        if !self.pattern.matches(req) {
            return None;
        }
        Some(Redirect {
            location: self.destination.location(req),
            status: self.status,
            rule: self.name.clone(),
        })
    }
}

/// Legacy redirects used when the configuration lists none
///
/// Retired CMS sections go to the home page; comparison pages and anything
/// below `/start` go to `/start`.
pub fn default_legacy_redirects() -> Vec<RedirectEntry> {
    let section = |path: &str, target: &str| RedirectEntry {
        kind: RedirectMatch::Section,
        path: path.to_string(),
        target: target.to_string(),
        code: 302,
    };

    vec![
        section("/blog", "/"),
        section("/blog/category", "/"),
        section("/home-equity", "/"),
        section("/partner", "/"),
        section("/media-room", "/"),
        section("/or", "/start"),
        section("/vs", "/start"),
        RedirectEntry {
            kind: RedirectMatch::Subpaths,
            path: "/start".to_string(),
            target: "/start".to_string(),
            code: 302,
        },
    ]
}

/// Ordered redirect rules, first match wins
#[derive(Debug, Clone, Default)]
pub struct RedirectTable {
    rules: Vec<RedirectRule>,
}

impl RedirectTable {
    pub const fn new(rules: Vec<RedirectRule>) -> Self {
        Self { rules }
    }

    /// Build the full table for a site
    pub fn from_options(site: &SiteOptions) -> Self {
        let legacy = if site.redirects.is_empty() {
            default_legacy_redirects()
        } else {
            site.redirects.clone()
        };

        let mut rules: Vec<RedirectRule> = legacy.iter().map(RedirectRule::from_entry).collect();

        rules.push(RedirectRule::new(
            "index:root",
            PathPattern::RootIndex,
            Destination::Path("/".to_string()),
            StatusCode::MOVED_PERMANENTLY,
        ));
        rules.push(RedirectRule::new(
            "index:parent",
            PathPattern::NestedIndex,
            Destination::ParentDirectory,
            StatusCode::MOVED_PERMANENTLY,
        ));
        rules.push(RedirectRule::new(
            "strip-html",
            PathPattern::HtmlSuffix,
            Destination::StripHtml,
            StatusCode::MOVED_PERMANENTLY,
        ));

        let host = &site.host_redirect;
        if host.enabled && !host.is_active() {
            logger::log_warning(&format!(
                "Host redirect is enabled but a hostname is missing (from '{}', to '{}'); no host redirect will be issued",
                host.from, host.to
            ));
        }
        if host.is_active() {
            rules.push(RedirectRule::new(
                "host",
                PathPattern::Host(host.from.clone()),
                Destination::PrimaryHost {
                    scheme: host.scheme.clone(),
                    host: host.to.clone(),
                },
                StatusCode::FOUND,
            ));
        }

        Self::new(rules)
    }

    pub fn rules(&self) -> &[RedirectRule] {
        &self.rules
    }

    /// Redirect for the first matching rule, if any
    pub fn evaluate(&self, req: &IncomingRequest) -> Option<Redirect> {
        self.rules.iter().find_map(|rule| rule.apply(req))
    }
}

//! Request pipeline
//!
//! Turns an [`IncomingRequest`] into exactly one response draft:
//! redirect table, robots.txt, asset lookup with fallback, HTML rewrite,
//! miss policy.

use super::assets::{self, Retrieval};
use super::rewrite;
use crate::config::{MissPolicy, SiteOptions};
use crate::http::{self, ResponseDraft};
use crate::routing::{
    self, IncomingRequest, Redirect, RedirectTable, ROBOTS_CONTENT_TYPE, ROBOTS_PATH,
};
use crate::store::AssetStore;
use hyper::StatusCode;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// What a request resolves to before any asset is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    Redirect(Redirect),
    StaticText {
        body: &'static str,
        content_type: &'static str,
    },
    /// Look up the rewritten asset key
    AssetLookup(String),
    /// The request path already is an asset key
    PassThrough,
}

impl fmt::Display for RoutingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redirect(r) => write!(f, "redirect {} -> {} ({})", r.status.as_u16(), r.location, r.rule),
            Self::StaticText { content_type, .. } => write!(f, "static text ({content_type})"),
            Self::AssetLookup(key) => write!(f, "asset {key}"),
            Self::PassThrough => write!(f, "asset (as requested)"),
        }
    }
}

/// Site options, redirect table and asset store for one deployment
pub struct Pipeline {
    site: SiteOptions,
    redirects: RedirectTable,
    store: Arc<dyn AssetStore>,
}

impl Pipeline {
    pub fn new(site: SiteOptions, store: Arc<dyn AssetStore>) -> Self {
        let redirects = RedirectTable::from_options(&site);
        Self {
            site,
            redirects,
            store,
        }
    }

    pub const fn site(&self) -> &SiteOptions {
        &self.site
    }

    pub const fn redirects(&self) -> &RedirectTable {
        &self.redirects
    }

    /// First matching rule decides; nothing here touches the store
    pub fn decide(&self, req: &IncomingRequest) -> RoutingDecision {
        if let Some(redirect) = self.redirects.evaluate(req) {
            return RoutingDecision::Redirect(redirect);
        }

        if req.path == ROBOTS_PATH {
            return RoutingDecision::StaticText {
                body: routing::robots_txt(self.site.allow_indexing),
                content_type: ROBOTS_CONTENT_TYPE,
            };
        }

        match routing::asset_key(&req.path) {
            Cow::Owned(key) => RoutingDecision::AssetLookup(key),
            Cow::Borrowed(_) => RoutingDecision::PassThrough,
        }
    }

    /// Produce the response for a decision
    pub async fn execute(&self, req: &IncomingRequest, decision: RoutingDecision) -> ResponseDraft {
        match decision {
            RoutingDecision::Redirect(redirect) => {
                http::build_redirect_response(&redirect.location, redirect.status)
            }
            RoutingDecision::StaticText { body, content_type } => {
                http::build_text_response(body, content_type)
            }
            RoutingDecision::AssetLookup(key) => self.serve_asset(req, &key).await,
            RoutingDecision::PassThrough => self.serve_asset(req, &req.path).await,
        }
    }

    pub async fn respond(&self, req: &IncomingRequest) -> ResponseDraft {
        let decision = self.decide(req);
        self.execute(req, decision).await
    }

    async fn serve_asset(&self, req: &IncomingRequest, key: &str) -> ResponseDraft {
        match assets::retrieve(self.store.as_ref(), req, key, &self.site).await {
            Retrieval::Found { asset, .. } => {
                let mut draft = http::build_asset_response(asset);
                if self.site.inject_noindex {
                    rewrite::rewrite_html(&mut draft);
                }
                draft
            }
            Retrieval::Missed => self.on_miss(req),
        }
    }

    fn on_miss(&self, req: &IncomingRequest) -> ResponseDraft {
        match self.site.miss_policy {
            MissPolicy::NotFound => http::build_404_response(),
            MissPolicy::RedirectRoot => {
                http::build_redirect_response(&req.absolute("/"), StatusCode::FOUND)
            }
        }
    }
}

//! Asset retrieval with SPA fallback

use crate::config::SiteOptions;
use crate::logger;
use crate::routing::IncomingRequest;
use crate::store::{Asset, AssetStore, StoreError};

/// Result of resolving a request against the asset store
#[derive(Debug)]
pub enum Retrieval {
    Found {
        asset: Asset,
        /// Key the asset was stored under
        key: String,
        /// Whether the fallback document was served instead
        fallback: bool,
    },
    /// Every permitted lookup missed
    Missed,
}

/// Look up `key`, retrying the fallback document for GET and HEAD
///
/// Any store error counts as a miss; errors other than "not found" are logged.
pub async fn retrieve(
    store: &dyn AssetStore,
    req: &IncomingRequest,
    key: &str,
    site: &SiteOptions,
) -> Retrieval {
    if let Some(asset) = lookup(store, key).await {
        return Retrieval::Found {
            asset,
            key: key.to_string(),
            fallback: false,
        };
    }

    let fallback = site.fallback_document.as_str();
    if site.spa_fallback && req.is_retrieval() && key != fallback {
        if let Some(asset) = lookup(store, fallback).await {
            return Retrieval::Found {
                asset,
                key: fallback.to_string(),
                fallback: true,
            };
        }
    }

    Retrieval::Missed
}

async fn lookup(store: &dyn AssetStore, key: &str) -> Option<Asset> {
    match store.lookup(key).await {
        Ok(asset) => Some(asset),
        Err(StoreError::NotFound(_)) => None,
        Err(e) => {
            logger::log_warning(&format!("Asset lookup failed: {e}"));
            None
        }
    }
}

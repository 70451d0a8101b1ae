//! In-memory asset store

use super::{Asset, AssetStore, StoreError};
use async_trait::async_trait;
use hyper::body::Bytes;
use std::collections::HashMap;

/// Asset store backed by a map, keyed by the full asset path
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    assets: HashMap<String, Asset>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset, replacing any previous one under the same key
    #[must_use]
    pub fn with(
        mut self,
        key: &str,
        body: impl Into<Bytes>,
        content_type: &str,
    ) -> Self {
        self.insert(key, body, content_type);
        self
    }

    pub fn insert(&mut self, key: &str, body: impl Into<Bytes>, content_type: &str) {
        self.assets
            .insert(key.to_string(), Asset::new(body, content_type));
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[async_trait]
impl AssetStore for MemoryStore {
    async fn lookup(&self, key: &str) -> Result<Asset, StoreError> {
        self.assets
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }
}

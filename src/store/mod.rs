//! Asset store module
//!
//! The request pipeline only sees the [`AssetStore`] capability: look up a
//! path-like key and get back the payload with its content type, or a miss.
//! Two backends are provided, a directory holding the static export and an
//! in-memory map.

mod dir;
mod memory;

pub use dir::DirectoryStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use hyper::body::Bytes;
use thiserror::Error;

/// A stored payload and its content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub body: Bytes,
    pub content_type: String,
}

impl Asset {
    pub fn new(body: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            content_type: content_type.into(),
        }
    }
}

/// Errors returned by an asset lookup
#[derive(Debug, Error)]
pub enum StoreError {
    /// No asset is stored under the key
    #[error("asset not found: {0}")]
    NotFound(String),

    /// The key escapes the store or is otherwise unusable
    #[error("invalid asset key: {0}")]
    InvalidKey(String),

    /// The backend failed while reading the asset
    #[error("failed to read asset '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Read-only key-value asset store
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Look up the asset stored under `key` (a path beginning with `/`)
    async fn lookup(&self, key: &str) -> Result<Asset, StoreError>;
}

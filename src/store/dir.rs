//! Directory-backed asset store
//!
//! Serves the static export from a directory on disk. Keys are resolved
//! relative to the root and must stay inside it.

use super::{Asset, AssetStore, StoreError};
use crate::http::mime;
use crate::logger;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Asset store reading files below a root directory
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key onto a path below the root, rejecting anything but plain segments
    ///
    /// Keys arrive percent-encoded; segments are checked after decoding.
    fn resolve(&self, key: &str) -> Result<PathBuf, StoreError> {
        let decoded =
            urlencoding::decode(key).map_err(|_| StoreError::InvalidKey(key.to_string()))?;
        if decoded.contains('\0') {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        let relative = Path::new(decoded.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetStore for DirectoryStore {
    async fn lookup(&self, key: &str) -> Result<Asset, StoreError> {
        let file_path = self.resolve(key)?;

        // Symlinks may still point outside the root
        let root = fs::canonicalize(&self.root)
            .await
            .map_err(|source| io_error(key, source))?;
        let resolved = fs::canonicalize(&file_path)
            .await
            .map_err(|source| io_error(key, source))?;
        if !resolved.starts_with(&root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {} -> {}",
                key,
                resolved.display()
            ));
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        let metadata = fs::metadata(&resolved)
            .await
            .map_err(|source| io_error(key, source))?;
        if metadata.is_dir() {
            return Err(StoreError::NotFound(key.to_string()));
        }

        let body = fs::read(&resolved)
            .await
            .map_err(|source| io_error(key, source))?;
        let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));

        Ok(Asset::new(body, content_type))
    }
}

fn io_error(key: &str, source: std::io::Error) -> StoreError {
    if source.kind() == ErrorKind::NotFound {
        StoreError::NotFound(key.to_string())
    } else {
        StoreError::Io {
            key: key.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("export-edge-{name}-{}", std::process::id()));
        std::fs::create_dir_all(root.join("about")).unwrap();
        std::fs::write(root.join("index.html"), "<html>home</html>").unwrap();
        std::fs::write(root.join("about").join("index.html"), "<html>about</html>").unwrap();
        std::fs::write(root.join("app.js"), "console.log(1)").unwrap();
        root
    }

    #[tokio::test]
    async fn test_lookup_existing_files() {
        let root = temp_root("existing");
        let store = DirectoryStore::new(&root);

        let asset = store.lookup("/index.html").await.unwrap();
        assert_eq!(asset.body.as_ref(), b"<html>home</html>");
        assert_eq!(asset.content_type, "text/html; charset=utf-8");

        let asset = store.lookup("/about/index.html").await.unwrap();
        assert_eq!(asset.body.as_ref(), b"<html>about</html>");

        let asset = store.lookup("/app.js").await.unwrap();
        assert_eq!(asset.content_type, "application/javascript");

        std::fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn test_lookup_missing_and_directories() {
        let root = temp_root("missing");
        let store = DirectoryStore::new(&root);

        assert!(store.lookup("/nope.html").await.unwrap_err().is_not_found());
        assert!(store.lookup("/about").await.unwrap_err().is_not_found());

        std::fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn test_lookup_decodes_percent_escapes() {
        let root = temp_root("escapes");
        std::fs::write(root.join("about us.html"), "<html>team</html>").unwrap();
        let store = DirectoryStore::new(&root);

        let asset = store.lookup("/about%20us.html").await.unwrap();
        assert_eq!(asset.body.as_ref(), b"<html>team</html>");
        assert_eq!(asset.content_type, "text/html; charset=utf-8");

        let asset = store.lookup("/about us.html").await.unwrap();
        assert_eq!(asset.body.as_ref(), b"<html>team</html>");

        std::fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn test_lookup_rejects_encoded_traversal() {
        let root = temp_root("encoded");
        let store = DirectoryStore::new(root.join("about"));

        for key in ["/%2e%2e/index.html", "/..%2Findex.html", "/index%00.html", "/%FF.html"] {
            let err = store.lookup(key).await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidKey(_)), "{key}");
        }

        std::fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn test_lookup_rejects_traversal() {
        let root = temp_root("traversal");
        let store = DirectoryStore::new(root.join("about"));

        let err = store.lookup("/../index.html").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));

        std::fs::remove_dir_all(root).ok();
    }
}

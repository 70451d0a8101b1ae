//! Path canonicalization
//!
//! Maps directory-style and extensionless URL paths onto asset keys.

use std::borrow::Cow;

/// Asset key for a URL path
///
/// `/about/` becomes `/about/index.html`, `/about` becomes `/about.html`, and
/// a final segment containing a `.` is kept as is.
pub fn asset_key(path: &str) -> Cow<'_, str> {
    if path.ends_with('/') {
        return Cow::Owned(format!("{path}index.html"));
    }

    let last_segment = path.rsplit('/').next().unwrap_or(path);
    if !last_segment.is_empty() && !last_segment.contains('.') {
        return Cow::Owned(format!("{path}.html"));
    }

    Cow::Borrowed(path)
}

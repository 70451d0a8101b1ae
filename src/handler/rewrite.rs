//! HTML rewriting
//!
//! Makes sure served HTML carries a robots `noindex, nofollow` directive
//! without ever adding a second one. The document is scanned as text; no
//! markup parser is involved.

use crate::http::{mime, ResponseDraft};
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

const NOINDEX_META: &str = r#"<meta name="robots" content="noindex, nofollow">"#;

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

fn robots_meta_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)< *meta\s+name\s*=\s*['"]robots['"][^>]*>"#)
            .expect("robots meta pattern is valid")
    })
}

fn head_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)<head(\s[^>]*)?>").expect("head pattern is valid"))
}

fn html_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)<html(\s[^>]*)?>").expect("html pattern is valid"))
}

/// Whether the document already has a robots meta tag, in any case
pub fn has_robots_meta(html: &str) -> bool {
    robots_meta_pattern().is_match(html)
}

/// Insert the noindex directive unless a robots meta tag is present
///
/// The tag goes right after the first `<head ...>`; without a head, a head
/// section goes right after `<html ...>`; without either, a head section is
/// prepended to the document.
pub fn inject_noindex(html: &str) -> Cow<'_, str> {
    if has_robots_meta(html) {
        return Cow::Borrowed(html);
    }

    if let Some(head) = head_pattern().find(html) {
        return Cow::Owned(insert_at(html, head.end(), &format!("\n    {NOINDEX_META}")));
    }

    if let Some(root) = html_pattern().find(html) {
        let head = format!("\n  <head>\n    {NOINDEX_META}\n  </head>");
        return Cow::Owned(insert_at(html, root.end(), &head));
    }

    Cow::Owned(format!("<head>\n  {NOINDEX_META}\n</head>\n{html}"))
}

fn insert_at(text: &str, at: usize, insertion: &str) -> String {
    let mut out = String::with_capacity(text.len() + insertion.len());
    out.push_str(&text[..at]);
    out.push_str(insertion);
    out.push_str(&text[at..]);
    out
}

/// Apply the noindex rewrite to an HTML draft
///
/// Returns false and leaves the draft alone when it is not HTML. For HTML the
/// content type is always normalized; the body is only replaced when the tag
/// had to be inserted.
pub fn rewrite_html(draft: &mut ResponseDraft) -> bool {
    if !mime::is_html(draft.content_type()) {
        return false;
    }

    let rewritten = match inject_noindex(&String::from_utf8_lossy(&draft.body)) {
        Cow::Owned(text) => Some(text),
        Cow::Borrowed(_) => None,
    };
    if let Some(text) = rewritten {
        draft.body = Bytes::from(text);
    }
    draft.set_header(CONTENT_TYPE, HTML_CONTENT_TYPE);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[test]
    fn test_inject_after_head() {
        let html = "<html><head><title>x</title></head><body></body></html>";
        let out = inject_noindex(html);
        assert_eq!(
            out,
            "<html><head>\n    <meta name=\"robots\" content=\"noindex, nofollow\"><title>x</title></head><body></body></html>"
        );
        assert_eq!(robots_meta_pattern().find_iter(&out).count(), 1);
    }

    #[test]
    fn test_inject_after_head_with_attributes() {
        let html = "<HTML lang=\"en\"><HEAD data-x=\"1\">\n<title>x</title></HEAD></HTML>";
        let out = inject_noindex(html);
        assert!(out.starts_with(
            "<HTML lang=\"en\"><HEAD data-x=\"1\">\n    <meta name=\"robots\" content=\"noindex, nofollow\">\n<title>"
        ));
    }

    #[test]
    fn test_header_element_is_not_head() {
        let html = "<html><body><header>nav</header></body></html>";
        let out = inject_noindex(html);
        assert!(out.starts_with(
            "<html>\n  <head>\n    <meta name=\"robots\" content=\"noindex, nofollow\">\n  </head><body><header>"
        ));
    }

    #[test]
    fn test_prepend_without_head_or_html() {
        let out = inject_noindex("<p>fragment</p>");
        assert_eq!(
            out,
            "<head>\n  <meta name=\"robots\" content=\"noindex, nofollow\">\n</head>\n<p>fragment</p>"
        );
    }

    #[test]
    fn test_existing_tag_untouched() {
        for html in [
            "<head><meta name=\"robots\" content=\"all\"></head>",
            "<head><META NAME='ROBOTS' content=\"index\"></head>",
            "<head>< meta  name = \"Robots\"></head>",
        ] {
            assert!(matches!(inject_noindex(html), Cow::Borrowed(_)), "{html}");
        }
    }

    #[test]
    fn test_idempotent() {
        for html in ["<html><head></head></html>", "<html></html>", "plain text"] {
            let once = inject_noindex(html).into_owned();
            assert_eq!(inject_noindex(&once), once);
        }
    }

    #[test]
    fn test_rewrite_draft() {
        let mut draft = ResponseDraft::new(StatusCode::OK, "<html><head></head></html>")
            .with_header(CONTENT_TYPE, "text/html");
        assert!(rewrite_html(&mut draft));
        assert_eq!(draft.content_type(), HTML_CONTENT_TYPE);
        assert!(has_robots_meta(std::str::from_utf8(&draft.body).unwrap()));
    }

    #[test]
    fn test_rewrite_keeps_existing_bytes() {
        let body = Bytes::from_static(b"<head><meta name=\"robots\" content=\"x\"></head>");
        let mut draft = ResponseDraft::new(StatusCode::OK, body.clone())
            .with_header(CONTENT_TYPE, "text/html");
        assert!(rewrite_html(&mut draft));
        assert_eq!(draft.body, body);
        assert_eq!(draft.content_type(), HTML_CONTENT_TYPE);
    }

    #[test]
    fn test_rewrite_skips_non_html() {
        let mut draft = ResponseDraft::new(StatusCode::OK, "body {}")
            .with_header(CONTENT_TYPE, "text/css");
        assert!(!rewrite_html(&mut draft));
        assert_eq!(draft.body.as_ref(), b"body {}");
        assert_eq!(draft.content_type(), "text/css");
    }
}

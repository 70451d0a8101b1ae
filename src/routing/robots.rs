//! robots.txt policy

use std::sync::OnceLock;

/// Path intercepted by the robots policy
pub const ROBOTS_PATH: &str = "/robots.txt";

pub const ROBOTS_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

const PERMISSIVE: &str = "User-agent: *\nAllow: /\n";

/// Crawlers, AI agents and HTTP tools denied explicitly in restrictive mode
const BLOCKED_AGENTS: &[&str] = &[
    "Googlebot",
    "Bingbot",
    "Slurp",
    "DuckDuckBot",
    "Baiduspider",
    "Yandex",
    "Sogou",
    "Exabot",
    "facebot",
    "facebookexternalhit",
    "ia_archiver",
    "GPTBot",
    "ChatGPT-User",
    "CCBot",
    "ClaudeBot",
    "anthropic-ai",
    "Bytespider",
    "Amazonbot",
    "Applebot",
    "SemrushBot",
    "AhrefsBot",
    "MJ12bot",
    "DotBot",
    "PetalBot",
    "SEOkicks-Robot",
    "magpie-crawler",
    "SentiBot",
    "Scrapy",
    "python-requests",
    "wget",
    "curl",
];

/// robots.txt body for the given indexing mode
pub fn robots_txt(allow_indexing: bool) -> &'static str {
    if allow_indexing {
        return PERMISSIVE;
    }

    static RESTRICTIVE: OnceLock<String> = OnceLock::new();
    RESTRICTIVE.get_or_init(|| {
        std::iter::once("*")
            .chain(BLOCKED_AGENTS.iter().copied())
            .map(|agent| format!("User-agent: {agent}\nDisallow: /\n"))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissive() {
        assert_eq!(robots_txt(true), "User-agent: *\nAllow: /\n");
    }

    #[test]
    fn test_restrictive() {
        let body = robots_txt(false);
        assert!(body.starts_with("User-agent: *\nDisallow: /\n\nUser-agent: Googlebot\nDisallow: /\n"));
        assert!(body.ends_with("User-agent: curl\nDisallow: /\n"));
        assert!(!body.contains("Allow: /\n\n"));
        assert_eq!(body.matches("Disallow: /").count(), BLOCKED_AGENTS.len() + 1);
    }
}

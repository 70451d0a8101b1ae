// Configuration module entry point
// Loads layered configuration and exposes the shared application state

mod state;
mod types;

use config::builder::DefaultState;
use config::ConfigBuilder;
use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HostRedirectConfig, LoggingConfig, MissPolicy, PerformanceConfig, RedirectEntry,
    RedirectMatch, ServerConfig, SiteConfig, SiteOptions,
};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        with_defaults(builder)?.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Independent site options with the legacy switch applied
    pub fn site_options(&self) -> SiteOptions {
        self.site.resolve()
    }
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("server.server_name", "export-edge/0.1")?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("site.asset_dir", "public")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Config {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml));
        with_defaults(builder)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = parse("");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.site.asset_dir, "public");
        assert_eq!(cfg.get_socket_addr().unwrap().to_string(), "127.0.0.1:8080");

        let site = cfg.site_options();
        assert!(site.allow_indexing);
        assert!(!site.inject_noindex);
        assert!(!site.host_redirect.enabled);
        assert!(site.spa_fallback);
        assert_eq!(site.fallback_document, "/index.html");
        assert_eq!(site.miss_policy, MissPolicy::NotFound);
        assert!(site.redirects.is_empty());
    }

    #[test]
    fn test_independent_options() {
        let cfg = parse(
            r#"
            [site]
            allow_indexing = false
            inject_noindex = false
            miss_policy = "redirect_root"

            [site.host_redirect]
            enabled = true
            from = "us.example.com"
            to = "example.com"
            "#,
        );
        let site = cfg.site_options();
        assert!(!site.allow_indexing);
        assert!(!site.inject_noindex);
        assert!(site.host_redirect.enabled);
        assert_eq!(site.host_redirect.scheme, "https");
        assert_eq!(site.miss_policy, MissPolicy::RedirectRoot);
    }

    #[test]
    fn test_backup_mode_overrides() {
        let restrictive = parse(
            r#"
            [site]
            backup_mode = false
            allow_indexing = true
            "#,
        )
        .site_options();
        assert!(!restrictive.allow_indexing);
        assert!(restrictive.inject_noindex);
        assert!(restrictive.host_redirect.enabled);

        let permissive = parse(
            r#"
            [site]
            backup_mode = true
            inject_noindex = true
            [site.host_redirect]
            enabled = true
            "#,
        )
        .site_options();
        assert!(permissive.allow_indexing);
        assert!(!permissive.inject_noindex);
        assert!(!permissive.host_redirect.enabled);
    }

    #[test]
    fn test_backup_mode_without_hostnames() {
        let site = parse(
            r#"
            [site]
            backup_mode = false
            "#,
        )
        .site_options();
        assert!(site.host_redirect.enabled);
        assert!(!site.host_redirect.is_active());

        let table = crate::routing::RedirectTable::from_options(&site);
        assert!(table.rules().iter().all(|r| r.name != "host"));
    }

    #[test]
    fn test_redirect_entries() {
        let cfg = parse(
            r#"
            [[site.redirects]]
            match = "section"
            path = "/news"
            target = "/"

            [[site.redirects]]
            match = "subpaths"
            path = "/docs"
            target = "/docs"
            code = 301
            "#,
        );
        let redirects = cfg.site_options().redirects;
        assert_eq!(redirects.len(), 2);
        assert_eq!(redirects[0].kind, RedirectMatch::Section);
        assert_eq!(redirects[0].code, 302);
        assert_eq!(redirects[1].kind, RedirectMatch::Subpaths);
        assert_eq!(redirects[1].code, 301);
    }
}

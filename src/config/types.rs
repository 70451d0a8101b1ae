// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub site: SiteConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub server_name: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Log the routing decision taken for every request
    #[serde(default)]
    pub log_decisions: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Site configuration as written in `config.toml`
///
/// `backup_mode` is the legacy single switch. When it is present it wins over
/// `allow_indexing`, `inject_noindex` and `host_redirect.enabled`; see
/// [`SiteConfig::resolve`].
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Directory holding the static export
    pub asset_dir: String,
    #[serde(default)]
    pub backup_mode: Option<bool>,
    #[serde(default = "default_true")]
    pub allow_indexing: bool,
    #[serde(default)]
    pub inject_noindex: bool,
    #[serde(default)]
    pub host_redirect: HostRedirectConfig,
    #[serde(default = "default_true")]
    pub spa_fallback: bool,
    #[serde(default = "default_fallback_document")]
    pub fallback_document: String,
    #[serde(default)]
    pub miss_policy: MissPolicy,
    /// Scheme used for absolute redirect targets when the request doesn't carry one
    #[serde(default = "default_scheme")]
    pub default_scheme: String,
    /// Legacy-path redirects; the built-in table is used when empty
    #[serde(default)]
    pub redirects: Vec<RedirectEntry>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_fallback_document() -> String {
    "/index.html".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_scheme() -> String {
    "http".to_string()
}

/// Secondary-to-primary host redirect
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HostRedirectConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Secondary hostname, e.g. "us.example.com"
    #[serde(default)]
    pub from: String,
    /// Primary hostname, e.g. "example.com"
    #[serde(default)]
    pub to: String,
    #[serde(default = "default_https")]
    pub scheme: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_https() -> String {
    "https".to_string()
}

impl HostRedirectConfig {
    /// Enabled with both hostnames set
    pub fn is_active(&self) -> bool {
        self.enabled && !self.from.is_empty() && !self.to.is_empty()
    }
}

impl Default for HostRedirectConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            from: String::new(),
            to: String::new(),
            scheme: default_https(),
        }
    }
}

/// What to do once every lookup for a request has missed
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissPolicy {
    /// Respond 404
    #[default]
    NotFound,
    /// Respond 302 to the site root
    RedirectRoot,
}

/// One configured legacy-path redirect
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RedirectEntry {
    #[serde(rename = "match")]
    pub kind: RedirectMatch,
    pub path: String,
    pub target: String,
    #[serde(default = "default_redirect_code")]
    pub code: u16,
}

#[allow(clippy::missing_const_for_fn)]
fn default_redirect_code() -> u16 {
    302
}

/// How a configured redirect path is matched
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RedirectMatch {
    /// The path itself, the path with a trailing slash, and anything below it
    Section,
    /// Only non-empty subpaths below the path
    Subpaths,
    /// The path only
    Exact,
}

/// Resolved per-behavior options consumed by the request pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOptions {
    pub allow_indexing: bool,
    pub inject_noindex: bool,
    pub host_redirect: HostRedirectConfig,
    pub spa_fallback: bool,
    pub fallback_document: String,
    pub miss_policy: MissPolicy,
    pub default_scheme: String,
    pub redirects: Vec<RedirectEntry>,
}

impl SiteConfig {
    /// Collapse the legacy switch into independent options
    ///
    /// `backup_mode = true` allows indexing and disables the host redirect and
    /// meta injection; `backup_mode = false` does the opposite.
    pub fn resolve(&self) -> SiteOptions {
        let mut host_redirect = self.host_redirect.clone();
        let (allow_indexing, inject_noindex) = match self.backup_mode {
            Some(backup) => {
                host_redirect.enabled = !backup;
                (backup, !backup)
            }
            None => (self.allow_indexing, self.inject_noindex),
        };

        SiteOptions {
            allow_indexing,
            inject_noindex,
            host_redirect,
            spa_fallback: self.spa_fallback,
            fallback_document: self.fallback_document.clone(),
            miss_policy: self.miss_policy,
            default_scheme: self.default_scheme.clone(),
            redirects: self.redirects.clone(),
        }
    }
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            allow_indexing: true,
            inject_noindex: false,
            host_redirect: HostRedirectConfig::default(),
            spa_fallback: true,
            fallback_document: default_fallback_document(),
            miss_policy: MissPolicy::NotFound,
            default_scheme: default_scheme(),
            redirects: Vec::new(),
        }
    }
}

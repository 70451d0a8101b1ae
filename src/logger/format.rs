//! Access log format module
//!
//! Named formats (`combined`, `common`, `json`) or a custom pattern with
//! `$variables`.

use chrono::Local;

const TIME_LOCAL: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Parsed access log format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Combined,
    Common,
    Json,
    Custom(String),
}

impl LogFormat {
    pub fn parse(format: &str) -> Self {
        match format {
            "combined" => Self::Combined,
            "common" => Self::Common,
            "json" => Self::Json,
            custom => Self::Custom(custom.to_string()),
        }
    }
}

/// One served request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: chrono::DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string without leading `?`
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Path with `?query` appended when present
    pub fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    /// `METHOD /uri HTTP/version`
    pub fn request_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.request_uri(), self.http_version)
    }

    #[allow(clippy::cast_precision_loss)]
    fn request_time_secs(&self) -> f64 {
        self.request_time_us as f64 / 1_000_000.0
    }

    pub fn format(&self, format: &str) -> String {
        self.render(&LogFormat::parse(format))
    }

    pub fn render(&self, format: &LogFormat) -> String {
        match format {
            LogFormat::Common => self.common(),
            LogFormat::Combined => format!(
                "{} \"{}\" \"{}\"",
                self.common(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            LogFormat::Json => self.json(),
            LogFormat::Custom(pattern) => self.substitute(pattern),
        }
    }

    fn common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(TIME_LOCAL),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    fn json(&self) -> String {
        let opt = |v: Option<&String>| v.map_or_else(|| "null".to_string(), |s| quote(s));
        format!(
            "{{\"remote_addr\":{},\"time\":{},\"method\":{},\"path\":{},\"query\":{},\"http_version\":{},\"status\":{},\"body_bytes\":{},\"referer\":{},\"user_agent\":{},\"request_time_us\":{}}}",
            quote(&self.remote_addr),
            quote(&self.time.to_rfc3339()),
            quote(&self.method),
            quote(&self.path),
            opt(self.query.as_ref()),
            quote(&self.http_version),
            self.status,
            self.body_bytes,
            opt(self.referer.as_ref()),
            opt(self.user_agent.as_ref()),
            self.request_time_us,
        )
    }

    /// Replace `$variables` in a custom pattern
    ///
    /// Longer names come first so `$request_time` is not eaten by `$request`.
    fn substitute(&self, pattern: &str) -> String {
        let vars: [(&str, String); 11] = [
            ("$remote_addr", self.remote_addr.clone()),
            ("$time_local", self.time.format(TIME_LOCAL).to_string()),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$request_time", format!("{:.3}", self.request_time_secs())),
            ("$request_method", self.method.clone()),
            ("$request_uri", self.request_uri()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
            ("$body_bytes_sent", self.body_bytes.to_string()),
            ("$http_referer", self.referer.clone().unwrap_or_else(|| "-".to_string())),
            ("$http_user_agent", self.user_agent.clone().unwrap_or_else(|| "-".to_string())),
        ];

        vars.iter()
            .fold(pattern.to_string(), |acc, (name, value)| acc.replace(name, value))
    }
}

/// JSON string literal
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Port the HTTP server listens on
/// Read from PORT environment variable
/// Default: 5000
pub static PORT: Lazy<u16> = Lazy::new(|| {
    env::var("PORT")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(5000)
});

/// Base URL of the snapsave resolver
/// Read from SNAPSAVE_BASE_URL environment variable
/// Default: https://snapsave.app
pub static SNAPSAVE_BASE_URL: Lazy<String> = Lazy::new(|| {
    env::var("SNAPSAVE_BASE_URL")
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| "https://snapsave.app".to_string())
});

/// Base URL used for Instagram JSON and page requests
/// Read from INSTAGRAM_BASE_URL environment variable
/// Default: https://www.instagram.com
pub static INSTAGRAM_BASE_URL: Lazy<String> = Lazy::new(|| {
    env::var("INSTAGRAM_BASE_URL")
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| "https://www.instagram.com".to_string())
});

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: reelgrab.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "reelgrab.log".to_string()));

/// Log verbosity for terminal and file output
/// Read from LOG_LEVEL environment variable (error, warn, info, debug, trace, off)
/// Default: info
pub static LOG_LEVEL: Lazy<log::LevelFilter> =
    Lazy::new(|| parse_log_level(env::var("LOG_LEVEL").ok().as_deref()));

/// Parse a LOG_LEVEL value; unknown or missing values fall back to `Info`.
pub fn parse_log_level(value: Option<&str>) -> log::LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(log::LevelFilter::Info)
}

/// Outbound proxy configuration
pub mod proxy {
    use super::*;

    /// Optional proxy for all outbound requests (snapsave and Instagram)
    /// Read from HTTP_PROXY_URL environment variable
    /// Values `none` and `disabled` are treated as unset
    pub static HTTP_PROXY_URL: Lazy<Option<String>> = Lazy::new(|| env::var("HTTP_PROXY_URL").ok());

    /// Returns the proxy URL if one is configured and not explicitly disabled.
    pub fn active() -> Option<&'static str> {
        HTTP_PROXY_URL.as_deref().map(str::trim).filter(|p| is_enabled(p))
    }

    /// Whether a raw proxy value means "use this proxy".
    pub fn is_enabled(value: &str) -> bool {
        let value = value.trim();
        !value.is_empty() && value != "none" && value != "disabled"
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Total request timeout for outbound HTTP requests (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Connect timeout for outbound HTTP requests (in seconds)
    pub const CONNECT_TIMEOUT_SECS: u64 = 15;

    /// Desktop browser user agent; both upstreams serve degraded pages to bots
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }

    /// Connect timeout duration
    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_TIMEOUT_SECS)
    }
}

/// Instagram web constants
pub mod instagram {
    /// Instagram internal app ID (public, embedded in the web app)
    pub const IG_APP_ID: &str = "936619743392459";
}

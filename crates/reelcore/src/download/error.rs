use std::fmt;

/// Structured error type for snapsave resolution.
///
/// Categorised so failures can be told apart in logs even though the HTTP
/// layer maps all of them to the same 500 response.
#[derive(Debug)]
pub enum DownloadError {
    /// snapsave answered with a non-success status or an unexpected body
    Upstream(String),
    /// The obfuscated payload could not be unpacked
    Decode(String),
    /// Upstream did not answer in time
    Timeout(String),
    /// Proxy configuration or connection error
    Proxy(String),
    /// Catch-all for uncategorized errors
    Other(String),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for DownloadError {}

impl DownloadError {
    /// Returns subcategory for logging
    pub fn subcategory(&self) -> &'static str {
        match self {
            DownloadError::Upstream(_) => "upstream",
            DownloadError::Decode(_) => "decode",
            DownloadError::Timeout(_) => "timeout",
            DownloadError::Proxy(_) => "proxy",
            DownloadError::Other(_) => "other",
        }
    }

    /// Returns the inner message
    pub fn message(&self) -> &str {
        match self {
            DownloadError::Upstream(msg)
            | DownloadError::Decode(msg)
            | DownloadError::Timeout(msg)
            | DownloadError::Proxy(msg)
            | DownloadError::Other(msg) => msg,
        }
    }
}

impl From<reqwest::Error> for DownloadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DownloadError::Timeout(err.to_string())
        } else if err.is_connect() {
            DownloadError::Upstream(format!("connection failed: {}", err))
        } else {
            DownloadError::Other(err.to_string())
        }
    }
}

/// Plain strings become `DownloadError::Other`
impl From<String> for DownloadError {
    fn from(s: String) -> Self {
        DownloadError::Other(s)
    }
}

impl From<&str> for DownloadError {
    fn from(s: &str) -> Self {
        DownloadError::Other(s.to_string())
    }
}

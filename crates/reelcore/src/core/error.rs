use thiserror::Error;

use crate::core::validation::ValidationError;
use crate::download::error::DownloadError;

/// Centralized error types for the application
///
/// Resolver, scraper and server code all return this enum. The HTTP layer
/// does not distinguish between variants; it only uses [`AppError::category`]
/// for log lines.
///
/// # Example
///
/// ```no_run
/// use reelcore::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error [{}]: {}", err.category(), err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// snapsave resolution errors
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// No usable metadata from any scraping tier
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// HTTP/Fetch errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP status code errors
    #[error("HTTP request failed with status: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Short label for log lines.
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Download(e) => e.subcategory(),
            AppError::Metadata(_) => "metadata",
            AppError::Http(e) if e.is_timeout() => "timeout",
            AppError::Http(_) => "http",
            AppError::HttpStatus(_) => "http_status",
            AppError::Json(_) => "json",
            AppError::Io(_) => "io",
            AppError::Url(_) => "url",
            AppError::Validation(_) => "validation",
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_category() {
        let err = AppError::from(DownloadError::Decode("bad payload".into()));
        assert_eq!(err.category(), "decode");
        assert_eq!(err.to_string(), "Download error: bad payload");
    }

    #[test]
    fn test_validation_error_conversion() {
        let err = AppError::from(ValidationError::UnsupportedHost("example.com".into()));
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.category(), "validation");
    }

    #[test]
    fn test_metadata_error_display() {
        let err = AppError::Metadata("no usable tier".into());
        assert_eq!(err.to_string(), "Metadata error: no usable tier");
    }
}

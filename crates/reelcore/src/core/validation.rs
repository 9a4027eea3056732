//! URL validation utilities
//!
//! Whitelist checks for the URLs the service accepts:
//! - Instagram content URLs (posts, reels, tv) and shortcode extraction
//! - Hosts the snapsave resolver understands (Instagram, Facebook, TikTok)

use thiserror::Error;
use url::Url;

/// Path segments that introduce a shortcode.
const CONTENT_TYPES: &[&str] = &["p", "reel", "reels", "tv"];

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Not a parseable http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Host is not on the whitelist
    #[error("Unsupported host: {0}")]
    UnsupportedHost(String),

    /// Instagram URL that does not point at a post/reel
    #[error("No shortcode in Instagram URL: {0}")]
    MissingShortcode(String),
}

/// Parses an http(s) URL.
pub fn parse_http_url(url: &str) -> Result<Url, ValidationError> {
    let parsed = Url::parse(url.trim()).map_err(|_| ValidationError::InvalidUrl(url.to_string()))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ValidationError::InvalidUrl(format!(
            "{} (invalid scheme: {})",
            url,
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none() {
        return Err(ValidationError::InvalidUrl(format!("{} (no host)", url)));
    }

    Ok(parsed)
}

/// Whether the host is instagram.com or www.instagram.com.
pub fn is_instagram_host(url: &Url) -> bool {
    matches!(
        url.host_str().map(|h| h.to_lowercase()).as_deref(),
        Some("instagram.com") | Some("www.instagram.com")
    )
}

/// Extract the shortcode from an Instagram content URL.
///
/// Supports:
/// - `/p/<code>/`, `/reel/<code>/`, `/reels/<code>/`, `/tv/<code>/`
/// - `/<username>/p/<code>/`, `/<username>/reel/<code>/` (with username prefix)
pub fn extract_shortcode(url: &Url) -> Option<String> {
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    if segments.len() >= 2 && CONTENT_TYPES.contains(&segments[0]) {
        return Some(segments[1].to_string());
    }
    if segments.len() >= 3 && CONTENT_TYPES.contains(&segments[1]) {
        return Some(segments[2].to_string());
    }
    None
}

/// Validates an Instagram post/reel URL and returns its shortcode.
///
/// # Examples
/// ```
/// use reelcore::core::validation::instagram_shortcode;
///
/// assert_eq!(
///     instagram_shortcode("https://www.instagram.com/reel/C9xYz12AbCd/?igsh=abc").unwrap(),
///     "C9xYz12AbCd"
/// );
/// assert!(instagram_shortcode("https://www.instagram.com/explore/").is_err());
/// assert!(instagram_shortcode("https://example.com/reel/abc/").is_err());
/// ```
pub fn instagram_shortcode(url: &str) -> Result<String, ValidationError> {
    let parsed = parse_http_url(url)?;
    if !is_instagram_host(&parsed) {
        return Err(ValidationError::UnsupportedHost(
            parsed.host_str().unwrap_or_default().to_string(),
        ));
    }
    extract_shortcode(&parsed).ok_or_else(|| ValidationError::MissingShortcode(url.to_string()))
}

/// Whether snapsave can resolve media for this URL.
///
/// Instagram content and stories, Facebook (including fb.watch) and TikTok.
pub fn is_snapsave_supported(url: &Url) -> bool {
    let Some(host) = url.host_str().map(|h| h.to_lowercase()) else {
        return false;
    };

    if is_instagram_host(url) {
        let first = url
            .path_segments()
            .and_then(|mut s| s.find(|seg| !seg.is_empty()))
            .unwrap_or("");
        return extract_shortcode(url).is_some() || first == "stories";
    }

    let is_facebook = host == "facebook.com"
        || host.ends_with(".facebook.com")
        || host == "fb.watch"
        || host == "fb.com";
    let is_tiktok = host == "tiktok.com" || host.ends_with(".tiktok.com");

    is_facebook || is_tiktok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_extract_shortcode_reel() {
        assert_eq!(
            extract_shortcode(&url("https://www.instagram.com/reel/ABC123xyz/")),
            Some("ABC123xyz".to_string())
        );
    }

    #[test]
    fn test_extract_shortcode_post_reels_tv() {
        assert_eq!(
            extract_shortcode(&url("https://www.instagram.com/p/DEF456/")),
            Some("DEF456".to_string())
        );
        assert_eq!(
            extract_shortcode(&url("https://www.instagram.com/reels/GHI789/")),
            Some("GHI789".to_string())
        );
        assert_eq!(
            extract_shortcode(&url("https://www.instagram.com/tv/JKL012/")),
            Some("JKL012".to_string())
        );
    }

    #[test]
    fn test_extract_shortcode_no_match() {
        assert_eq!(extract_shortcode(&url("https://www.instagram.com/username/")), None);
    }

    #[test]
    fn test_extract_shortcode_with_username_prefix() {
        assert_eq!(
            extract_shortcode(&url("https://www.instagram.com/someuser/reel/B58TfHTnY2u/")),
            Some("B58TfHTnY2u".to_string())
        );
    }

    #[test]
    fn test_instagram_shortcode_rejects_bad_input() {
        assert!(matches!(
            instagram_shortcode("not a url"),
            Err(ValidationError::InvalidUrl(_))
        ));
        assert!(matches!(
            instagram_shortcode("ftp://instagram.com/reel/abc/"),
            Err(ValidationError::InvalidUrl(_))
        ));
        assert!(matches!(
            instagram_shortcode("https://www.youtube.com/reel/abc/"),
            Err(ValidationError::UnsupportedHost(_))
        ));
        assert!(matches!(
            instagram_shortcode("https://instagram.com/cristiano"),
            Err(ValidationError::MissingShortcode(_))
        ));
    }

    #[test]
    fn test_snapsave_supported_hosts() {
        assert!(is_snapsave_supported(&url("https://www.instagram.com/reel/ABC123/")));
        assert!(is_snapsave_supported(&url("https://instagram.com/p/ABC123/")));
        assert!(is_snapsave_supported(&url(
            "https://www.instagram.com/stories/someone/3141592653/"
        )));
        assert!(is_snapsave_supported(&url("https://www.facebook.com/watch/?v=123")));
        assert!(is_snapsave_supported(&url("https://m.facebook.com/story.php?id=1")));
        assert!(is_snapsave_supported(&url("https://fb.watch/abcDEF/")));
        assert!(is_snapsave_supported(&url("https://www.tiktok.com/@user/video/123")));
    }

    #[test]
    fn test_snapsave_rejects_others() {
        assert!(!is_snapsave_supported(&url("https://www.instagram.com/cristiano/")));
        assert!(!is_snapsave_supported(&url("https://www.youtube.com/watch?v=abc")));
        assert!(!is_snapsave_supported(&url("https://notfacebook.com/video")));
    }
}

//! Media link resolution.
//!
//! Provides the `MediaResolver` trait the web server talks to and the
//! built-in `SnapsaveClient` backend that asks snapsave.app for download
//! links.

pub mod error;
pub mod info;
pub mod snapsave;

use crate::core::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use info::merge_info;
pub use snapsave::SnapsaveClient;

/// Message returned when the URL is not something snapsave handles.
pub const MSG_INVALID_URL: &str = "Link URL not valid";

/// Message returned when snapsave answered but listed no media.
pub const MSG_BLANK_DATA: &str = "Blank data";

/// One downloadable rendition of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaLink {
    /// Direct media URL, or the snapsave render endpoint when `should_render` is set
    pub url: String,
    /// Quality label as shown by snapsave (e.g. "720p (HD)")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Preview image for the rendition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// The URL starts a server-side render job instead of serving a file
    #[serde(default)]
    pub should_render: bool,
}

/// Result of a resolution attempt, shaped like the snapsave response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapsaveResult {
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<MediaLink>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl SnapsaveResult {
    /// Successful resolution with at least one link.
    pub fn found(data: Vec<MediaLink>) -> Self {
        Self {
            status: true,
            data: Some(data),
            msg: None,
        }
    }

    /// Resolution that completed without links.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self {
            status: false,
            data: None,
            msg: Some(msg.into()),
        }
    }

    /// Links in upstream order; empty when resolution failed.
    pub fn links(&self) -> &[MediaLink] {
        self.data.as_deref().unwrap_or_default()
    }
}

/// Trait for media link resolvers.
///
/// Errors are reserved for transport and decoding failures; an unsupported
/// URL or an empty listing is reported through `SnapsaveResult::failed`.
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Human-readable name of this resolver (e.g., "snapsave")
    fn name(&self) -> &str;

    /// Resolve downloadable media links for a post URL.
    async fn resolve(&self, url: &str) -> Result<SnapsaveResult, AppError>;
}

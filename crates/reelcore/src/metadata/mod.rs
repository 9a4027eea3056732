//! Instagram reel metadata scraping.
//!
//! Best-effort fallback chain, first usable tier wins:
//! 1. JSON endpoint (`/p/<shortcode>/?__a=1&__d=dis`)
//! 2. JSON-LD embedded in the reel page
//! 3. Open Graph meta tags of the same page
//!
//! No retries and no normalisation beyond what each tier parser does; the
//! result reflects whatever Instagram served at request time.

pub mod json_api;
pub mod json_ld;
pub mod open_graph;

use async_trait::async_trait;
use select::document::Document;
use serde::{Deserialize, Serialize};

use crate::core::config;
use crate::core::error::AppError;
use crate::core::http;
use crate::core::validation;

/// Which tier produced the metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataSource {
    JsonApi,
    JsonLd,
    OpenGraph,
}

/// Caption and engagement data for one reel or post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelMetadata {
    pub shortcode: String,
    /// Canonical public URL of the reel
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    /// Username, without the leading `@`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub source: MetadataSource,
}

impl ReelMetadata {
    /// Empty record for a shortcode; tier parsers fill in what they find.
    pub fn new(shortcode: &str, source: MetadataSource) -> Self {
        Self {
            shortcode: shortcode.to_string(),
            url: format!("https://www.instagram.com/reel/{}/", shortcode),
            caption: None,
            like_count: None,
            comment_count: None,
            view_count: None,
            author: None,
            author_name: None,
            upload_date: None,
            thumbnail_url: None,
            video_url: None,
            source,
        }
    }

    /// Whether a tier found enough to stop the fallback chain.
    pub fn is_usable(&self) -> bool {
        self.caption.is_some() || self.video_url.is_some() || self.thumbnail_url.is_some() || self.like_count.is_some()
    }
}

/// Trait for reel metadata sources.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Human-readable name of this provider (e.g., "instagram")
    fn name(&self) -> &str;

    /// Scrape metadata for a reel/post URL.
    async fn fetch_metadata(&self, url: &str) -> Result<ReelMetadata, AppError>;
}

/// Scrapes Instagram directly, walking the three tiers.
pub struct InstagramScraper {
    client: reqwest::Client,
    base_url: String,
}

impl InstagramScraper {
    /// Scraper against the configured `INSTAGRAM_BASE_URL`.
    pub fn new() -> Result<Self, AppError> {
        Self::with_base_url(config::INSTAGRAM_BASE_URL.as_str())
    }

    /// Scraper against an explicit base URL (tests).
    pub fn with_base_url(base_url: &str) -> Result<Self, AppError> {
        Ok(Self {
            client: http::build_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Tier 1. Any failure here is logged and falls through to the page tiers.
    async fn fetch_json_api(&self, shortcode: &str) -> Option<ReelMetadata> {
        let endpoint = format!("{}/p/{}/", self.base_url, shortcode);

        let response = match self
            .client
            .get(&endpoint)
            .query(&[("__a", "1"), ("__d", "dis")])
            .header("X-IG-App-ID", config::instagram::IG_APP_ID)
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("InstagramScraper: JSON endpoint request failed for {}: {}", shortcode, e);
                return None;
            }
        };

        if !response.status().is_success() {
            log::debug!(
                "InstagramScraper: JSON endpoint returned HTTP {} for {}",
                response.status(),
                shortcode
            );
            return None;
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("InstagramScraper: failed to read JSON endpoint body for {}: {}", shortcode, e);
                return None;
            }
        };
        let body: serde_json::Value = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) => {
                log::debug!(
                    "InstagramScraper: JSON endpoint returned non-JSON for {} (login wall?)",
                    shortcode
                );
                return None;
            }
        };

        json_api::parse(&body, shortcode).filter(ReelMetadata::is_usable)
    }

    /// Fetch the reel page HTML for the JSON-LD and Open Graph tiers.
    async fn fetch_page(&self, shortcode: &str) -> Result<String, AppError> {
        let endpoint = format!("{}/reel/{}/", self.base_url, shortcode);
        let response = self.client.get(&endpoint).send().await?;

        if !response.status().is_success() {
            return Err(AppError::HttpStatus(response.status()));
        }

        Ok(response.text().await?)
    }

    /// Run the full fallback chain for a URL.
    pub async fn scrape(&self, url: &str) -> Result<ReelMetadata, AppError> {
        let shortcode = validation::instagram_shortcode(url)?;

        if let Some(metadata) = self.fetch_json_api(&shortcode).await {
            log::info!("InstagramScraper: {} resolved from JSON endpoint", shortcode);
            return Ok(metadata);
        }

        log::debug!("InstagramScraper: falling back to page scraping for {}", shortcode);
        let html = self.fetch_page(&shortcode).await?;

        match parse_page(&html, &shortcode) {
            Some(metadata) => {
                log::info!("InstagramScraper: {} resolved from {:?}", shortcode, metadata.source);
                Ok(metadata)
            }
            None => Err(AppError::Metadata(format!("no metadata found for {}", shortcode))),
        }
    }
}

#[async_trait]
impl MetadataProvider for InstagramScraper {
    fn name(&self) -> &str {
        "instagram"
    }

    async fn fetch_metadata(&self, url: &str) -> Result<ReelMetadata, AppError> {
        self.scrape(url).await
    }
}

/// Tiers 2 and 3 over an already fetched page.
pub fn parse_page(html: &str, shortcode: &str) -> Option<ReelMetadata> {
    let document = Document::from(html);

    json_ld::extract(&document, shortcode)
        .filter(ReelMetadata::is_usable)
        .or_else(|| open_graph::extract(&document, shortcode).filter(ReelMetadata::is_usable))
}

/// Non-empty, trimmed string.
pub(crate) fn clean(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

//! reelcore - media link resolution and Instagram reel metadata scraping
//!
//! This library provides everything the `reelgrab` binary serves over HTTP.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, HTTP client setup, web server
//! - `download`: snapsave resolver and the `/api/info` merge
//! - `metadata`: three-tier reel metadata scraper

pub mod core;
pub mod download;
pub mod metadata;

// Re-export commonly used types for convenience
pub use core::{config, AppError, AppResult};
pub use download::{MediaLink, MediaResolver, SnapsaveClient, SnapsaveResult};
pub use metadata::{InstagramScraper, MetadataProvider, ReelMetadata};

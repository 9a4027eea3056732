//! Tier 3: Open Graph meta tags.
//!
//! Instagram packs engagement into `og:description`:
//! `1,234 likes, 56 comments - someuser on March 3, 2024: "caption"`
//! and the display name into `og:title`:
//! `Some User on Instagram: "caption"`.

use once_cell::sync::Lazy;
use regex::Regex;
use select::document::Document;
use select::predicate::Name;

use super::{clean, MetadataSource, ReelMetadata};

static DESCRIPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)^\s*([\d.,]+\s*[KkMm]?)\s+likes?,\s*([\d.,]+\s*[KkMm]?)\s+comments?\s*-\s*(\S+)\s+on\s+([^:]+?):\s*(.*)$",
    )
    .expect("og:description regex")
});

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(.*?)\s+on Instagram:\s*(.*)$").expect("og:title regex"));

/// Build a record from the page's `og:*` tags. `None` when no tag is present.
pub fn extract(document: &Document, shortcode: &str) -> Option<ReelMetadata> {
    let description = meta_content(document, "og:description");
    let title = meta_content(document, "og:title");
    let image = meta_content(document, "og:image");
    let video = meta_content(document, "og:video:secure_url")
        .or_else(|| meta_content(document, "og:video"))
        .or_else(|| meta_content(document, "og:video:url"));

    if description.is_none() && title.is_none() && image.is_none() && video.is_none() {
        return None;
    }

    let mut metadata = ReelMetadata {
        thumbnail_url: image,
        video_url: video,
        ..ReelMetadata::new(shortcode, MetadataSource::OpenGraph)
    };

    if let Some(description) = description.as_deref() {
        match DESCRIPTION_RE.captures(description) {
            Some(caps) => {
                metadata.like_count = caps.get(1).and_then(|m| parse_count(m.as_str()));
                metadata.comment_count = caps.get(2).and_then(|m| parse_count(m.as_str()));
                metadata.author = caps.get(3).and_then(|m| clean(m.as_str()));
                metadata.upload_date = caps.get(4).and_then(|m| clean(m.as_str()));
                metadata.caption = caps.get(5).and_then(|m| strip_quotes(m.as_str()));
            }
            None => metadata.caption = strip_quotes(description),
        }
    }

    if let Some(caps) = title.as_deref().and_then(|t| TITLE_RE.captures(t)) {
        metadata.author_name = caps.get(1).and_then(|m| clean(m.as_str()));
        if metadata.caption.is_none() {
            metadata.caption = caps.get(2).and_then(|m| strip_quotes(m.as_str()));
        }
    }

    Some(metadata)
}

fn meta_content(document: &Document, property: &str) -> Option<String> {
    document
        .find(Name("meta"))
        .find(|n| n.attr("property") == Some(property) || n.attr("name") == Some(property))
        .and_then(|n| n.attr("content"))
        .and_then(clean)
}

/// Parse an engagement count as Instagram renders it.
///
/// `1,234` and `1.234` are thousands separators; with a `K`/`M` suffix the
/// dot is a decimal point (`1.5K` = 1500).
pub fn parse_count(raw: &str) -> Option<u64> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let (number, multiplier) = match compact.chars().last()? {
        'K' | 'k' => (&compact[..compact.len() - 1], 1_000f64),
        'M' | 'm' => (&compact[..compact.len() - 1], 1_000_000f64),
        _ => (compact.as_str(), 1f64),
    };

    if multiplier > 1.0 {
        let value: f64 = number.replace(',', ".").parse().ok()?;
        Some((value * multiplier).round() as u64)
    } else {
        number.replace([',', '.'], "").parse().ok()
    }
}

/// Unwrap a quoted caption. The period Instagram appends after the closing
/// quote (`"caption".`) goes too; anything else is kept verbatim.
fn strip_quotes(raw: &str) -> Option<String> {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_suffix('.') {
        if rest.ends_with(['"', '\u{201D}']) {
            text = rest;
        }
    }

    let unquoted = text
        .strip_prefix(['"', '\u{201C}'])
        .and_then(|inner| inner.strip_suffix(['"', '\u{201D}']))
        .unwrap_or(text);
    clean(unquoted)
}

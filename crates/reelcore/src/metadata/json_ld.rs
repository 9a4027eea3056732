//! Tier 2: schema.org JSON-LD embedded in the reel page.

use select::document::Document;
use select::predicate::{Attr, Name, Predicate};
use serde_json::Value;

use super::{clean, MetadataSource, ReelMetadata};

/// First usable record among all `application/ld+json` scripts.
pub fn extract(document: &Document, shortcode: &str) -> Option<ReelMetadata> {
    for script in document.find(Name("script").and(Attr("type", "application/ld+json"))) {
        let text = script.text();
        let value: Value = match serde_json::from_str(text.trim()) {
            Ok(value) => value,
            Err(e) => {
                log::debug!("JSON-LD block for {} is not valid JSON: {}", shortcode, e);
                continue;
            }
        };

        let found = candidates(&value)
            .into_iter()
            .map(|obj| from_object(obj, shortcode))
            .find(ReelMetadata::is_usable);
        if found.is_some() {
            return found;
        }
    }

    None
}

/// Top-level objects of a JSON-LD block: a single object, an array, or an `@graph`.
fn candidates(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().filter(|v| v.is_object()).collect(),
        Value::Object(_) => match value.get("@graph").and_then(Value::as_array) {
            Some(graph) => graph.iter().filter(|v| v.is_object()).collect(),
            None => vec![value],
        },
        _ => Vec::new(),
    }
}

fn from_object(obj: &Value, shortcode: &str) -> ReelMetadata {
    let video = first(obj.get("video"));
    let author = first(obj.get("author"));

    let mut metadata = ReelMetadata {
        caption: ["caption", "articleBody", "description", "name"]
            .iter()
            .find_map(|key| string(obj.get(*key))),
        author: author.and_then(|a| {
            string(a.get("alternateName"))
                .map(|name| name.trim_start_matches('@').to_string())
                .or_else(|| string(a.pointer("/identifier/value")))
        }),
        author_name: author.and_then(|a| string(a.get("name"))),
        comment_count: count(obj.get("commentCount")),
        upload_date: ["uploadDate", "dateCreated", "datePublished"]
            .iter()
            .find_map(|key| string(obj.get(*key)))
            .or_else(|| video.and_then(|v| string(v.get("uploadDate")))),
        thumbnail_url: string(first(obj.get("thumbnailUrl")))
            .or_else(|| video.and_then(|v| string(first(v.get("thumbnailUrl")))))
            .or_else(|| image_url(obj.get("image"))),
        video_url: string(obj.get("contentUrl"))
            .or_else(|| video.and_then(|v| string(v.get("contentUrl"))))
            .or_else(|| string(obj.get("embedUrl"))),
        ..ReelMetadata::new(shortcode, MetadataSource::JsonLd)
    };

    let stats = obj
        .get("interactionStatistic")
        .or_else(|| video.and_then(|v| v.get("interactionStatistic")));
    for stat in as_list(stats) {
        let kind = interaction_type(stat).unwrap_or_default();
        let Some(value) = count(stat.get("userInteractionCount")) else {
            continue;
        };
        if kind.ends_with("LikeAction") {
            metadata.like_count = Some(value);
        } else if kind.ends_with("CommentAction") {
            metadata.comment_count = metadata.comment_count.or(Some(value));
        } else if kind.ends_with("WatchAction") {
            metadata.view_count = Some(value);
        }
    }

    metadata
}

/// `interactionType` is either an IRI string or an object with `@type`.
fn interaction_type(stat: &Value) -> Option<String> {
    match stat.get("interactionType")? {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("@type").and_then(Value::as_str).map(String::from),
        _ => None,
    }
}

/// First element of an array, or the value itself.
fn first(value: Option<&Value>) -> Option<&Value> {
    match value? {
        Value::Array(items) => items.first(),
        other => Some(other),
    }
}

fn as_list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other @ Value::Object(_)) => vec![other],
        _ => Vec::new(),
    }
}

fn string(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).and_then(clean)
}

/// Counts appear both as numbers and as numeric strings.
fn count(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

/// `image` may be a URL, a list of URLs, or an `ImageObject`.
fn image_url(value: Option<&Value>) -> Option<String> {
    let image = first(value)?;
    string(Some(image)).or_else(|| string(image.get("url")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(ld: &str) -> Document {
        Document::from(format!(r#"<html><head><script type="application/ld+json">{}</script></head></html>"#, ld).as_str())
    }

    #[test]
    fn test_extract_video_object() {
        let document = doc(r#"{
            "@context": "https://schema.org",
            "@type": "VideoObject",
            "caption": "Trail run at dawn #running",
            "uploadDate": "2024-03-03T12:00:00+00:00",
            "contentUrl": "https://cdn.example/reel.mp4",
            "thumbnailUrl": ["https://cdn.example/thumb.jpg"],
            "author": { "@type": "Person", "alternateName": "@trailrunner", "name": "Trail Runner" },
            "commentCount": "41",
            "interactionStatistic": [
                { "@type": "InteractionCounter", "interactionType": "http://schema.org/LikeAction", "userInteractionCount": 1200 },
                { "@type": "InteractionCounter", "interactionType": { "@type": "WatchAction" }, "userInteractionCount": "54000" }
            ]
        }"#);

        let m = extract(&document, "C9xYz12AbCd").unwrap();

        assert_eq!(m.source, MetadataSource::JsonLd);
        assert_eq!(m.caption.as_deref(), Some("Trail run at dawn #running"));
        assert_eq!(m.author.as_deref(), Some("trailrunner"));
        assert_eq!(m.author_name.as_deref(), Some("Trail Runner"));
        assert_eq!(m.like_count, Some(1200));
        assert_eq!(m.comment_count, Some(41));
        assert_eq!(m.view_count, Some(54000));
        assert_eq!(m.video_url.as_deref(), Some("https://cdn.example/reel.mp4"));
        assert_eq!(m.thumbnail_url.as_deref(), Some("https://cdn.example/thumb.jpg"));
        assert_eq!(m.upload_date.as_deref(), Some("2024-03-03T12:00:00+00:00"));
    }

    #[test]
    fn test_extract_social_media_posting_with_nested_video() {
        let document = doc(r#"[{
            "@type": "SocialMediaPosting",
            "articleBody": "Carousel caption",
            "author": [{ "identifier": { "value": "poster" }, "name": "Poster" }],
            "video": [{ "contentUrl": "https://cdn.example/nested.mp4", "thumbnailUrl": "https://cdn.example/nested.jpg", "uploadDate": "2024-01-01" }],
            "interactionStatistic": { "interactionType": "https://schema.org/CommentAction", "userInteractionCount": 9 }
        }]"#);

        let m = extract(&document, "abc").unwrap();

        assert_eq!(m.caption.as_deref(), Some("Carousel caption"));
        assert_eq!(m.author.as_deref(), Some("poster"));
        assert_eq!(m.video_url.as_deref(), Some("https://cdn.example/nested.mp4"));
        assert_eq!(m.thumbnail_url.as_deref(), Some("https://cdn.example/nested.jpg"));
        assert_eq!(m.upload_date.as_deref(), Some("2024-01-01"));
        assert_eq!(m.comment_count, Some(9));
        assert_eq!(m.like_count, None);
    }

    #[test]
    fn test_extract_skips_invalid_and_empty_blocks() {
        let html = r#"<html><head>
            <script type="application/ld+json">{ not json</script>
            <script type="application/ld+json">{"@type":"BreadcrumbList"}</script>
            <script type="application/ld+json">{"@graph":[{"@type":"ImageObject","image":{"url":"https://cdn.example/img.jpg"}}]}</script>
            </head></html>"#;
        let document = Document::from(html);

        let m = extract(&document, "abc").unwrap();
        assert_eq!(m.thumbnail_url.as_deref(), Some("https://cdn.example/img.jpg"));
    }

    #[test]
    fn test_extract_none_without_scripts() {
        let document = Document::from("<html><head></head><body></body></html>");
        assert!(extract(&document, "abc").is_none());
    }
}

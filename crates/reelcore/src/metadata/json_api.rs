//! Tier 1: Instagram's `?__a=1&__d=dis` JSON endpoint.
//!
//! Two response shapes are in circulation: the v1 media item (`items[0]`)
//! and the older GraphQL `shortcode_media` object.

use serde_json::Value;

use super::{clean, MetadataSource, ReelMetadata};

/// Parse either response shape. `None` when neither is present.
pub fn parse(body: &Value, shortcode: &str) -> Option<ReelMetadata> {
    if let Some(item) = body.pointer("/items/0") {
        return Some(from_v1_item(item, shortcode));
    }

    let media = body
        .pointer("/graphql/shortcode_media")
        .or_else(|| body.pointer("/data/xdt_shortcode_media"))
        .or_else(|| body.pointer("/data/shortcode_media"))?;

    Some(from_graphql(media, shortcode))
}

fn from_v1_item(item: &Value, shortcode: &str) -> ReelMetadata {
    ReelMetadata {
        caption: str_at(item, "/caption/text"),
        like_count: u64_at(item, "/like_count"),
        comment_count: u64_at(item, "/comment_count"),
        view_count: u64_at(item, "/play_count")
            .or_else(|| u64_at(item, "/view_count"))
            .or_else(|| u64_at(item, "/video_view_count")),
        author: str_at(item, "/user/username"),
        author_name: str_at(item, "/user/full_name"),
        upload_date: item.get("taken_at").and_then(Value::as_i64).and_then(timestamp_to_rfc3339),
        thumbnail_url: str_at(item, "/image_versions2/candidates/0/url"),
        video_url: str_at(item, "/video_versions/0/url"),
        ..ReelMetadata::new(shortcode, MetadataSource::JsonApi)
    }
}

fn from_graphql(media: &Value, shortcode: &str) -> ReelMetadata {
    ReelMetadata {
        caption: str_at(media, "/edge_media_to_caption/edges/0/node/text"),
        like_count: u64_at(media, "/edge_media_preview_like/count").or_else(|| u64_at(media, "/edge_liked_by/count")),
        comment_count: u64_at(media, "/edge_media_to_comment/count")
            .or_else(|| u64_at(media, "/edge_media_to_parent_comment/count")),
        view_count: u64_at(media, "/video_view_count").or_else(|| u64_at(media, "/video_play_count")),
        author: str_at(media, "/owner/username"),
        author_name: str_at(media, "/owner/full_name"),
        upload_date: media
            .get("taken_at_timestamp")
            .and_then(Value::as_i64)
            .and_then(timestamp_to_rfc3339),
        thumbnail_url: str_at(media, "/display_url").or_else(|| str_at(media, "/thumbnail_src")),
        video_url: str_at(media, "/video_url"),
        ..ReelMetadata::new(shortcode, MetadataSource::JsonApi)
    }
}

fn str_at(value: &Value, pointer: &str) -> Option<String> {
    value.pointer(pointer).and_then(Value::as_str).and_then(clean)
}

fn u64_at(value: &Value, pointer: &str) -> Option<u64> {
    value.pointer(pointer).and_then(Value::as_u64)
}

fn timestamp_to_rfc3339(secs: i64) -> Option<String> {
    chrono::DateTime::from_timestamp(secs, 0).map(|dt| dt.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_v1_item() {
        let body = json!({
            "items": [{
                "code": "C9xYz12AbCd",
                "taken_at": 1709467200,
                "caption": { "text": "Morning light over the bay" },
                "like_count": 15230,
                "comment_count": 412,
                "play_count": 880000,
                "user": { "username": "bayphotos", "full_name": "Bay Photos" },
                "video_versions": [{ "url": "https://cdn.example/v.mp4", "width": 720 }],
                "image_versions2": { "candidates": [{ "url": "https://cdn.example/t.jpg" }] }
            }]
        });

        let m = parse(&body, "C9xYz12AbCd").unwrap();

        assert_eq!(m.source, MetadataSource::JsonApi);
        assert_eq!(m.caption.as_deref(), Some("Morning light over the bay"));
        assert_eq!(m.like_count, Some(15230));
        assert_eq!(m.comment_count, Some(412));
        assert_eq!(m.view_count, Some(880000));
        assert_eq!(m.author.as_deref(), Some("bayphotos"));
        assert_eq!(m.author_name.as_deref(), Some("Bay Photos"));
        assert_eq!(m.upload_date.as_deref(), Some("2024-03-03T12:00:00+00:00"));
        assert_eq!(m.video_url.as_deref(), Some("https://cdn.example/v.mp4"));
        assert_eq!(m.thumbnail_url.as_deref(), Some("https://cdn.example/t.jpg"));
    }

    #[test]
    fn test_parse_graphql_shape() {
        let body = json!({
            "graphql": {
                "shortcode_media": {
                    "is_video": true,
                    "video_url": "https://cdn.example/g.mp4",
                    "display_url": "https://cdn.example/g.jpg",
                    "video_view_count": 99,
                    "edge_media_to_caption": { "edges": [{ "node": { "text": "hello" } }] },
                    "edge_media_preview_like": { "count": 7 },
                    "edge_media_to_parent_comment": { "count": 2 },
                    "owner": { "username": "gql_user", "full_name": "" }
                }
            }
        });

        let m = parse(&body, "abc").unwrap();

        assert_eq!(m.caption.as_deref(), Some("hello"));
        assert_eq!(m.like_count, Some(7));
        assert_eq!(m.comment_count, Some(2));
        assert_eq!(m.view_count, Some(99));
        assert_eq!(m.author.as_deref(), Some("gql_user"));
        assert_eq!(m.author_name, None);
        assert_eq!(m.thumbnail_url.as_deref(), Some("https://cdn.example/g.jpg"));
        assert_eq!(m.upload_date, None);
    }

    #[test]
    fn test_parse_unknown_shape() {
        assert!(parse(&json!({ "require_login": true, "status": "fail" }), "abc").is_none());
    }
}

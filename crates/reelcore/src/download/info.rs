//! Combined reel info served by `/api/info`.

use serde_json::{Map, Value};

use crate::core::error::AppError;
use crate::download::SnapsaveResult;
use crate::metadata::ReelMetadata;

/// Keys removed from the merged object: the raw link list is replaced by
/// `downloadUrls` and the thumbnail is dropped from the summary.
const STRIPPED_KEYS: &[&str] = &["data", "thumbnailUrl"];

/// Merge scraped metadata with the resolver result.
///
/// Download keys win on conflict. `downloadUrls` lists every resolved link in
/// upstream order (empty when resolution failed).
pub fn merge_info(metadata: &ReelMetadata, download: &SnapsaveResult) -> Result<Value, AppError> {
    let mut merged = into_object(serde_json::to_value(metadata)?);
    merged.extend(into_object(serde_json::to_value(download)?));

    let urls: Vec<Value> = download
        .links()
        .iter()
        .map(|link| Value::String(link.url.clone()))
        .collect();
    merged.insert("downloadUrls".to_string(), Value::Array(urls));

    for key in STRIPPED_KEYS {
        merged.remove(*key);
    }

    Ok(Value::Object(merged))
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

//! SnapsaveClient: resolves media download links through snapsave.app.
//!
//! snapsave answers `action.php` with a packed JavaScript payload. Unpacking
//! it yields a script that injects the download table into the page; the
//! links are scraped from that HTML.
//!
//! Flow:
//! - reject URLs snapsave does not handle (`status: false`, "Link URL not valid")
//! - POST the URL as a form to `{base}/action.php?lang=en`
//! - unpack the payload and cut out the `download-section` HTML
//! - scrape either the table layout (videos) or the card layout (photos, carousels)

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{ACCEPT, ORIGIN, REFERER};
use select::document::Document;
use select::node::Node;
use select::predicate::{Class, Name, Predicate};

use crate::core::config;
use crate::core::error::AppError;
use crate::core::http;
use crate::core::validation;
use crate::download::error::DownloadError;
use crate::download::{MediaLink, MediaResolver, SnapsaveResult, MSG_BLANK_DATA, MSG_INVALID_URL};

/// Text right before the packer's argument list.
const PACKER_MARKER: &str = "decodeURIComponent(escape(r))}(";

/// Start of the injected download table.
const SECTION_START: &str = r#"getElementById("download-section").innerHTML = ""#;

/// End of the injected download table.
const SECTION_END: &str = r#""; document.getElementById("inputData").remove(); "#;

/// JS string escapes left in the injected HTML (`\"`, `\\`).
static ESCAPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(\\)?").expect("escape regex"));

/// `get_progressApi('/render.php?...')` onclick handlers on render buttons.
static RENDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"get_progressApi\('(.*?)'\)").expect("render regex"));

/// snapsave.app resolver.
pub struct SnapsaveClient {
    client: reqwest::Client,
    base_url: String,
}

impl SnapsaveClient {
    /// Client against the configured `SNAPSAVE_BASE_URL`.
    pub fn new() -> Result<Self, AppError> {
        Self::with_base_url(config::SNAPSAVE_BASE_URL.as_str())
    }

    /// Client against an explicit base URL (tests, mirrors).
    pub fn with_base_url(base_url: &str) -> Result<Self, AppError> {
        Ok(Self {
            client: http::build_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST the post URL to `action.php` and return the raw packed payload.
    async fn fetch_payload(&self, url: &str) -> Result<String, AppError> {
        let endpoint = format!("{}/action.php?lang=en", self.base_url);

        log::info!("SnapsaveClient: POST {} for {}", endpoint, url);

        let response = self
            .client
            .post(&endpoint)
            .header(ACCEPT, "*/*")
            .header(ORIGIN, self.base_url.as_str())
            .header(REFERER, format!("{}/en", self.base_url))
            .form(&[("url", url)])
            .send()
            .await
            .map_err(DownloadError::from)?;

        if !response.status().is_success() {
            return Err(DownloadError::Upstream(format!("snapsave returned HTTP {}", response.status())).into());
        }

        let text = response.text().await.map_err(DownloadError::from)?;
        if text.is_empty() {
            return Err(DownloadError::Upstream("snapsave returned an empty response".to_string()).into());
        }

        Ok(text)
    }
}

#[async_trait]
impl MediaResolver for SnapsaveClient {
    fn name(&self) -> &str {
        "snapsave"
    }

    async fn resolve(&self, url: &str) -> Result<SnapsaveResult, AppError> {
        let supported = validation::parse_http_url(url)
            .map(|parsed| validation::is_snapsave_supported(&parsed))
            .unwrap_or(false);
        if !supported {
            log::warn!("SnapsaveClient: unsupported URL {}", url);
            return Ok(SnapsaveResult::failed(MSG_INVALID_URL));
        }

        let payload = self.fetch_payload(url).await?;
        let links = decode_response(&payload, &self.base_url)?;

        if links.is_empty() {
            log::warn!("SnapsaveClient: no media links for {}", url);
            return Ok(SnapsaveResult::failed(MSG_BLANK_DATA));
        }

        log::info!("SnapsaveClient: {} media link(s) for {}", links.len(), url);
        Ok(SnapsaveResult::found(links))
    }
}

/// Unpack a raw `action.php` response and scrape its links.
pub fn decode_response(payload: &str, base_url: &str) -> Result<Vec<MediaLink>, DownloadError> {
    if !payload.contains(PACKER_MARKER) {
        let preview: String = payload.chars().take(200).collect();
        log::error!("SnapsaveClient: response is not a packed payload: {}", preview);
        return Err(DownloadError::Upstream("unexpected snapsave response".to_string()));
    }

    let args = PackedArgs::extract(payload)?;
    let script = args.unpack()?;
    let html = extract_download_section(&script)?;

    Ok(parse_links(&html, base_url))
}

/// Arguments of the packer call `(h, u, n, t, e, r)` that matter for decoding.
#[derive(Debug)]
struct PackedArgs {
    /// `h`: the encoded stream
    data: String,
    /// `n`: digit alphabet; `n[base]` is the chunk delimiter
    alphabet: Vec<char>,
    /// `t`: subtracted from every decoded value
    offset: u64,
    /// `e`: numeric base of each chunk
    base: u64,
}

impl PackedArgs {
    fn extract(payload: &str) -> Result<Self, DownloadError> {
        let after = payload
            .split(PACKER_MARKER)
            .nth(1)
            .ok_or_else(|| DownloadError::Decode("packer call not found".to_string()))?;
        let raw_args = after.split("))").next().unwrap_or_default();
        let args: Vec<String> = raw_args.split(',').map(|v| v.replace('"', "").trim().to_string()).collect();

        if args.len() < 5 {
            return Err(DownloadError::Decode(format!(
                "expected at least 5 packer arguments, got {}",
                args.len()
            )));
        }

        let parse_num = |idx: usize| {
            args[idx]
                .parse::<u64>()
                .map_err(|_| DownloadError::Decode(format!("packer argument {} is not a number: {}", idx, args[idx])))
        };

        let alphabet: Vec<char> = args[2].chars().collect();
        let offset = parse_num(3)?;
        let base = parse_num(4)?;

        if base < 2 || base as usize >= alphabet.len() {
            return Err(DownloadError::Decode(format!(
                "packer base {} does not fit alphabet of {} symbols",
                base,
                alphabet.len()
            )));
        }

        Ok(Self {
            data: args[0].clone(),
            alphabet,
            offset,
            base,
        })
    }

    /// Decode the stream into the script it hides.
    ///
    /// Every chunk is a base-`e` number written with `n` as digits. The value
    /// minus `t` is a Latin-1 code unit; the collected bytes are UTF-8.
    fn unpack(&self) -> Result<String, DownloadError> {
        let delimiter = self.alphabet[self.base as usize];
        let mut bytes = Vec::with_capacity(self.data.len() / 2);

        for chunk in self.data.split(delimiter).filter(|c| !c.is_empty()) {
            let mut value: u64 = 0;
            for c in chunk.chars() {
                let digit = self
                    .alphabet
                    .iter()
                    .position(|&a| a == c)
                    .map(|d| d as u64)
                    .filter(|&d| d < self.base)
                    .ok_or_else(|| DownloadError::Decode(format!("symbol {:?} outside packer alphabet", c)))?;
                value = value
                    .checked_mul(self.base)
                    .and_then(|v| v.checked_add(digit))
                    .ok_or_else(|| DownloadError::Decode("packed value overflow".to_string()))?;
            }

            let code = value
                .checked_sub(self.offset)
                .filter(|&c| c <= u8::MAX as u64)
                .ok_or_else(|| DownloadError::Decode(format!("decoded value {} is not a byte", value)))?;
            bytes.push(code as u8);
        }

        String::from_utf8(bytes).map_err(|e| DownloadError::Decode(format!("payload is not UTF-8: {}", e)))
    }
}

/// Cut the injected `download-section` HTML out of the unpacked script.
fn extract_download_section(script: &str) -> Result<String, DownloadError> {
    let section = script
        .split(SECTION_START)
        .nth(1)
        .and_then(|rest| rest.split(SECTION_END).next())
        .ok_or_else(|| DownloadError::Decode("download section not found in payload".to_string()))?;

    Ok(ESCAPE_RE.replace_all(section, "").into_owned())
}

/// Scrape media links out of the download-section HTML.
pub fn parse_links(html: &str, base_url: &str) -> Vec<MediaLink> {
    let document = Document::from(html);

    let is_table_layout = document.find(Name("table").and(Class("table"))).next().is_some()
        || document
            .find(Name("article").and(Class("media")).child(Name("figure")))
            .next()
            .is_some();

    if is_table_layout {
        parse_table_layout(&document, base_url)
    } else {
        parse_card_layout(&document, base_url)
    }
}

/// Video layout: one row per quality, shared thumbnail in a `<figure>`.
fn parse_table_layout(document: &Document, base_url: &str) -> Vec<MediaLink> {
    let thumbnail = document
        .find(Name("figure").descendant(Name("img")))
        .find_map(|img| img.attr("src"))
        .map(String::from);

    let mut links = Vec::new();
    for row in document.find(Name("tbody").child(Name("tr"))) {
        let cells: Vec<Node> = row.find(Name("td")).collect();

        let resolution = cells
            .first()
            .map(|cell| cell.text().trim().to_string())
            .filter(|text| !text.is_empty());

        let Some(action_cell) = cells.get(2) else {
            continue;
        };

        let raw = action_cell
            .find(Name("a"))
            .find_map(|a| a.attr("href"))
            .or_else(|| action_cell.find(Name("button")).find_map(|b| b.attr("onclick")));
        let Some(raw) = raw else {
            continue;
        };

        let (url, should_render) = match render_path(raw) {
            Some(path) => (format!("{}{}", base_url, path), true),
            None => (absolutize(raw, base_url), false),
        };

        links.push(MediaLink {
            url,
            resolution,
            thumbnail: thumbnail.clone(),
            should_render,
        });
    }

    links
}

/// Photo/carousel layout: every `download-items__thumb` pairs with every
/// `download-items__btn` link, thumbnails outermost. Without thumbnails the
/// links are returned bare.
fn parse_card_layout(document: &Document, base_url: &str) -> Vec<MediaLink> {
    let hrefs: Vec<&str> = document
        .find(Name("div").and(Class("download-items__btn")).descendant(Name("a")))
        .filter_map(|a| a.attr("href"))
        .collect();

    let mut thumbnails: Vec<Option<String>> = document
        .find(Name("div").and(Class("download-items__thumb")))
        .map(|thumb| thumb.find(Name("img")).find_map(|img| img.attr("src")).map(String::from))
        .collect();
    if thumbnails.is_empty() {
        thumbnails.push(None);
    }

    thumbnails
        .iter()
        .flat_map(|thumbnail| {
            hrefs.iter().map(move |href| MediaLink {
                url: absolutize(href, base_url),
                resolution: None,
                thumbnail: thumbnail.clone(),
                should_render: false,
            })
        })
        .collect()
}

fn render_path(raw: &str) -> Option<&str> {
    RENDER_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn absolutize(href: &str, base_url: &str) -> String {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("https://{}", rest)
    } else if href.starts_with('/') {
        format!("{}{}", base_url, href)
    } else {
        format!("{}/{}", base_url, href)
    }
}

//! XML response parser for the MediaWiki query API
//!
//! This module extracts:
//! - Image records and the continuation cursor from `list=allimages` pages
//! - The single image of a `prop=imageinfo` lookup
//! - Image titles from a `prop=images` lookup
//!
//! Expected listing shape:
//!
//! ```text
//! <api>
//!   <query-continue><allimages aifrom="Next.png"/></query-continue>
//!   <query>
//!     <allimages>
//!       <img name="A.png" url="..." descriptionurl="..."/>
//!     </allimages>
//!   </query>
//! </api>
//! ```

use super::types::{ImageRecord, PageResponse};
use roxmltree::{Document, Node};
use url::Url;

/// Parses one page of the `allimages` listing
///
/// # Rules
///
/// - The document must be well-formed XML rooted at `<api>`
/// - An `<error>` child of `<api>` is reported as a failure
/// - Records come from `api/query/allimages/img`, in document order; each
///   needs `name`, `url` and `descriptionurl`
/// - A missing `<query>` or `<allimages>` means zero records
/// - The cursor is `api/query-continue/allimages@aifrom`; an absent
///   `<query-continue>` means last page, while `aifrom=""` is a cursor
///
/// URLs are resolved against `base_url`, so protocol-relative values such as
/// `//upload.example.org/a.png` are accepted.
///
/// # Returns
///
/// * `Ok(PageResponse)` - Records plus optional cursor
/// * `Err(String)` - Description of what made the page malformed
pub fn parse_listing(xml: &str, base_url: &Url) -> Result<PageResponse, String> {
    let document = parse_document(xml)?;
    let api = api_root(&document)?;

    let records = match child(api, "query").and_then(|query| child(query, "allimages")) {
        Some(list) => list
            .children()
            .filter(|node| node.has_tag_name("img"))
            .map(|img| parse_image(img, base_url, None))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let next_cursor = extract_cursor(api)?;

    Ok(PageResponse {
        records,
        next_cursor,
    })
}

/// Parses the result of a `prop=imageinfo&iiprop=url` lookup
///
/// Returns the first `ii` element found under `api/query/pages/page/imageinfo`.
/// `ii` elements rarely carry a `name`, so the record name falls back to the
/// enclosing page title, then to `requested_title`.
///
/// # Returns
///
/// * `Ok(Some(ImageRecord))` - The image was found
/// * `Ok(None)` - The page has no image info (missing file, not a file page)
/// * `Err(String)` - The document is malformed
pub fn parse_image_info(
    xml: &str,
    requested_title: &str,
    base_url: &Url,
) -> Result<Option<ImageRecord>, String> {
    let document = parse_document(xml)?;
    let api = api_root(&document)?;

    for page in pages(api) {
        let info = child(page, "imageinfo").and_then(|imageinfo| child(imageinfo, "ii"));
        if let Some(ii) = info {
            let fallback = page.attribute("title").unwrap_or(requested_title);
            return parse_image(ii, base_url, Some(fallback)).map(Some);
        }
    }

    Ok(None)
}

/// Parses the result of a `prop=images` lookup into image titles
///
/// Titles come from every `api/query/pages/page/images/im@title`, in
/// document order.
pub fn parse_page_images(xml: &str) -> Result<Vec<String>, String> {
    let document = parse_document(xml)?;
    let api = api_root(&document)?;

    let mut titles = Vec::new();
    for page in pages(api) {
        if let Some(images) = child(page, "images") {
            for im in images.children().filter(|node| node.has_tag_name("im")) {
                titles.push(required_attribute(im, "title")?.to_string());
            }
        }
    }

    Ok(titles)
}

fn parse_document(xml: &str) -> Result<Document<'_>, String> {
    Document::parse(xml).map_err(|e| format!("invalid XML: {}", e))
}

/// Returns the `<api>` root, rejecting other roots and API error replies
fn api_root<'a, 'input>(document: &'a Document<'input>) -> Result<Node<'a, 'input>, String> {
    let root = document.root_element();

    if !root.has_tag_name("api") {
        return Err(format!(
            "expected root element <api>, found <{}>",
            root.tag_name().name()
        ));
    }

    if let Some(error) = child(root, "error") {
        return Err(format!(
            "API error {}: {}",
            error.attribute("code").unwrap_or("unknown"),
            error.attribute("info").unwrap_or("")
        ));
    }

    Ok(root)
}

/// Reads the continuation cursor
///
/// Presence of `<query-continue>` is what matters. Once present it must
/// carry `<allimages aifrom="...">`.
fn extract_cursor(api: Node<'_, '_>) -> Result<Option<String>, String> {
    let Some(continuation) = child(api, "query-continue") else {
        return Ok(None);
    };

    let allimages = child(continuation, "allimages")
        .ok_or_else(|| "<query-continue> has no <allimages> element".to_string())?;

    required_attribute(allimages, "aifrom").map(|cursor| Some(cursor.to_string()))
}

fn parse_image(
    node: Node<'_, '_>,
    base_url: &Url,
    fallback_name: Option<&str>,
) -> Result<ImageRecord, String> {
    let name = match (node.attribute("name"), fallback_name) {
        (Some(name), _) => name,
        (None, Some(fallback)) => fallback,
        (None, None) => required_attribute(node, "name")?,
    };

    let asset_url = resolve_url(node, "url", base_url)?;
    let description_url = resolve_url(node, "descriptionurl", base_url)?;

    Ok(ImageRecord {
        name: name.to_string(),
        asset_url,
        description_url,
    })
}

/// Resolves a URL attribute against the endpoint
///
/// An empty value would join to the endpoint itself, so it is rejected.
fn resolve_url(node: Node<'_, '_>, attribute: &str, base_url: &Url) -> Result<Url, String> {
    let value = required_attribute(node, attribute)?.trim();
    if value.is_empty() {
        return Err(format!(
            "<{}> has an empty '{}' attribute",
            node.tag_name().name(),
            attribute
        ));
    }

    base_url
        .join(value)
        .map_err(|e| format!("invalid URL in '{}' ('{}'): {}", attribute, value, e))
}

fn required_attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, String> {
    node.attribute(name).ok_or_else(|| {
        format!(
            "<{}> is missing the '{}' attribute",
            node.tag_name().name(),
            name
        )
    })
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn pages<'a, 'input>(api: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    child(api, "query")
        .and_then(|query| child(query, "pages"))
        .into_iter()
        .flat_map(|pages| pages.children().filter(|node| node.has_tag_name("page")))
}

//! HTML parser for skin pages and the skin index
//!
//! This module handles parsing HTML content to extract:
//! - The workshop id and item image of a skin page
//! - Links to skin pages from the index page

use crate::config::SelectorConfig;
use crate::crawler::fetcher::{PageFields, WorkshopField};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Parses a skin page and extracts its fields
///
/// # Extraction Rules
///
/// - Workshop id: trimmed text of the first element matching `workshop-id`.
///   Missing or empty → `Absent`; not an integer → `Malformed`.
/// - Item image: `src` of the first element matching `item-image`.
///
/// # Returns
///
/// * `Ok(PageFields)` - Successfully parsed page
/// * `Err(String)` - A configured selector failed to parse
///
/// # Example
///
/// ```no_run
/// use skinmap::config::SelectorConfig;
/// use skinmap::crawler::{parse_skin_page, WorkshopField};
///
/// let html = r#"<table class="stats-table"><tr><td><a>123</a></td></tr></table>"#;
/// let fields = parse_skin_page(html, &SelectorConfig::default()).unwrap();
/// assert_eq!(fields.workshop_id, WorkshopField::Id(123));
/// ```
pub fn parse_skin_page(html: &str, selectors: &SelectorConfig) -> Result<PageFields, String> {
    let document = Html::parse_document(html);

    let workshop_selector = parse_selector(&selectors.workshop_id)?;
    let image_selector = parse_selector(&selectors.item_image)?;

    let workshop_id = match document.select(&workshop_selector).next() {
        Some(element) => {
            let text = element.text().collect::<String>();
            let text = text.trim();
            if text.is_empty() {
                WorkshopField::Absent
            } else {
                match text.parse::<u64>() {
                    Ok(id) => WorkshopField::Id(id),
                    Err(_) => WorkshopField::Malformed(text.to_string()),
                }
            }
        }
        None => WorkshopField::Absent,
    };

    let item_image = document
        .select(&image_selector)
        .next()
        .and_then(|element| element.value().attr("src"))
        .map(|src| src.trim().to_string());

    Ok(PageFields {
        workshop_id,
        item_image,
    })
}

/// Extracts skin page links from the index page
///
/// Hrefs are resolved against `base_url` (so protocol-relative `//host/path`
/// links work). Duplicates are dropped, document order is kept.
pub fn extract_index_links(
    html: &str,
    base_url: &Url,
    link_selector: &str,
) -> Result<Vec<String>, String> {
    let document = Html::parse_document(html);
    let selector = parse_selector(link_selector)?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_link(href, base_url) {
                if seen.insert(absolute_url.clone()) {
                    links.push(absolute_url);
                }
            }
        }
    }

    Ok(links)
}

fn parse_selector(selector: &str) -> Result<Selector, String> {
    Selector::parse(selector).map_err(|e| format!("'{}': {:?}", selector, e))
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None for empty or fragment-only hrefs, unresolvable links, and
/// anything that is not HTTP(S) after resolution.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }

    absolute_url.set_fragment(None);
    Some(absolute_url.to_string())
}

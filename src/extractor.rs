use crate::models::{PageMetadata, PageStructure};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

// Cached selectors to avoid repeated parsing and eliminate unwrap() calls
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("title selector should be valid"));
static META_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[content]").expect("meta selector should be valid"));
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("link[rel][href]").expect("link selector should be valid"));
static H1_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1").expect("h1 selector should be valid"));
static H2_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2").expect("h2 selector should be valid"));
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("img selector should be valid"));
static SCRIPT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script").expect("script selector should be valid"));
static STYLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("style").expect("style selector should be valid"));

/// Everything the scorers need from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    pub metadata: PageMetadata,
    pub structure: PageStructure,
}

/// Parses `html` once and extracts both metadata and structure.
pub fn extract_page(html: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    ExtractedPage {
        metadata: metadata_from(&document),
        structure: structure_from(&document, html),
    }
}

pub fn extract_metadata(html: &str) -> PageMetadata {
    metadata_from(&Html::parse_document(html))
}

pub fn extract_structure(html: &str) -> PageStructure {
    structure_from(&Html::parse_document(html), html)
}

fn metadata_from(document: &Html) -> PageMetadata {
    let mut metadata = PageMetadata {
        title: document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string()),
        lang: document
            .root_element()
            .value()
            .attr("lang")
            .map(|s| s.to_string()),
        ..Default::default()
    };

    for element in document.select(&META_SELECTOR) {
        let Some(content) = element.value().attr("content") else {
            continue;
        };

        let slot = if let Some(name) = element.value().attr("name") {
            match name.trim().to_ascii_lowercase().as_str() {
                "description" => &mut metadata.description,
                "keywords" => &mut metadata.keywords,
                "robots" => &mut metadata.robots,
                _ => continue,
            }
        } else if let Some(property) = element.value().attr("property") {
            match property.trim().to_ascii_lowercase().as_str() {
                "og:title" => &mut metadata.og_title,
                "og:description" => &mut metadata.og_description,
                "og:image" => &mut metadata.og_image,
                _ => continue,
            }
        } else {
            continue;
        };

        // First match wins
        if slot.is_none() {
            *slot = Some(content.to_string());
        }
    }

    metadata.canonical = document
        .select(&LINK_SELECTOR)
        .find(|el| has_rel(el, "canonical"))
        .and_then(|el| el.value().attr("href"))
        .map(|s| s.to_string());

    metadata
}

fn has_rel(element: &ElementRef, value: &str) -> bool {
    element
        .value()
        .attr("rel")
        .is_some_and(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case(value)))
}

fn structure_from(document: &Html, raw: &str) -> PageStructure {
    let mut structure = PageStructure {
        h1_count: document.select(&H1_SELECTOR).count(),
        h2_count: document.select(&H2_SELECTOR).count(),
        style_blocks: document.select(&STYLE_SELECTOR).count(),
        has_viewport: raw.contains("viewport"),
        has_responsive_css: raw.contains("@media") || raw.contains("responsive"),
        ..Default::default()
    };

    for image in document.select(&IMG_SELECTOR) {
        structure.image_count += 1;
        if image.value().attr("alt").is_none() {
            structure.images_missing_alt += 1;
        }
    }

    for script in document.select(&SCRIPT_SELECTOR) {
        let attrs = script.value();
        if attrs.attr("src").is_some() {
            structure.external_scripts += 1;
        } else {
            structure.inline_scripts += 1;
        }

        if attrs.attr("async").is_some() || attrs.attr("defer").is_some() {
            structure.async_or_deferred_scripts += 1;
        }
    }

    structure
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>  Handmade Ceramics for Everyday Kitchens  </title>
  <META NAME="Description" content="Small-batch mugs and plates.">
  <meta name="description" content="second description is ignored">
  <meta name="keywords" content="ceramics, pottery">
  <meta name="robots" content="index, follow">
  <meta property="og:title" content="Ceramics">
  <meta property="OG:Description" content="Mugs and plates">
  <meta property="og:image" content="https://example.com/og.png">
  <link rel="stylesheet" href="/site.css">
  <link rel="Canonical" href="https://example.com/">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <style>@media (max-width: 600px) { body { margin: 0 } }</style>
  <script src="/app.js" defer></script>
  <script>window.dataLayer = [];</script>
</head>
<body>
  <h1>Ceramics</h1>
  <h2>Mugs</h2><h2>Plates</h2>
  <img src="a.png" alt="A mug">
  <img src="b.png">
  <img src="c.png" alt="">
</body>
</html>"#;

    #[test]
    fn test_extract_metadata() {
        let metadata = extract_metadata(SAMPLE);

        assert_eq!(
            metadata.title.as_deref(),
            Some("Handmade Ceramics for Everyday Kitchens")
        );
        assert_eq!(
            metadata.description.as_deref(),
            Some("Small-batch mugs and plates.")
        );
        assert_eq!(metadata.keywords.as_deref(), Some("ceramics, pottery"));
        assert_eq!(metadata.robots.as_deref(), Some("index, follow"));
        assert_eq!(metadata.og_title.as_deref(), Some("Ceramics"));
        assert_eq!(metadata.og_description.as_deref(), Some("Mugs and plates"));
        assert_eq!(
            metadata.og_image.as_deref(),
            Some("https://example.com/og.png")
        );
        assert_eq!(metadata.canonical.as_deref(), Some("https://example.com/"));
        assert_eq!(metadata.lang.as_deref(), Some("en"));
    }

    #[test]
    fn test_extract_structure() {
        let structure = extract_structure(SAMPLE);

        assert_eq!(structure.h1_count, 1);
        assert_eq!(structure.h2_count, 2);
        assert_eq!(structure.image_count, 3);
        assert_eq!(structure.images_missing_alt, 1);
        assert_eq!(structure.external_scripts, 1);
        assert_eq!(structure.inline_scripts, 1);
        assert_eq!(structure.async_or_deferred_scripts, 1);
        assert_eq!(structure.style_blocks, 1);
        assert!(structure.has_viewport);
        assert!(structure.has_responsive_css);
    }

    #[test]
    fn test_empty_document_yields_nothing() {
        let page = extract_page("");
        assert_eq!(page.metadata, PageMetadata::default());
        assert_eq!(page.structure, PageStructure::default());
    }

    #[test]
    fn test_malformed_markup_does_not_panic() {
        let page = extract_page("<html><head><title>Unclosed<meta name=description content=x");
        assert_eq!(page.structure.h1_count, 0);

        let page = extract_page("<<<>>> <img <script src= <h1");
        assert_eq!(page.metadata.canonical, None);
    }

    #[test]
    fn test_canonical_is_passed_through_unchecked() {
        let metadata = extract_metadata(r#"<link rel="canonical" href="not a url">"#);
        assert_eq!(metadata.canonical.as_deref(), Some("not a url"));
    }
}

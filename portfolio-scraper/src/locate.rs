//! Heuristic selection of a page's best representative image.
//!
//! Pure functions over an already-parsed document; all I/O lives in
//! [`crate::client`].

use scraper::{Html, Selector};
use url::Url;

/// Structural selectors tried in priority order. Meta tags carry the
/// candidate URL in `content`, everything else in `src`.
const CANDIDATE_SELECTORS: &[(&str, &str)] = &[
    (r#"meta[property="og:image"]"#, "content"),
    (r#"meta[name="twitter:image"]"#, "content"),
    (".hero img", "src"),
    (".banner img", "src"),
    (".portfolio-image img", "src"),
    ("main img", "src"),
    ("article img", "src"),
    (r#"img[src*="hero"]"#, "src"),
    (r#"img[src*="banner"]"#, "src"),
    (r#"img[src*="portfolio"]"#, "src"),
];

/// Pick the single best candidate image URL on a page, or `None`.
///
/// The first priority selector whose first match carries a usable source
/// wins. When none match, falls back to the largest image by declared
/// `width * height`; images without positive declared dimensions are never
/// chosen by the fallback.
pub fn find_best_image(document: &Html, base_url: &Url) -> Option<Url> {
    for &(selector, attr) in CANDIDATE_SELECTORS {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            if let Some(src) = element.value().attr(attr).filter(|s| !s.is_empty()) {
                if let Some(resolved) = resolve_candidate(src, base_url) {
                    return Some(resolved);
                }
            }
        }
    }
    largest_image(document, base_url)
}

/// Fallback scan: every `img` scored by declared area, strict maximum, ties
/// resolved in document order.
fn largest_image(document: &Html, base_url: &Url) -> Option<Url> {
    let img = Selector::parse("img").ok()?;

    let mut best: Option<&str> = None;
    let mut max_area: u64 = 0;

    for element in document.select(&img) {
        let width = parse_dimension(element.value().attr("width"));
        let height = parse_dimension(element.value().attr("height"));
        let area = width * height;

        let src = element.value().attr("src").unwrap_or("");
        if area > max_area && !src.is_empty() {
            max_area = area;
            best = Some(src);
        }
    }

    best.and_then(|src| resolve_candidate(src, base_url))
}

/// Leading-digit parse, so `"640px"` scores as 640 and junk scores as 0.
fn parse_dimension(attr: Option<&str>) -> u64 {
    let digits: String = attr
        .unwrap_or("")
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Normalize a candidate source against the page URL.
///
/// A root-relative source keeps only the base's scheme and host; an
/// absolute source is used verbatim; anything else resolves relatively.
fn resolve_candidate(src: &str, base_url: &Url) -> Option<Url> {
    if src.starts_with('/') {
        let origin = base_url.origin().ascii_serialization();
        Url::parse(&format!("{origin}{src}")).ok()
    } else if src.starts_with("http") {
        Url::parse(src).ok()
    } else {
        base_url.join(src).ok()
    }
}

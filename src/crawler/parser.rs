//! HTML parser for extracting page text and links
//!
//! This module handles parsing rendered markup to extract:
//! - A normalized text blob from a fixed set of semantic tags
//! - Anchor hrefs, resolved against the crawl origin and filtered by scope

use crate::url::ScopeGuard;
use scraper::{Html, Selector};

/// Tags whose text is extracted, in output order
pub const TEXT_TAGS: [&str; 9] = ["h1", "h2", "h3", "h4", "h5", "h6", "p", "span", "li"];

/// Extracted information from a rendered page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Normalized text blob
    pub text: String,

    /// In-scope absolute URLs, in document order
    pub links: Vec<String>,

    /// Hrefs that resolved to a URL outside the origin
    pub out_of_scope: usize,

    /// Hrefs that could not be resolved
    pub malformed: usize,
}

/// Parses rendered markup once and runs both extraction passes over it
///
/// # Example
///
/// ```
/// use ripple_scrape::crawler::parse_html;
/// use ripple_scrape::url::{Origin, ScopeGuard};
///
/// let guard = ScopeGuard::new(Origin::from_seed("https://example.com/").unwrap());
/// let html = r#"<p>Body text</p><h1>Title</h1><a href="/next">next</a>"#;
/// let parsed = parse_html(html, &guard);
/// assert_eq!(parsed.text, "Title\nBody text");
/// assert_eq!(parsed.links, vec!["https://example.com/next".to_string()]);
/// ```
pub fn parse_html(html: &str, scope: &ScopeGuard) -> ParsedPage {
    let document = Html::parse_document(html);

    let text = extract_text_from(&document);
    let mut parsed = discover_links(&document, scope);
    parsed.text = text;

    parsed
}

/// Extracts the normalized text blob from rendered markup
///
/// Tags are visited in [`TEXT_TAGS`] order, and within a tag in document
/// order, so all headings come before all paragraphs regardless of where
/// they appear on the page. Each element contributes one line with its
/// whitespace collapsed; elements without text still contribute an empty
/// line.
pub fn extract_text(html: &str) -> String {
    extract_text_from(&Html::parse_document(html))
}

fn extract_text_from(document: &Html) -> String {
    let mut blob = String::new();

    for tag in TEXT_TAGS {
        let Ok(selector) = Selector::parse(tag) else {
            continue;
        };

        for element in document.select(&selector) {
            let raw: String = element.text().collect();
            blob.push_str(&collapse_whitespace(&raw));
            blob.push('\n');
        }
    }

    blob.trim().to_string()
}

/// Collapses every whitespace run to a single space and trims the ends
///
/// The byte order mark (U+FEFF) counts as whitespace along with the Unicode
/// `White_Space` set.
pub fn collapse_whitespace(text: &str) -> String {
    text.split(is_blank)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Collects in-scope links from every `<a href>` in the document
///
/// Empty hrefs are ignored. Hrefs that fail to resolve are counted and
/// dropped; so are resolved URLs the scope guard rejects.
fn discover_links(document: &Html, scope: &ScopeGuard) -> ParsedPage {
    let mut parsed = ParsedPage::default();

    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return parsed;
    };

    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if href.is_empty() {
            continue;
        }

        let absolute = match scope.origin().resolve(href) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Dropping malformed link {:?}: {}", href, e);
                parsed.malformed += 1;
                continue;
            }
        };

        if scope.allows(absolute.as_str()) {
            parsed.links.push(absolute.to_string());
        } else {
            tracing::trace!("Dropping out-of-scope link {}", absolute);
            parsed.out_of_scope += 1;
        }
    }

    parsed
}

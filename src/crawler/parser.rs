//! HTML parser for extracting page records and links
//!
//! This module turns raw page content into:
//! - The page title (first `<title>` element, trimmed)
//! - A short excerpt (text of the first few `<p>` blocks)
//! - Outbound links, resolved against the page address
//!
//! Parsing never fails. Malformed markup yields whatever html5ever could
//! recover; absent content yields an empty page.

use crate::crawler::coordinator::PageRecord;
use crate::crawler::frontier::VisitedSet;
use crate::url::resolve_link;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Number of paragraph blocks joined into the excerpt
pub const EXCERPT_PARAGRAPHS: usize = 5;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPage {
    /// Trimmed text of the first `<title>`, empty if none
    pub title: String,

    /// First paragraphs joined by single spaces, empty if none
    pub excerpt: String,

    /// Unique absolute links in document order
    pub links: Vec<Url>,
}

impl ParsedPage {
    /// The (title, excerpt) pair stored in the result cache
    pub fn record(&self) -> PageRecord {
        PageRecord {
            title: self.title.clone(),
            excerpt: self.excerpt.clone(),
        }
    }

    /// Drops links that have been visited since this page was parsed
    pub fn retain_unvisited(&mut self, visited: &VisitedSet) {
        self.links.retain(|link| !visited.contains(link));
    }
}

/// Parses fetched content, skipping links that are already visited
///
/// # Arguments
///
/// * `content` - The page body, or `None` if the fetch failed
/// * `base_url` - The page's own address, used to resolve relative links
/// * `visited` - Addresses to leave out of the link set
///
/// # Example
///
/// ```
/// use sumi_skim::crawler::{parse_page, VisitedSet};
/// use url::Url;
///
/// let html = r#"<html><head><title>Home</title></head>
///     <body><p>Hello</p><a href="/about">About</a></body></html>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let page = parse_page(Some(html), &base, &VisitedSet::new());
///
/// assert_eq!(page.title, "Home");
/// assert_eq!(page.excerpt, "Hello");
/// assert_eq!(page.links[0].as_str(), "https://example.com/about");
/// ```
pub fn parse_page(content: Option<&str>, base_url: &Url, visited: &VisitedSet) -> ParsedPage {
    let mut page = match content {
        Some(html) => parse_html(html, base_url),
        None => return ParsedPage::default(),
    };
    page.retain_unvisited(visited);
    page
}

/// Parses HTML content into title, excerpt and every valid link
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        excerpt: extract_excerpt(&document),
        links: extract_links(&document, base_url),
    }
}

fn extract_title(document: &Html) -> String {
    let Ok(title_selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn extract_excerpt(document: &Html) -> String {
    let Ok(paragraph_selector) = Selector::parse("p") else {
        return String::new();
    };

    document
        .select(&paragraph_selector)
        .take(EXCERPT_PARAGRAPHS)
        .map(|element| element.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

//! Directory page extraction (athlete letters, nations, sports)

use super::{select_all, spaced_text, text_of};
use scraper::Html;
use url::Url;

/// Which listing a directory page is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    /// `/olympic-athletes/{letter}`
    Athlete,
    /// `/nations`
    Nation,
    /// `/olympic-sports`
    Sport,
}

impl DirectoryKind {
    /// Selector for the visible cards linking to entity pages
    fn card_selector(self) -> &'static str {
        match self {
            DirectoryKind::Athlete => "a.card.athlet.visible[href]",
            DirectoryKind::Nation => "a.card.nation.visible[href]",
            DirectoryKind::Sport => "a.card.sport.visible[href]",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DirectoryKind::Athlete => "athletes",
            DirectoryKind::Nation => "nations",
            DirectoryKind::Sport => "sports",
        }
    }
}

/// One card of a directory page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Display name (`div.bez`, or the card text)
    pub name: String,

    /// Absolute URL of the linked page
    pub url: String,
}

/// Lists the (name, absolute URL) pairs of a directory page
///
/// Cards whose `href` cannot be resolved to an http(s) URL are skipped.
///
/// # Example
///
/// ```
/// use podium::extract::{extract_directory, DirectoryKind};
/// use scraper::Html;
/// use url::Url;
///
/// let html = Html::parse_document(
///     r#"<a class="card sport visible" href="/olympic-sports/judo"><div class="bez">Judo</div></a>"#,
/// );
/// let base = Url::parse("https://olympics-statistics.com").unwrap();
/// let sports = extract_directory(&html, DirectoryKind::Sport, &base);
/// assert_eq!(sports[0].name, "Judo");
/// assert_eq!(sports[0].url, "https://olympics-statistics.com/olympic-sports/judo");
/// ```
pub fn extract_directory(document: &Html, kind: DirectoryKind, base_url: &Url) -> Vec<DirectoryEntry> {
    let mut entries = Vec::new();

    for card in select_all(document.root_element(), kind.card_selector()) {
        let Some(url) = card.value().attr("href").and_then(|href| resolve_link(href, base_url))
        else {
            continue;
        };

        let name = text_of(card, "div.bez").unwrap_or_else(|| spaced_text(card));

        entries.push(DirectoryEntry { name, url });
    }

    entries
}

/// Resolves a card href to an absolute http(s) URL
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url.to_string())
    } else {
        None
    }
}

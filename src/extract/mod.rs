//! HTML extraction for the pages of olympics-statistics.com
//!
//! Every function here is pure: it takes a parsed document and returns
//! whatever it can find. Missing markup never raises; optional fields come
//! back as `None`, counts as zero, and incomplete blocks are skipped.

mod athlete;
mod directory;
mod summary;

pub use athlete::extract_athlete;
pub use directory::{extract_directory, DirectoryEntry, DirectoryKind};
pub use summary::{extract_nation_totals, extract_sport_table};

use scraper::{ElementRef, Selector};

/// First element under `scope` matching `css`
fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

/// All elements under `scope` matching `css`
fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Text content with each text node trimmed and the pieces concatenated
///
/// Inline markup inside a field does not introduce spaces:
/// `Jean-<b>Paul</b>` reads as `Jean-Paul`.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Text content with each text node trimmed, joined by single spaces
///
/// Used for card labels whose parts sit in separate block elements.
fn spaced_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Non-empty text of the first match of `css` under `scope`
fn text_of(scope: ElementRef<'_>, css: &str) -> Option<String> {
    select_first(scope, css)
        .map(element_text)
        .filter(|s| !s.is_empty())
}

/// Non-empty, trimmed attribute value
fn attr_text(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

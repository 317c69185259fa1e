//! Medal summary extraction for nation and sport pages
//!
//! Both pages show a `div.the-medal[data-medal]` marker per color with the
//! count in an adjacent `span.mal`. A count that is missing or not a number
//! reads as zero.

use super::{attr_text, element_text, select_all, select_first};
use crate::aggregate::{MedalTally, MedalType};
use scraper::{ElementRef, Html};

/// Reads a nation's gold/silver/bronze totals from its `div.rnd.teaser`
///
/// A page without the teaser yields an all-zero tally.
pub fn extract_nation_totals(document: &Html) -> MedalTally {
    match select_first(document.root_element(), "div.rnd.teaser") {
        Some(teaser) => read_counts(teaser, "div.the-medal"),
        None => {
            tracing::debug!("Nation page has no medal teaser");
            MedalTally::zero()
        }
    }
}

/// Reads the per-country medal table of a sport page
///
/// Rows come from `div.card.nation.visible` cards inside
/// `div.top[data-which="n"]`; cards without a country flag are skipped.
pub fn extract_sport_table(document: &Html) -> Vec<(String, MedalTally)> {
    let Some(container) = select_first(document.root_element(), r#"div.top[data-which="n"]"#)
    else {
        tracing::debug!("Sport page has no nation table");
        return Vec::new();
    };

    select_all(container, "div.card.nation.visible")
        .into_iter()
        .filter_map(|card| {
            let country = select_first(card, "img.f").and_then(|img| attr_text(img, "title"))?;
            Some((country, read_counts(card, "div.medals div.the-medal")))
        })
        .collect()
}

/// Collects the count next to each medal marker matching `marker_css`
fn read_counts(scope: ElementRef<'_>, marker_css: &str) -> MedalTally {
    let mut tally = MedalTally::zero();

    for marker in select_all(scope, marker_css) {
        let medal = MedalType::from_code(marker.value().attr("data-medal").unwrap_or_default());
        if medal.is_counted() {
            tally.set(medal, adjacent_count(marker));
        }
    }

    tally
}

/// Finds the `span.mal` label belonging to a medal marker
///
/// A marker alone in its block reads the first label anywhere in that block.
/// Markers sharing a parent pair with its labels by position; if some label
/// is missing, a marker takes the label following it up to the next marker.
fn adjacent_count(marker: ElementRef<'_>) -> u32 {
    let Some(parent) = marker.parent().and_then(ElementRef::wrap) else {
        return 0;
    };

    let siblings: Vec<ElementRef<'_>> = parent.children().filter_map(ElementRef::wrap).collect();
    let markers: Vec<ElementRef<'_>> = siblings.iter().copied().filter(is_marker).collect();
    let labels: Vec<ElementRef<'_>> = siblings.iter().copied().filter(is_count_label).collect();

    let label = if markers.len() <= 1 {
        select_first(parent, "span.mal")
    } else if markers.len() == labels.len() {
        markers
            .iter()
            .position(|m| m.id() == marker.id())
            .map(|index| labels[index])
    } else {
        marker
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take_while(|e| !is_marker(e))
            .find(is_count_label)
    };

    label.map(|l| parse_count(&element_text(l))).unwrap_or(0)
}

fn is_marker(element: &ElementRef<'_>) -> bool {
    element.value().name() == "div" && element.value().classes().any(|c| c == "the-medal")
}

fn is_count_label(element: &ElementRef<'_>) -> bool {
    element.value().name() == "span" && element.value().classes().any(|c| c == "mal")
}

/// Parses a count label, tolerating thousands separators
fn parse_count(text: &str) -> u32 {
    let digits: String = text
        .chars()
        .filter(|c| !matches!(c, ',' | '.' | '\'' | ' ' | '\u{a0}' | '\u{202f}'))
        .collect();

    digits.parse().unwrap_or(0)
}

//! Athlete page extraction

use super::{attr_text, select_all, select_first, text_of};
use crate::aggregate::{AthleteName, AthleteRecord, MedalEntry, MedalType};
use scraper::{ElementRef, Html};

/// Extracts name, country, and medal list from an athlete page
///
/// # Page Layout
///
/// | Field | Selector |
/// |-------|----------|
/// | First name | `div.vn` |
/// | Last name | `div.nn` |
/// | Country | `title` of `div.legende img` |
/// | Medal blocks | `div.top.m div.medaille.visible` |
///
/// Within a medal block: `div.the-medal[data-medal]` (color code),
/// `div.m-sport`, `img.f[title]` (country), and an optional `a.m-event`
/// holding `div.m-eventname`, `div.m-event-am` (date), `div.m-event-stadt`
/// (place).
///
/// # Example
///
/// ```
/// use podium::extract::extract_athlete;
/// use scraper::Html;
///
/// let html = Html::parse_document(r#"<div class="vn">Teddy</div><div class="nn">Riner</div>"#);
/// let athlete = extract_athlete(&html);
/// assert_eq!(athlete.name.last.as_deref(), Some("Riner"));
/// assert!(athlete.medals.is_empty());
/// ```
pub fn extract_athlete(document: &Html) -> AthleteRecord {
    let root = document.root_element();

    let name = AthleteName {
        first: text_of(root, "div.vn"),
        last: text_of(root, "div.nn"),
    };

    let country = select_first(root, "div.legende img").and_then(|img| attr_text(img, "title"));

    let medals = select_all(root, "div.top.m div.medaille.visible")
        .into_iter()
        .filter_map(extract_medal)
        .collect();

    AthleteRecord {
        name,
        country,
        medals,
    }
}

/// Reads one medal block; blocks without a country flag or sport are skipped
fn extract_medal(block: ElementRef<'_>) -> Option<MedalEntry> {
    let medal = select_first(block, "div.the-medal")
        .and_then(|marker| marker.value().attr("data-medal"))
        .map(MedalType::from_code)
        .unwrap_or(MedalType::Unknown);

    let Some(country) = select_first(block, "img.f").and_then(|img| attr_text(img, "title")) else {
        tracing::debug!("Skipping medal block without country flag");
        return None;
    };

    let Some(sport) = text_of(block, "div.m-sport") else {
        tracing::debug!("Skipping medal block without sport for {}", country);
        return None;
    };

    let (event, date, place) = match select_first(block, "a.m-event") {
        Some(link) => (
            text_of(link, "div.m-eventname"),
            text_of(link, "div.m-event-am"),
            text_of(link, "div.m-event-stadt"),
        ),
        None => (None, None, None),
    };

    Some(MedalEntry {
        medal,
        sport,
        event,
        date,
        place,
        country,
    })
}

use crate::aggregate::medal::MedalTally;
use crate::aggregate::record::{AthleteRecord, MedalEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// country -> tally
pub type CountryTallies = BTreeMap<String, MedalTally>;

/// country -> sport -> tally
pub type CountrySportTallies = BTreeMap<String, BTreeMap<String, MedalTally>>;

/// Running medal counts built from athlete records
///
/// Folding is a pure sum over medal entries, so the result does not depend on
/// the order records arrive in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tallies {
    by_country: CountryTallies,
    by_country_and_sport: CountrySportTallies,
}

impl Tallies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every counted medal of `record` to both tallies
    pub fn fold(&mut self, record: &AthleteRecord) {
        for entry in &record.medals {
            self.fold_entry(entry);
        }
    }

    /// Adds one medal entry; entries of unknown color are not counted
    pub fn fold_entry(&mut self, entry: &MedalEntry) {
        if !entry.medal.is_counted() {
            return;
        }

        self.by_country
            .entry(entry.country.clone())
            .or_insert_with(MedalTally::zero)
            .record(entry.medal);

        self.by_country_and_sport
            .entry(entry.country.clone())
            .or_insert_with(BTreeMap::new)
            .entry(entry.sport.clone())
            .or_insert_with(MedalTally::zero)
            .record(entry.medal);
    }

    pub fn by_country(&self) -> &CountryTallies {
        &self.by_country
    }

    pub fn by_country_and_sport(&self) -> &CountrySportTallies {
        &self.by_country_and_sport
    }

    /// Sum of a country's per-sport rows
    ///
    /// Always equal to the country's entry in `by_country`.
    pub fn sport_sum(&self, country: &str) -> MedalTally {
        let mut sum = MedalTally::zero();
        if let Some(sports) = self.by_country_and_sport.get(country) {
            for tally in sports.values() {
                sum += *tally;
            }
        }
        sum
    }

    /// Finishes aggregation, pairing the tallies with the athlete list
    pub fn into_output(self, athletes: Vec<AthleteRecord>) -> AggregateOutput {
        AggregateOutput {
            athletes,
            by_country: self.by_country,
            by_country_and_sport: self.by_country_and_sport,
        }
    }
}

/// Result of the athletes mode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateOutput {
    pub athletes: Vec<AthleteRecord>,
    pub by_country: CountryTallies,
    pub by_country_and_sport: CountrySportTallies,
}

/// Result of the sports mode: country -> sport -> medal table row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SportTable {
    rows: CountrySportTallies,
}

impl SportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores one country's row for a sport, replacing any earlier row
    pub fn insert(&mut self, country: &str, sport: &str, tally: MedalTally) {
        self.rows
            .entry(country.to_string())
            .or_insert_with(BTreeMap::new)
            .insert(sport.to_string(), tally);
    }

    pub fn get(&self, country: &str, sport: &str) -> Option<&MedalTally> {
        self.rows.get(country).and_then(|sports| sports.get(sport))
    }

    pub fn country_count(&self) -> usize {
        self.rows.len()
    }
}

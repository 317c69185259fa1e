//! Medal records and their aggregation
//!
//! Extraction produces `AthleteRecord`s; the collector folds them into
//! `Tallies`, which are serialized as the athletes-mode `AggregateOutput`.
//! The nations and sports modes produce `NationTotals` and `SportTable`.

mod medal;
mod record;
mod tallies;

pub use medal::{MedalTally, MedalType};
pub use record::{AthleteName, AthleteRecord, MedalEntry, NationTotals};
pub use tallies::{AggregateOutput, CountrySportTallies, CountryTallies, SportTable, Tallies};

use crate::aggregate::medal::{MedalTally, MedalType};
use serde::{Deserialize, Serialize};

/// Athlete name as split on the site; either part may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteName {
    pub first: Option<String>,
    pub last: Option<String>,
}

/// One medal listed on an athlete page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalEntry {
    #[serde(rename = "type")]
    pub medal: MedalType,
    pub sport: String,
    pub event: Option<String>,
    pub date: Option<String>,
    pub place: Option<String>,
    pub country: String,
}

/// Everything extracted from one athlete page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteRecord {
    pub name: AthleteName,
    pub country: Option<String>,
    pub medals: Vec<MedalEntry>,
}

/// Medal totals of one nation, as written by the nations mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NationTotals {
    pub country: String,
    #[serde(flatten)]
    pub medals: MedalTally,
}

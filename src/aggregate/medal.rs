use serde::{Deserialize, Serialize};

/// Medal color as shown on the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedalType {
    Gold,
    Silver,
    Bronze,
    Unknown,
}

impl MedalType {
    /// Maps the site's `data-medal` code to a color
    ///
    /// `"1"`, `"2"` and `"3"` are gold, silver and bronze; anything else is
    /// `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1" => MedalType::Gold,
            "2" => MedalType::Silver,
            "3" => MedalType::Bronze,
            _ => MedalType::Unknown,
        }
    }

    /// Whether this medal counts toward a color tally
    pub fn is_counted(self) -> bool {
        !matches!(self, MedalType::Unknown)
    }
}

/// Gold/silver/bronze counts for one key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalTally {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

impl MedalTally {
    /// An empty tally
    pub const fn zero() -> Self {
        Self {
            gold: 0,
            silver: 0,
            bronze: 0,
        }
    }

    pub const fn new(gold: u32, silver: u32, bronze: u32) -> Self {
        Self {
            gold,
            silver,
            bronze,
        }
    }

    /// Adds one medal of the given color; `Unknown` is ignored
    pub fn record(&mut self, medal: MedalType) {
        match medal {
            MedalType::Gold => self.gold += 1,
            MedalType::Silver => self.silver += 1,
            MedalType::Bronze => self.bronze += 1,
            MedalType::Unknown => {}
        }
    }

    /// Overwrites the count for one color; `Unknown` is ignored
    pub fn set(&mut self, medal: MedalType, count: u32) {
        match medal {
            MedalType::Gold => self.gold = count,
            MedalType::Silver => self.silver = count,
            MedalType::Bronze => self.bronze = count,
            MedalType::Unknown => {}
        }
    }

    pub fn total(&self) -> u32 {
        self.gold + self.silver + self.bronze
    }
}

impl std::ops::AddAssign for MedalTally {
    fn add_assign(&mut self, other: Self) {
        self.gold += other.gold;
        self.silver += other.silver;
        self.bronze += other.bronze;
    }
}

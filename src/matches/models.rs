use serde::{Deserialize, Serialize};

/// Sport a match is filed under.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    #[default]
    Football,
    Hockey,
    Basket,
    Esports,
}

impl Sport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Football => "football",
            Self::Hockey => "hockey",
            Self::Basket => "basket",
            Self::Esports => "esports",
        }
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized row of the odds sheet.
///
/// Odds stay as text: whatever the sheet holds is passed through, with
/// `"0.00"` standing in for a blank cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub sport: Sport,
    pub league: String,
    pub id: String,
    pub date: String,
    pub time: String,
    pub team1: String,
    pub team2: String,
    pub p1: String,
    pub x: String,
    pub p2: String,
    pub p1x: String,
    pub p12: String,
    pub px2: String,
}

impl MatchRecord {
    /// Main market odds (home win, draw, away win).
    pub fn main_odds(&self) -> [&str; 3] {
        [&self.p1, &self.x, &self.p2]
    }

    /// Double-chance odds (1X, 12, X2).
    pub fn double_chance_odds(&self) -> [&str; 3] {
        [&self.p1x, &self.p12, &self.px2]
    }
}

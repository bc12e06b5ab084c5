use std::fmt;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TournamentId(pub i64);

impl From<i64> for PlayerId {
    fn from(id: i64) -> Self {
        PlayerId(id)
    }
}

impl From<i64> for TournamentId {
    fn from(id: i64) -> Self {
        TournamentId(id)
    }
}

/// Court surface. Spellings other than the four canonical ones, including
/// other letter cases, are kept verbatim as `Other` and never normalised.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Surface {
    Hard,
    Clay,
    Grass,
    Carpet,
    Other(String),
}

impl Surface {
    /// Surfaces broken out in player career stats.
    pub const BREAKDOWN: [Surface; 3] = [Surface::Hard, Surface::Clay, Surface::Grass];

    pub fn parse(value: &str) -> Self {
        match value {
            "Hard" => Surface::Hard,
            "Clay" => Surface::Clay,
            "Grass" => Surface::Grass,
            "Carpet" => Surface::Carpet,
            _ => Surface::Other(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Surface::Hard => "Hard",
            Surface::Clay => "Clay",
            Surface::Grass => "Grass",
            Surface::Carpet => "Carpet",
            Surface::Other(name) => name,
        }
    }
}

impl From<String> for Surface {
    fn from(value: String) -> Self {
        Surface::parse(&value)
    }
}

impl From<Surface> for String {
    fn from(surface: Surface) -> Self {
        surface.as_str().to_string()
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: PlayerId,
    pub player_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub tournament_id: TournamentId,
    #[serde(alias = "Tournament")]
    pub tournament_name: String,
    #[serde(alias = "Surface", default)]
    pub surface: Option<Surface>,
    #[serde(alias = "Series", default)]
    pub series: String,
}

/// `(year, month)` taken from a fact partition's directory path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartitionKey {
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "year={}/month={:02}", self.year, self.month)
    }
}

/// One row of a fact partition as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRow {
    pub p1_id: PlayerId,
    pub p2_id: PlayerId,
    pub winner_id: PlayerId,
    pub tournament_id: TournamentId,
    #[serde(alias = "Date", deserialize_with = "deserialize_day")]
    pub date: NaiveDate,
    #[serde(alias = "Round", default)]
    pub round: String,
    #[serde(alias = "Score", default)]
    pub score: String,
}

/// A fact row stamped with the partition it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub row: FactRow,
    pub partition: PartitionKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WinnerSide {
    P1,
    P2,
    /// `winner_id` names neither participant.
    Unattributed,
}

impl WinnerSide {
    pub fn of(row: &FactRow) -> Self {
        if row.winner_id == row.p1_id {
            WinnerSide::P1
        } else if row.winner_id == row.p2_id {
            WinnerSide::P2
        } else {
            WinnerSide::Unattributed
        }
    }
}

/// A match with dimension attributes copied in. `None` marks a missed lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedMatch {
    pub p1_id: PlayerId,
    pub p2_id: PlayerId,
    pub winner_id: PlayerId,
    pub tournament_id: TournamentId,
    pub date: NaiveDate,
    pub round: String,
    pub score: String,
    pub partition: PartitionKey,

    pub p1_name: Option<String>,
    pub p2_name: Option<String>,
    pub winner_name: Option<String>,
    pub tournament_name: Option<String>,
    pub surface: Option<Surface>,
    pub series: Option<String>,

    pub winner_side: WinnerSide,
}

impl EnrichedMatch {
    /// Whether `player` won this match. `None` when the player did not take
    /// part or the winner cannot be attributed to either side.
    pub fn outcome_for(&self, player: PlayerId) -> Option<bool> {
        let side = if self.p1_id == player {
            WinnerSide::P1
        } else if self.p2_id == player {
            WinnerSide::P2
        } else {
            return None;
        };

        match self.winner_side {
            WinnerSide::Unattributed => None,
            winner => Some(winner == side),
        }
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.p1_id == player || self.p2_id == player
    }

    /// Calendar-day rendering used in responses.
    pub fn day(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Accepts `YYYY-MM-DD` or any ISO datetime that starts with one.
fn deserialize_day<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let day = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| serde::de::Error::custom(format!("invalid date '{}': {}", raw, e)))
}

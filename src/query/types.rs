use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::core::types::Surface;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerList {
    pub count: usize,
    pub total: usize,
    pub players: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerRecord {
    pub total_matches: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    /// Matches whose recorded winner is neither participant. Kept out of
    /// every other count.
    #[serde(skip_serializing_if = "is_zero")]
    pub unattributed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceRecord {
    pub matches: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub player: String,
    pub career: CareerRecord,
    /// Keyed by lowercase surface name; surfaces without matches are absent.
    pub by_surface: BTreeMap<String, SurfaceRecord>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeadToHeadRecord {
    pub p1_wins: usize,
    pub p2_wins: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentMatch {
    pub date: String,
    pub tournament: Option<String>,
    pub round: String,
    pub surface: Option<Surface>,
    pub winner_name: Option<String>,
    pub score: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHead {
    pub player_1: String,
    pub player_2: String,
    pub head_to_head: HeadToHeadRecord,
    pub recent_matches: Vec<RecentMatch>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TournamentSummary {
    pub name: String,
    pub series: String,
    pub surface: Option<Surface>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TournamentList {
    pub count: usize,
    pub total: usize,
    pub tournaments: Vec<TournamentSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionRecord {
    /// Day of the final, `YYYY-MM-DD`.
    pub year: String,
    pub champion: Option<String>,
    pub score: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TournamentDetails {
    pub tournament: String,
    pub surface: Option<Surface>,
    pub series: Option<String>,
    pub total_matches: usize,
    pub recent_champions: Vec<ChampionRecord>,
    pub generated_at: DateTime<Utc>,
}

/// `wins / total * 100`, rounded to one decimal with ties to even.
pub fn win_rate(wins: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = wins as f64 / total as f64 * 100.0;
    (percent * 10.0).round_ties_even() / 10.0
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

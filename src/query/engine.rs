use std::collections::BTreeMap;
use chrono::Utc;
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::types::{EnrichedMatch, Surface};
use crate::mvcc::snapshot::Snapshot;
use crate::query::types::{
    win_rate, CareerRecord, ChampionRecord, HeadToHead, HeadToHeadRecord, PlayerList, PlayerStats,
    RecentMatch, SurfaceRecord, TournamentDetails, TournamentList, TournamentSummary,
};
use crate::search::resolver::{contains_ignore_case, name_matches, NameResolver};

/// Read-only queries over one snapshot.
pub struct QueryEngine<'a> {
    snapshot: &'a Snapshot,
    default_limit: usize,
    recent_limit: usize,
    final_round_label: &'a str,
}

#[derive(Default)]
struct Tally {
    wins: usize,
    losses: usize,
    unattributed: usize,
}

impl Tally {
    fn add(&mut self, outcome: Option<bool>) {
        match outcome {
            Some(true) => self.wins += 1,
            Some(false) => self.losses += 1,
            None => self.unattributed += 1,
        }
    }

    fn decided(&self) -> usize {
        self.wins + self.losses
    }
}

impl<'a> QueryEngine<'a> {
    pub fn new(snapshot: &'a Snapshot, config: &'a Config) -> Self {
        QueryEngine {
            snapshot,
            default_limit: config.default_limit,
            recent_limit: config.recent_limit,
            final_round_label: &config.final_round_label,
        }
    }

    pub fn list_players(&self, query: Option<&str>, limit: Option<usize>) -> PlayerList {
        let limit = limit.unwrap_or(self.default_limit);
        let players: Vec<&str> = self
            .snapshot
            .dims
            .players()
            .iter()
            .map(|p| p.player_name.as_str())
            .filter(|name| match query {
                Some(q) if !q.is_empty() => contains_ignore_case(name, q),
                _ => true,
            })
            .collect();

        let page: Vec<String> = players.iter().take(limit).map(|n| n.to_string()).collect();
        PlayerList {
            count: page.len(),
            total: players.len(),
            players: page,
        }
    }

    pub fn player_stats(&self, name: &str) -> Result<PlayerStats> {
        let candidates = self
            .snapshot
            .dims
            .players()
            .iter()
            .map(|p| (p.player_id, p.player_name.as_str()));
        let Some((player_id, player_name)) = NameResolver::new(name).resolve(candidates) else {
            return Err(Error::not_found(format!("Player '{}' not found", name)));
        };

        let mut career = Tally::default();
        let mut surfaces: [Tally; 3] = Default::default();
        let mut played = 0usize;

        for m in self.snapshot.matches.iter().filter(|m| m.involves(player_id)) {
            played += 1;
            let outcome = m.outcome_for(player_id);
            career.add(outcome);
            if outcome.is_none() {
                continue;
            }
            if let Some(slot) = m
                .surface
                .as_ref()
                .and_then(|s| Surface::BREAKDOWN.iter().position(|b| b == s))
            {
                surfaces[slot].add(outcome);
            }
        }

        if played == 0 {
            return Err(Error::not_found(format!("No matches found for player '{}'", player_name)));
        }

        let by_surface = Surface::BREAKDOWN
            .iter()
            .zip(surfaces.iter())
            .filter(|(_, tally)| tally.decided() > 0)
            .map(|(surface, tally)| {
                (
                    surface.as_str().to_lowercase(),
                    SurfaceRecord {
                        matches: tally.decided(),
                        wins: tally.wins,
                        losses: tally.losses,
                        win_rate: win_rate(tally.wins, tally.decided()),
                    },
                )
            })
            .collect::<BTreeMap<_, _>>();

        Ok(PlayerStats {
            player: player_name.to_string(),
            career: CareerRecord {
                total_matches: career.decided(),
                wins: career.wins,
                losses: career.losses,
                win_rate: win_rate(career.wins, career.decided()),
                unattributed: career.unattributed,
            },
            by_surface,
            generated_at: Utc::now(),
        })
    }

    pub fn head_to_head(&self, player_a: &str, player_b: &str) -> Result<HeadToHead> {
        let mut h2h: Vec<&EnrichedMatch> = self
            .snapshot
            .matches
            .iter()
            .filter(|m| {
                let p1 = m.p1_name.as_deref();
                let p2 = m.p2_name.as_deref();
                (name_matches(p1, player_a) && name_matches(p2, player_b))
                    || (name_matches(p1, player_b) && name_matches(p2, player_a))
            })
            .collect();

        let Some(latest) = latest_first(&mut h2h) else {
            return Err(Error::not_found(format!(
                "No head-to-head matches found for '{}' and '{}'",
                player_a, player_b
            )));
        };

        // Canonical names come from the latest meeting, positionally.
        let player_1 = latest.p1_name.clone().unwrap_or_default();
        let player_2 = latest.p2_name.clone().unwrap_or_default();
        let won_by = |name: &str| {
            h2h.iter()
                .filter(|m| m.winner_name.as_deref() == Some(name))
                .count()
        };

        let record = HeadToHeadRecord {
            p1_wins: won_by(&player_1),
            p2_wins: won_by(&player_2),
            total: h2h.len(),
        };

        let recent_matches = h2h
            .iter()
            .take(self.recent_limit)
            .map(|m| RecentMatch {
                date: m.day(),
                tournament: m.tournament_name.clone(),
                round: m.round.clone(),
                surface: m.surface.clone(),
                winner_name: m.winner_name.clone(),
                score: m.score.clone(),
            })
            .collect();

        Ok(HeadToHead {
            player_1,
            player_2,
            head_to_head: record,
            recent_matches,
            generated_at: Utc::now(),
        })
    }

    pub fn list_tournaments(&self, surface: Option<&str>, limit: Option<usize>) -> TournamentList {
        let limit = limit.unwrap_or(self.default_limit);
        let tournaments: Vec<_> = self
            .snapshot
            .dims
            .tournaments()
            .iter()
            .filter(|t| match surface {
                Some(wanted) if !wanted.is_empty() => t
                    .surface
                    .as_ref()
                    .is_some_and(|s| s.as_str().eq_ignore_ascii_case(wanted)),
                _ => true,
            })
            .collect();

        let page: Vec<TournamentSummary> = tournaments
            .iter()
            .take(limit)
            .map(|t| TournamentSummary {
                name: t.tournament_name.clone(),
                series: t.series.clone(),
                surface: t.surface.clone(),
            })
            .collect();

        TournamentList {
            count: page.len(),
            total: tournaments.len(),
            tournaments: page,
        }
    }

    pub fn tournament_details(&self, name: &str) -> Result<TournamentDetails> {
        let matches: Vec<&EnrichedMatch> = self
            .snapshot
            .matches
            .iter()
            .filter(|m| name_matches(m.tournament_name.as_deref(), name))
            .collect();

        // First matching row describes the tournament, consistent or not.
        let Some(first) = matches.first() else {
            return Err(Error::not_found(format!("Tournament '{}' not found", name)));
        };

        let mut finals: Vec<&EnrichedMatch> = matches
            .iter()
            .copied()
            .filter(|m| m.round == self.final_round_label)
            .collect();
        latest_first(&mut finals);

        let recent_champions = finals
            .iter()
            .take(self.recent_limit)
            .map(|m| ChampionRecord {
                year: m.day(),
                champion: m.winner_name.clone(),
                score: m.score.clone(),
            })
            .collect();

        Ok(TournamentDetails {
            tournament: first.tournament_name.clone().unwrap_or_default(),
            surface: first.surface.clone(),
            series: first.series.clone(),
            total_matches: matches.len(),
            recent_champions,
            generated_at: Utc::now(),
        })
    }
}

/// Stable sort, newest first. Returns the newest row.
fn latest_first<'m>(rows: &mut [&'m EnrichedMatch]) -> Option<&'m EnrichedMatch> {
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows.first().copied()
}

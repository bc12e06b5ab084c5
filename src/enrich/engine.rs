use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};
use crate::core::types::{EnrichedMatch, MatchRecord, PlayerId, WinnerSide};
use crate::index::dimension::DimensionStore;

/// Unmatched dimension keys seen while enriching. These never drop a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentReport {
    pub rows: usize,
    pub missing_p1: usize,
    pub missing_p2: usize,
    pub missing_winner: usize,
    pub missing_tournament: usize,
    /// Rows whose `winner_id` is neither participant.
    pub unattributed_winners: usize,
}

impl EnrichmentReport {
    pub fn unmatched_keys(&self) -> usize {
        self.missing_p1 + self.missing_p2 + self.missing_winner + self.missing_tournament
    }

    pub fn is_complete(&self) -> bool {
        self.unmatched_keys() == 0 && self.unattributed_winners == 0
    }

    fn record(&mut self, row: &EnrichedMatch) {
        self.rows += 1;
        self.missing_p1 += row.p1_name.is_none() as usize;
        self.missing_p2 += row.p2_name.is_none() as usize;
        self.missing_winner += row.winner_name.is_none() as usize;
        self.missing_tournament += row.tournament_name.is_none() as usize;
        self.unattributed_winners += (row.winner_side == WinnerSide::Unattributed) as usize;
    }
}

/// Left-joins every match against the dimensions: one output row per input row.
pub fn enrich(matches: &[MatchRecord], dims: &DimensionStore) -> (Vec<EnrichedMatch>, EnrichmentReport) {
    let enriched: Vec<EnrichedMatch> = matches
        .par_iter()
        .map(|record| enrich_one(record, dims))
        .collect();

    let mut report = EnrichmentReport::default();
    for row in &enriched {
        report.record(row);
    }

    if report.unmatched_keys() > 0 {
        warn!(
            missing_p1 = report.missing_p1,
            missing_p2 = report.missing_p2,
            missing_winner = report.missing_winner,
            missing_tournament = report.missing_tournament,
            "fact rows reference unknown dimension ids"
        );
    }
    if report.unattributed_winners > 0 {
        warn!(rows = report.unattributed_winners, "winner_id matches neither participant");
    }
    info!(rows = report.rows, "enriched matches");

    (enriched, report)
}

pub fn enrich_one(record: &MatchRecord, dims: &DimensionStore) -> EnrichedMatch {
    let row = &record.row;
    let name = |id: PlayerId| dims.lookup_player(id).map(|p| p.player_name.clone());
    let tournament = dims.lookup_tournament(row.tournament_id);

    EnrichedMatch {
        p1_id: row.p1_id,
        p2_id: row.p2_id,
        winner_id: row.winner_id,
        tournament_id: row.tournament_id,
        date: row.date,
        round: row.round.clone(),
        score: row.score.clone(),
        partition: record.partition,

        p1_name: name(row.p1_id),
        p2_name: name(row.p2_id),
        winner_name: name(row.winner_id),
        tournament_name: tournament.map(|t| t.tournament_name.clone()),
        surface: tournament.and_then(|t| t.surface.clone()),
        series: tournament.map(|t| t.series.clone()),

        winner_side: WinnerSide::of(row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::core::types::{FactRow, PartitionKey, Player, Surface, Tournament, TournamentId};

    fn record(p1: i64, p2: i64, winner: i64, tournament: i64) -> MatchRecord {
        MatchRecord {
            row: FactRow {
                p1_id: PlayerId(p1),
                p2_id: PlayerId(p2),
                winner_id: PlayerId(winner),
                tournament_id: TournamentId(tournament),
                date: NaiveDate::from_ymd_opt(2019, 6, 9).unwrap(),
                round: "The Final".to_string(),
                score: "6-3 5-7 6-1 6-1".to_string(),
            },
            partition: PartitionKey { year: 2019, month: 6 },
        }
    }

    fn dims() -> DimensionStore {
        DimensionStore::build(
            vec![
                Player { player_id: PlayerId(1), player_name: "Nadal R.".to_string() },
                Player { player_id: PlayerId(2), player_name: "Thiem D.".to_string() },
            ],
            vec![Tournament {
                tournament_id: TournamentId(7),
                tournament_name: "French Open".to_string(),
                surface: Some(Surface::Clay),
                series: "Grand Slam".to_string(),
            }],
        )
    }

    #[test]
    fn copies_dimension_attributes() {
        let (rows, report) = enrich(&[record(1, 2, 1, 7)], &dims());
        let row = &rows[0];
        assert_eq!(row.p1_name.as_deref(), Some("Nadal R."));
        assert_eq!(row.p2_name.as_deref(), Some("Thiem D."));
        assert_eq!(row.winner_name.as_deref(), Some("Nadal R."));
        assert_eq!(row.tournament_name.as_deref(), Some("French Open"));
        assert_eq!(row.surface, Some(Surface::Clay));
        assert_eq!(row.series.as_deref(), Some("Grand Slam"));
        assert_eq!(row.partition, PartitionKey { year: 2019, month: 6 });
        assert!(report.is_complete());
    }

    #[test]
    fn unmatched_keys_keep_the_row() {
        let input = vec![record(1, 2, 1, 7), record(1, 99, 99, 7), record(98, 2, 2, 404), record(1, 2, 5, 7)];
        let (rows, report) = enrich(&input, &dims());

        assert_eq!(rows.len(), input.len());
        assert_eq!(rows[1].p2_name, None);
        assert_eq!(rows[1].winner_name, None);
        assert_eq!(rows[2].p1_name, None);
        assert_eq!(rows[2].tournament_name, None);
        assert_eq!(rows[2].surface, None);
        assert_eq!(rows[3].winner_side, WinnerSide::Unattributed);

        assert_eq!(report.rows, 4);
        assert_eq!(report.missing_p1, 1);
        assert_eq!(report.missing_p2, 1);
        assert_eq!(report.missing_winner, 2);
        assert_eq!(report.missing_tournament, 1);
        assert_eq!(report.unattributed_winners, 1);
    }

    #[test]
    fn empty_input_enriches_to_empty_output() {
        let (rows, report) = enrich(&[], &DimensionStore::default());
        assert!(rows.is_empty());
        assert_eq!(report, EnrichmentReport::default());
    }
}

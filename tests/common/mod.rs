#![allow(dead_code)]

use std::sync::Once;
use chrono::NaiveDate;
use tempfile::TempDir;
use matchpoint::core::config::Config;
use matchpoint::core::types::{FactRow, PartitionKey, Player, PlayerId, Surface, Tournament, TournamentId};
use matchpoint::storage::layout::StorageLayout;
use matchpoint::storage::loader::{LoadReport, LoadedTables};
use matchpoint::storage::table::{write_table, TableFormat};

static INIT: Once = Once::new();

/// Initialize tracing for test binaries. Safe to call multiple times.
pub fn init_tracing() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

pub fn player(id: i64, name: &str) -> Player {
    Player {
        player_id: PlayerId(id),
        player_name: name.to_string(),
    }
}

pub fn tournament(id: i64, name: &str, surface: &str, series: &str) -> Tournament {
    Tournament {
        tournament_id: TournamentId(id),
        tournament_name: name.to_string(),
        surface: Some(Surface::parse(surface)),
        series: series.to_string(),
    }
}

pub fn fact(p1: i64, p2: i64, winner: i64, tournament: i64, date: &str, round: &str, score: &str) -> FactRow {
    FactRow {
        p1_id: PlayerId(p1),
        p2_id: PlayerId(p2),
        winner_id: PlayerId(winner),
        tournament_id: TournamentId(tournament),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        round: round.to_string(),
        score: score.to_string(),
    }
}

/// In-memory tables, partitioned by each row's year and month.
pub fn tables(players: Vec<Player>, tournaments: Vec<Tournament>, facts: Vec<FactRow>) -> LoadedTables {
    use chrono::Datelike;
    use matchpoint::core::types::MatchRecord;

    let matches: Vec<MatchRecord> = facts
        .into_iter()
        .map(|row| {
            let partition = PartitionKey { year: row.date.year(), month: row.date.month() };
            MatchRecord { row, partition }
        })
        .collect();
    let report = LoadReport {
        partitions_loaded: 0,
        partitions_skipped: Vec::new(),
        rows: matches.len(),
        rows_skipped: 0,
    };

    LoadedTables { players, tournaments, matches, report }
}

/// A pipeline output directory staged on disk.
pub struct Fixture {
    pub dir: TempDir,
    pub format: TableFormat,
}

impl Fixture {
    pub fn new(format: TableFormat) -> Self {
        Fixture {
            dir: tempfile::tempdir().unwrap(),
            format,
        }
    }

    pub fn layout(&self) -> StorageLayout {
        StorageLayout::new(self.dir.path().to_path_buf(), self.format)
    }

    pub fn config(&self) -> Config {
        Config {
            table_format: self.format,
            load_workers: 2,
            ..Config::with_data_dir(self.dir.path())
        }
    }

    pub fn players(&self, rows: &[Player]) -> &Self {
        write_table(self.format, &self.layout().players_path(), rows).unwrap();
        self
    }

    pub fn tournaments(&self, rows: &[Tournament]) -> &Self {
        write_table(self.format, &self.layout().tournaments_path(), rows).unwrap();
        self
    }

    pub fn partition(&self, year: i32, month: u32, rows: &[FactRow]) -> &Self {
        let path = self.layout().partition_path(PartitionKey { year, month });
        write_table(self.format, &path, rows).unwrap();
        self
    }

    /// Players, tournaments and matches used by most database tests.
    pub fn standard(format: TableFormat) -> Self {
        let fixture = Fixture::new(format);
        fixture
            .players(&standard_players())
            .tournaments(&standard_tournaments())
            .partition(2019, 6, &[
                fact(1, 2, 1, 10, "2019-06-07", "Semifinals", "6-3 6-4 6-2"),
                fact(1, 3, 1, 10, "2019-06-09", "The Final", "6-3 5-7 6-1 6-1"),
            ])
            .partition(2019, 7, &[
                fact(2, 1, 2, 11, "2019-07-12", "Semifinals", "7-6 1-6 6-3 6-4"),
                fact(2, 4, 4, 11, "2019-07-14", "The Final", "7-6 1-6 7-6 4-6 13-12"),
            ]);
        fixture
    }
}

pub fn standard_players() -> Vec<Player> {
    vec![
        player(1, "Nadal R."),
        player(2, "Federer R."),
        player(3, "Thiem D."),
        player(4, "Djokovic N."),
    ]
}

pub fn standard_tournaments() -> Vec<Tournament> {
    vec![
        tournament(10, "French Open", "Clay", "Grand Slam"),
        tournament(11, "Wimbledon", "Grass", "Grand Slam"),
        tournament(12, "Miami Open", "Hard", "Masters 1000"),
    ]
}

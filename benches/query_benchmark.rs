use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use chrono::{Duration, NaiveDate};
use matchpoint::core::config::Config;
use matchpoint::core::types::{FactRow, MatchRecord, PartitionKey, Player, PlayerId, Surface, Tournament, TournamentId};
use matchpoint::mvcc::snapshot::Snapshot;
use matchpoint::query::engine::QueryEngine;
use matchpoint::storage::loader::{LoadReport, LoadedTables};
use chrono::Datelike;
use rand::Rng;

const SURFACES: [&str; 4] = ["Hard", "Clay", "Grass", "Carpet"];

/// Helper to create a synthetic dataset
fn create_tables(players: i64, tournaments: i64, matches: usize) -> LoadedTables {
    let mut rng = rand::thread_rng();
    let start = NaiveDate::from_ymd_opt(2000, 1, 3).unwrap();

    let player_rows = (0..players)
        .map(|id| Player {
            player_id: PlayerId(id),
            player_name: format!("Player{:04} P.", id),
        })
        .collect();
    let tournament_rows = (0..tournaments)
        .map(|id| Tournament {
            tournament_id: TournamentId(id),
            tournament_name: format!("Open {}", id),
            surface: Some(Surface::parse(SURFACES[id as usize % SURFACES.len()])),
            series: "ATP250".to_string(),
        })
        .collect();

    let records: Vec<MatchRecord> = (0..matches)
        .map(|i| {
            let p1 = rng.gen_range(0..players);
            let p2 = (p1 + rng.gen_range(1..players)) % players;
            let date = start + Duration::days(rng.gen_range(0..8000));
            let row = FactRow {
                p1_id: PlayerId(p1),
                p2_id: PlayerId(p2),
                winner_id: PlayerId(if rng.gen_range(0..2) == 0 { p1 } else { p2 }),
                tournament_id: TournamentId(rng.gen_range(0..tournaments)),
                date,
                round: if i % 31 == 0 { "The Final".to_string() } else { "1st Round".to_string() },
                score: "6-4 6-4".to_string(),
            };
            MatchRecord {
                row,
                partition: PartitionKey { year: date.year(), month: date.month() },
            }
        })
        .collect();

    LoadedTables {
        players: player_rows,
        tournaments: tournament_rows,
        report: LoadReport { rows: records.len(), ..LoadReport::default() },
        matches: records,
    }
}

/// Benchmark snapshot construction (index build + enrichment)
fn bench_snapshot_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_build");

    for matches in [10_000usize, 50_000, 100_000].iter() {
        let tables = create_tables(2_000, 200, *matches);
        group.bench_with_input(BenchmarkId::from_parameter(matches), &tables, |b, tables| {
            b.iter(|| Snapshot::build(black_box(tables.clone())));
        });
    }
    group.finish();
}

/// Benchmark query operations over a built snapshot
fn bench_queries(c: &mut Criterion) {
    let snapshot = Snapshot::build(create_tables(2_000, 200, 100_000));
    let config = Config::default();
    let engine = QueryEngine::new(&snapshot, &config);

    let mut group = c.benchmark_group("queries");

    group.bench_function("player_stats", |b| {
        b.iter(|| engine.player_stats(black_box("player1000")).ok());
    });

    group.bench_function("head_to_head", |b| {
        b.iter(|| engine.head_to_head(black_box("player0001"), black_box("player0002")).ok());
    });

    group.bench_function("tournament_details", |b| {
        b.iter(|| engine.tournament_details(black_box("Open 17")).ok());
    });

    group.bench_function("list_players_search", |b| {
        b.iter(|| engine.list_players(black_box(Some("99")), Some(50)));
    });

    group.finish();
}

criterion_group!(benches, bench_snapshot_build, bench_queries);
criterion_main!(benches);

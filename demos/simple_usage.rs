/// Matchpoint API Demo
///
/// Stages a small pipeline output on disk, loads it and runs every query:
/// - Player roster and career stats
/// - Head-to-head
/// - Tournament roster and champion history
/// - Health and reload

use std::collections::BTreeMap;
use chrono::NaiveDate;
use matchpoint::core::config::Config;
use matchpoint::core::database::Database;
use matchpoint::core::types::{FactRow, PartitionKey, Player, PlayerId, Surface, Tournament, TournamentId};
use matchpoint::storage::layout::StorageLayout;
use matchpoint::storage::table::{write_table, TableFormat};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   Matchpoint - Complete API Demo              ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    // Step 1: Stage a pipeline output
    println!("Step 1: Writing dataset...");
    let dir = tempfile::tempdir()?;
    let layout = StorageLayout::new(dir.path().to_path_buf(), TableFormat::JsonLines);
    write_dataset(&layout)?;
    println!("  Written to {}\n", dir.path().display());

    // Step 2: Load
    println!("Step 2: Loading snapshot...");
    let config = Config {
        table_format: TableFormat::JsonLines,
        ..Config::with_data_dir(dir.path())
    };
    let db = Database::open(config)?;
    let health = db.health();
    println!(
        "  Loaded: {} players, {} tournaments, {} matches ({:?})\n",
        health.data.players, health.data.tournaments, health.data.matches, health.status
    );

    // Step 3: Players
    println!("Step 3: Players...");
    let players = db.list_players(Some("r."), None);
    println!("  'r.': {} of {} -> {:?}", players.count, players.total, players.players);
    match db.player_stats("nadal") {
        Ok(stats) => println!("{}", serde_json::to_string_pretty(&stats)?),
        Err(e) => println!("  player_stats failed: {}", e),
    }
    println!();

    // Step 4: Head-to-head
    println!("Step 4: Head-to-head...");
    match db.head_to_head("federer", "nadal") {
        Ok(h2h) => println!(
            "  {} {} - {} {} ({} meetings)",
            h2h.player_1, h2h.head_to_head.p1_wins, h2h.head_to_head.p2_wins, h2h.player_2, h2h.head_to_head.total
        ),
        Err(e) => println!("  head_to_head failed: {}", e),
    }
    println!();

    // Step 5: Tournaments
    println!("Step 5: Tournaments...");
    let clay = db.list_tournaments(Some("clay"), None);
    println!("  clay: {} tournaments", clay.total);
    match db.tournament_details("french") {
        Ok(details) => {
            for champion in &details.recent_champions {
                println!("  {} {:?} {}", champion.year, champion.champion, champion.score);
            }
        }
        Err(e) => println!("  tournament_details failed: {}", e),
    }
    println!();

    // Step 6: Reload
    println!("Step 6: Reload...");
    let snapshot = db.reload()?;
    println!("  Snapshot version {} with {} matches", snapshot.version, snapshot.match_count());
    match db.dq_report() {
        Ok(report) => println!("  DQ report: {}", report),
        Err(e) => println!("  DQ report: {}", e),
    }

    println!("\nDone!");
    Ok(())
}

fn write_dataset(layout: &StorageLayout) -> Result<(), Box<dyn std::error::Error>> {
    let players = vec![
        Player { player_id: PlayerId(1), player_name: "Nadal R.".to_string() },
        Player { player_id: PlayerId(2), player_name: "Federer R.".to_string() },
        Player { player_id: PlayerId(3), player_name: "Thiem D.".to_string() },
    ];
    let tournaments = vec![
        Tournament {
            tournament_id: TournamentId(10),
            tournament_name: "French Open".to_string(),
            surface: Some(Surface::Clay),
            series: "Grand Slam".to_string(),
        },
        Tournament {
            tournament_id: TournamentId(11),
            tournament_name: "Wimbledon".to_string(),
            surface: Some(Surface::Grass),
            series: "Grand Slam".to_string(),
        },
    ];
    write_table(layout.format, &layout.players_path(), &players)?;
    write_table(layout.format, &layout.tournaments_path(), &tournaments)?;

    let matches = [
        (1, 3, 1, 10, (2018, 6, 10), "The Final", "6-4 6-3 6-2"),
        (1, 3, 1, 10, (2019, 6, 9), "The Final", "6-3 5-7 6-1 6-1"),
        (1, 2, 1, 10, (2019, 6, 7), "Semifinals", "6-3 6-4 6-2"),
        (2, 1, 2, 11, (2019, 7, 12), "Semifinals", "7-6 1-6 6-3 6-4"),
    ];

    let mut partitions: BTreeMap<PartitionKey, Vec<FactRow>> = BTreeMap::new();
    for (p1, p2, winner, tournament, (year, month, day), round, score) in matches {
        let row = FactRow {
            p1_id: PlayerId(p1),
            p2_id: PlayerId(p2),
            winner_id: PlayerId(winner),
            tournament_id: TournamentId(tournament),
            date: NaiveDate::from_ymd_opt(year, month, day).ok_or("bad date")?,
            round: round.to_string(),
            score: score.to_string(),
        };
        partitions.entry(PartitionKey { year, month }).or_default().push(row);
    }
    for (key, rows) in &partitions {
        write_table(layout.format, &layout.partition_path(*key), rows)?;
    }

    Ok(())
}

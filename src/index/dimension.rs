use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::warn;
use crate::core::types::{Player, PlayerId, Tournament, TournamentId};

/// Player and tournament dimensions with O(1) id lookup.
///
/// Rows keep their table order, which is the order name resolution scans
/// them in. Built once per snapshot and never mutated afterwards.
#[derive(Debug, Default)]
pub struct DimensionStore {
    players: Vec<Player>,
    tournaments: Vec<Tournament>,
    player_index: HashMap<PlayerId, usize>,
    tournament_index: HashMap<TournamentId, usize>,
}

impl DimensionStore {
    pub fn build(players: Vec<Player>, tournaments: Vec<Tournament>) -> Self {
        let player_index = index_by(&players, |p| p.player_id, "player");
        let tournament_index = index_by(&tournaments, |t| t.tournament_id, "tournament");

        DimensionStore {
            players,
            tournaments,
            player_index,
            tournament_index,
        }
    }

    pub fn lookup_player(&self, id: PlayerId) -> Option<&Player> {
        self.player_index.get(&id).map(|&pos| &self.players[pos])
    }

    pub fn lookup_tournament(&self, id: TournamentId) -> Option<&Tournament> {
        self.tournament_index.get(&id).map(|&pos| &self.tournaments[pos])
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn tournaments(&self) -> &[Tournament] {
        &self.tournaments
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn tournament_count(&self) -> usize {
        self.tournaments.len()
    }
}

// First row wins on duplicate ids.
fn index_by<T, K, F>(rows: &[T], key: F, table: &str) -> HashMap<K, usize>
where
    K: std::hash::Hash + Eq + std::fmt::Debug,
    F: Fn(&T) -> K,
{
    let mut index = HashMap::with_capacity(rows.len());
    let mut duplicates = 0usize;

    for (pos, row) in rows.iter().enumerate() {
        match index.entry(key(row)) {
            Entry::Vacant(slot) => {
                slot.insert(pos);
            }
            Entry::Occupied(_) => duplicates += 1,
        }
    }

    if duplicates > 0 {
        warn!(table, duplicates, "duplicate dimension ids, keeping the first row");
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Surface;

    fn player(id: i64, name: &str) -> Player {
        Player { player_id: PlayerId(id), player_name: name.to_string() }
    }

    #[test]
    fn lookups_by_id() {
        let store = DimensionStore::build(
            vec![player(1, "Nadal R."), player(2, "Federer R.")],
            vec![Tournament {
                tournament_id: TournamentId(10),
                tournament_name: "Wimbledon".to_string(),
                surface: Some(Surface::Grass),
                series: "Grand Slam".to_string(),
            }],
        );

        assert_eq!(store.lookup_player(PlayerId(2)).unwrap().player_name, "Federer R.");
        assert!(store.lookup_player(PlayerId(3)).is_none());
        assert_eq!(store.lookup_tournament(TournamentId(10)).unwrap().tournament_name, "Wimbledon");
        assert!(store.lookup_tournament(TournamentId(11)).is_none());
    }

    #[test]
    fn duplicate_ids_keep_first_row_and_table_order() {
        let store = DimensionStore::build(
            vec![player(1, "Nadal R."), player(1, "Impostor"), player(2, "Federer R.")],
            Vec::new(),
        );

        assert_eq!(store.lookup_player(PlayerId(1)).unwrap().player_name, "Nadal R.");
        assert_eq!(store.player_count(), 3);
        let names: Vec<&str> = store.players().iter().map(|p| p.player_name.as_str()).collect();
        assert_eq!(names, vec!["Nadal R.", "Impostor", "Federer R."]);
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::mvcc::snapshot::Snapshot;

/// Row counts of the tables behind a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub players: usize,
    pub tournaments: usize,
    pub matches: usize,
}

/// Health check status
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// Health check result
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub snapshot_version: u64,
    pub loaded_at: DateTime<Utc>,
    pub data: TableCounts,
    pub partitions_loaded: usize,
    pub partitions_skipped: usize,
    pub rows_skipped: usize,
    pub unmatched_keys: usize,
    pub unattributed_winners: usize,
    pub reloading: bool,
}

impl HealthReport {
    pub fn from_snapshot(snapshot: &Snapshot, reloading: bool) -> Self {
        let partitions_skipped = snapshot.load_report.partitions_skipped.len();
        let rows_skipped = snapshot.load_report.rows_skipped;
        let unmatched_keys = snapshot.enrichment.unmatched_keys();
        let unattributed_winners = snapshot.enrichment.unattributed_winners;

        let status = if snapshot.version == 0 {
            HealthStatus::Unhealthy("no snapshot loaded".to_string())
        } else {
            let mut problems = Vec::new();
            if partitions_skipped > 0 {
                problems.push(format!("{} partitions skipped", partitions_skipped));
            }
            if rows_skipped > 0 {
                problems.push(format!("{} fact rows skipped", rows_skipped));
            }
            if unmatched_keys > 0 {
                problems.push(format!("{} unmatched dimension keys", unmatched_keys));
            }
            if unattributed_winners > 0 {
                problems.push(format!("{} matches with unattributed winners", unattributed_winners));
            }
            if problems.is_empty() {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded(problems.join("; "))
            }
        };

        HealthReport {
            status,
            timestamp: Utc::now(),
            snapshot_version: snapshot.version,
            loaded_at: snapshot.loaded_at,
            data: TableCounts {
                players: snapshot.dims.player_count(),
                tournaments: snapshot.dims.tournament_count(),
                matches: snapshot.match_count(),
            },
            partitions_loaded: snapshot.load_report.partitions_loaded,
            partitions_skipped,
            rows_skipped,
            unmatched_keys,
            unattributed_winners,
            reloading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::partition::SkippedPartition;

    #[test]
    fn unloaded_snapshot_is_unhealthy() {
        let report = HealthReport::from_snapshot(&Snapshot::empty(), false);
        assert!(matches!(report.status, HealthStatus::Unhealthy(_)));
        assert_eq!(report.data, TableCounts { players: 0, tournaments: 0, matches: 0 });
    }

    #[test]
    fn skipped_partitions_degrade() {
        let mut snapshot = Snapshot::empty();
        snapshot.version = 3;
        assert!(HealthReport::from_snapshot(&snapshot, false).status.is_healthy());

        snapshot
            .load_report
            .partitions_skipped
            .push(SkippedPartition::new(std::path::Path::new("x"), "corrupt"));
        let report = HealthReport::from_snapshot(&snapshot, true);
        assert_eq!(report.status, HealthStatus::Degraded("1 partitions skipped".to_string()));
        assert!(report.reloading);
    }

    #[test]
    fn skipped_rows_degrade() {
        let mut snapshot = Snapshot::empty();
        snapshot.version = 1;
        snapshot.load_report.rows_skipped = 2;

        let report = HealthReport::from_snapshot(&snapshot, false);
        assert_eq!(report.rows_skipped, 2);
        assert_eq!(report.status, HealthStatus::Degraded("2 fact rows skipped".to_string()));
    }
}

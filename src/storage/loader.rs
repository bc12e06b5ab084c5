use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{FactRow, MatchRecord, Player, Tournament};
use crate::storage::layout::StorageLayout;
use crate::storage::partition::{self, PartitionFile, SkippedPartition};
use crate::storage::table::{RowBatch, TableReader};

/// Shared flag used to interrupt a running load.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        CancelFlag::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Outcome of reading the fact partitions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub partitions_loaded: usize,
    pub partitions_skipped: Vec<SkippedPartition>,
    pub rows: usize,
    /// Rows dropped from otherwise readable partitions.
    pub rows_skipped: usize,
}

impl LoadReport {
    pub fn is_partial(&self) -> bool {
        !self.partitions_skipped.is_empty() || self.rows_skipped > 0
    }
}

/// Every table of a pipeline output, read but not yet joined.
#[derive(Debug, Clone, Default)]
pub struct LoadedTables {
    pub players: Vec<Player>,
    pub tournaments: Vec<Tournament>,
    pub matches: Vec<MatchRecord>,
    pub report: LoadReport,
}

enum PartitionRead {
    Loaded(PartitionFile, RowBatch<FactRow>),
    Skipped(SkippedPartition),
    Cancelled,
}

/// Reads dimension tables and fact partitions through a `TableReader`.
pub struct PartitionLoader<R: TableReader> {
    pub layout: StorageLayout,
    pub reader: R,
    pub workers: usize,
    pub cancel: CancelFlag,
}

impl<R: TableReader> PartitionLoader<R> {
    pub fn new(layout: StorageLayout, reader: R, workers: usize, cancel: CancelFlag) -> Self {
        PartitionLoader {
            layout,
            reader,
            workers: workers.max(1),
            cancel,
        }
    }

    pub fn load_all(&self) -> Result<LoadedTables> {
        let players = self.load_dimension::<Player>(&self.layout.players_path())?;
        let tournaments = self.load_dimension::<Tournament>(&self.layout.tournaments_path())?;
        let (matches, report) = self.load_facts()?;

        Ok(LoadedTables {
            players,
            tournaments,
            matches,
            report,
        })
    }

    /// A missing dimension file loads as an empty table; a corrupt one fails.
    pub fn load_dimension<T: DeserializeOwned>(&self, path: &std::path::Path) -> Result<Vec<T>> {
        self.check_cancelled()?;

        if !path.exists() {
            warn!(path = %path.display(), "dimension table missing, using an empty table");
            return Ok(Vec::new());
        }

        self.reader.read_rows(path).map_err(|e| Error {
            kind: e.kind,
            context: format!("{}: {}", path.display(), e.context),
        })
    }

    /// Reads every discovered partition. Unreadable partitions and rows that
    /// do not decode are skipped and reported; only cancellation aborts.
    pub fn load_facts(&self) -> Result<(Vec<MatchRecord>, LoadReport)> {
        let (partitions, mut skipped) = partition::discover(&self.layout);
        debug!(found = partitions.len(), skipped = skipped.len(), "discovered fact partitions");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| Error::new(ErrorKind::Internal, format!("loader pool: {}", e)))?;

        let reads: Vec<PartitionRead> = pool.install(|| {
            partitions
                .into_par_iter()
                .map(|partition| self.read_partition(partition))
                .collect()
        });

        let mut matches = Vec::new();
        let mut partitions_loaded = 0;
        let mut rows_skipped = 0;
        for read in reads {
            match read {
                PartitionRead::Loaded(partition, batch) => {
                    partitions_loaded += 1;
                    rows_skipped += batch.rejected.len();
                    matches.extend(batch.rows.into_iter().map(|row| MatchRecord {
                        row,
                        partition: partition.key,
                    }));
                }
                PartitionRead::Skipped(skip) => skipped.push(skip),
                PartitionRead::Cancelled => {}
            }
        }
        self.check_cancelled()?;

        for skip in &skipped {
            warn!(path = %skip.path.display(), reason = %skip.reason, "skipped fact partition");
        }
        info!(
            partitions = partitions_loaded,
            skipped = skipped.len(),
            rows = matches.len(),
            rows_skipped,
            "loaded fact partitions"
        );

        let report = LoadReport {
            partitions_loaded,
            partitions_skipped: skipped,
            rows: matches.len(),
            rows_skipped,
        };
        Ok((matches, report))
    }

    fn read_partition(&self, partition: PartitionFile) -> PartitionRead {
        if self.cancel.is_cancelled() {
            return PartitionRead::Cancelled;
        }

        match self.reader.read_row_batch::<FactRow>(&partition.path) {
            Ok(batch) => {
                for reason in &batch.rejected {
                    warn!(partition = %partition.key, reason = %reason, "skipped malformed fact row");
                }
                debug!(partition = %partition.key, rows = batch.rows.len(), "read partition");
                PartitionRead::Loaded(partition, batch)
            }
            Err(e) => PartitionRead::Skipped(SkippedPartition::new(&partition.path, e.to_string())),
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::new(ErrorKind::Interrupted, "load cancelled".to_string()));
        }
        Ok(())
    }
}

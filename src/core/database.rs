use std::fs;
use std::sync::Arc;
use tracing::{debug, info};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::stats::HealthReport;
use crate::mvcc::controller::SnapshotController;
use crate::mvcc::snapshot::Snapshot;
use crate::query::engine::QueryEngine;
use crate::query::types::{HeadToHead, PlayerList, PlayerStats, TournamentDetails, TournamentList};
use crate::storage::layout::StorageLayout;
use crate::storage::loader::{CancelFlag, PartitionLoader};
use crate::storage::table::{FsTableReader, TableReader};

pub struct Database<R: TableReader = FsTableReader> {
    config: Config,
    loader: PartitionLoader<R>,
    snapshots: SnapshotController,
}

impl Database<FsTableReader> {
    /// Opens the pipeline output under `config.data_dir` and loads it.
    pub fn open(config: Config) -> Result<Self> {
        let reader = FsTableReader::new(config.table_format);
        let db = Database::with_reader(config, reader);
        db.reload()?;
        Ok(db)
    }
}

impl<R: TableReader> Database<R> {
    /// Creates a handle without loading anything; the first snapshot is empty
    /// until `reload` runs.
    pub fn with_reader(config: Config, reader: R) -> Self {
        let layout = StorageLayout::new(config.data_dir.clone(), reader.format());
        let loader = PartitionLoader::new(layout, reader, config.load_workers, CancelFlag::new());

        Database {
            config,
            loader,
            snapshots: SnapshotController::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.loader.layout
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshots.current_snapshot()
    }

    // 1. Read dimensions and discover/read fact partitions
    // 2. Index dimensions, enrich facts into a new Snapshot
    // 3. Swap the snapshot in; readers holding the old one are unaffected
    /// Blocks while another reload is running.
    pub fn reload(&self) -> Result<Arc<Snapshot>> {
        self.snapshots.reload_with(|| self.build_snapshot())
    }

    /// Rejects with `ReloadInProgress` instead of waiting.
    pub fn try_reload(&self) -> Result<Arc<Snapshot>> {
        self.snapshots.try_reload_with(|| self.build_snapshot())
    }

    /// Interrupts the running reload; the current snapshot keeps serving.
    /// Does nothing when no reload is running.
    pub fn cancel_reload(&self) {
        if !self.is_reloading() {
            debug!("no reload running, cancellation ignored");
            return;
        }
        info!("reload cancellation requested");
        self.loader.cancel.cancel();
    }

    pub fn is_reloading(&self) -> bool {
        self.snapshots.is_reloading()
    }

    fn build_snapshot(&self) -> Result<Snapshot> {
        // Only cancels issued during this reload apply to it.
        self.loader.cancel.reset();
        info!(data_dir = %self.loader.layout.base_dir.display(), "loading dataset");
        let loaded = self.loader.load_all();
        self.loader.cancel.reset();
        Ok(Snapshot::build(loaded?))
    }

    pub fn list_players(&self, query: Option<&str>, limit: Option<usize>) -> PlayerList {
        let snapshot = self.snapshot();
        QueryEngine::new(&snapshot, &self.config).list_players(query, limit)
    }

    pub fn player_stats(&self, name: &str) -> Result<PlayerStats> {
        let snapshot = self.snapshot();
        QueryEngine::new(&snapshot, &self.config).player_stats(name)
    }

    pub fn head_to_head(&self, player_a: &str, player_b: &str) -> Result<HeadToHead> {
        let snapshot = self.snapshot();
        QueryEngine::new(&snapshot, &self.config).head_to_head(player_a, player_b)
    }

    pub fn list_tournaments(&self, surface: Option<&str>, limit: Option<usize>) -> TournamentList {
        let snapshot = self.snapshot();
        QueryEngine::new(&snapshot, &self.config).list_tournaments(surface, limit)
    }

    pub fn tournament_details(&self, name: &str) -> Result<TournamentDetails> {
        let snapshot = self.snapshot();
        QueryEngine::new(&snapshot, &self.config).tournament_details(name)
    }

    pub fn health(&self) -> HealthReport {
        HealthReport::from_snapshot(&self.snapshot(), self.is_reloading())
    }

    /// The pipeline's data-quality report, read fresh and passed through as is.
    pub fn dq_report(&self) -> Result<serde_json::Value> {
        let path = self.loader.layout.dq_report_path();
        if !path.is_file() {
            return Err(Error::not_found("DQ report not found"));
        }
        let data = fs::read(&path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}

impl<R: TableReader + 'static> Database<R> {
    /// Runs `reload` on tokio's blocking pool.
    pub async fn reload_async(self: Arc<Self>) -> Result<Arc<Snapshot>> {
        tokio::task::spawn_blocking(move || self.reload()).await?
    }
}

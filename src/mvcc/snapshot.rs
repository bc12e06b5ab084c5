use chrono::{DateTime, Utc};
use crate::core::types::EnrichedMatch;
use crate::enrich::engine::{self, EnrichmentReport};
use crate::index::dimension::DimensionStore;
use crate::storage::loader::{LoadReport, LoadedTables};

/// One immutable, fully joined view of the dataset.
///
/// The dimension store, the enriched fact table and the reports describing
/// how they were built share this lifetime; a reload replaces all of them
/// together.
#[derive(Debug)]
pub struct Snapshot {
    pub version: u64,
    pub loaded_at: DateTime<Utc>,
    pub dims: DimensionStore,
    pub matches: Vec<EnrichedMatch>,
    pub load_report: LoadReport,
    pub enrichment: EnrichmentReport,
}

impl Snapshot {
    /// Indexes the dimensions and enriches every fact row.
    pub fn build(tables: LoadedTables) -> Self {
        let dims = DimensionStore::build(tables.players, tables.tournaments);
        let (matches, enrichment) = engine::enrich(&tables.matches, &dims);

        Snapshot {
            version: 0,
            loaded_at: Utc::now(),
            dims,
            matches,
            load_report: tables.report,
            enrichment,
        }
    }

    pub fn empty() -> Self {
        Snapshot::build(LoadedTables::default())
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot::empty()
    }
}

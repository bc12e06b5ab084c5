use std::path::{Path, PathBuf};
use crate::core::types::PartitionKey;
use crate::storage::table::TableFormat;

pub const PLAYERS_TABLE: &str = "dim_players";
pub const TOURNAMENTS_TABLE: &str = "dim_tournaments";
pub const FACT_TABLE: &str = "fact_matches";
pub const PARTITION_FILE: &str = "data";
pub const DQ_REPORT_FILE: &str = "dq_report.json";

/// Directory structure of a pipeline output
#[derive(Debug, Clone)]
pub struct StorageLayout {
    pub base_dir: PathBuf,      // Root directory
    pub fact_dir: PathBuf,      // year=<Y>/month=<M>/data.<ext> partitions
    pub format: TableFormat,
}

impl StorageLayout {
    pub fn new(base_dir: PathBuf, format: TableFormat) -> Self {
        let fact_dir = base_dir.join(FACT_TABLE);
        StorageLayout {
            base_dir,
            fact_dir,
            format,
        }
    }

    pub fn players_path(&self) -> PathBuf {
        self.table_path(&self.base_dir, PLAYERS_TABLE)
    }

    pub fn tournaments_path(&self) -> PathBuf {
        self.table_path(&self.base_dir, TOURNAMENTS_TABLE)
    }

    pub fn partition_dir(&self, key: PartitionKey) -> PathBuf {
        self.fact_dir
            .join(format!("year={}", key.year))
            .join(format!("month={:02}", key.month))
    }

    pub fn partition_path(&self, key: PartitionKey) -> PathBuf {
        self.partition_file(&self.partition_dir(key))
    }

    /// Data file inside an already discovered month directory.
    pub fn partition_file(&self, month_dir: &Path) -> PathBuf {
        self.table_path(month_dir, PARTITION_FILE)
    }

    pub fn dq_report_path(&self) -> PathBuf {
        self.base_dir.join(DQ_REPORT_FILE)
    }

    fn table_path(&self, dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{}.{}", name, self.format.extension()))
    }
}

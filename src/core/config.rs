use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::core::error::Result;
use crate::storage::table::TableFormat;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub table_format: TableFormat,

    pub default_limit: usize,             // list_players / list_tournaments cap
    pub recent_limit: usize,              // head-to-head rows and champions returned
    pub final_round_label: String,        // round value that marks a final

    pub load_workers: usize,              // rayon threads used for partition reads
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("./pipeline_output"),
            table_format: TableFormat::Json,

            default_limit: 50,
            recent_limit: 10,
            final_round_label: "The Final".to_string(),

            load_workers: num_cpus::get(),
        }
    }
}

impl Config {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Config {
            data_dir: data_dir.into(),
            ..Config::default()
        }
    }

    /// Reads a JSON config file. Fields left out keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        let config = serde_json::from_slice(&data)?;
        Ok(config)
    }
}

use std::fs;
use std::path::{Path, PathBuf};
use serde::Serialize;
use tracing::debug;
use crate::core::types::PartitionKey;
use crate::storage::layout::StorageLayout;

/// A partition data file found under the fact directory.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionFile {
    pub key: PartitionKey,
    pub path: PathBuf,
}

/// A partition left out of a load, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedPartition {
    pub path: PathBuf,
    pub reason: String,
}

impl SkippedPartition {
    pub fn new(path: &Path, reason: impl Into<String>) -> Self {
        SkippedPartition {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Parses a `<name>=<value>` directory component.
pub fn parse_component<T: std::str::FromStr>(dir_name: &str, name: &str) -> Option<T> {
    let (key, value) = dir_name.split_once('=')?;
    if key != name {
        return None;
    }
    value.trim().parse().ok()
}

/// Walks `year=<Y>/month=<M>` under the fact directory. Partitions come back
/// sorted by key; anything that cannot be used is reported, never fatal.
pub fn discover(layout: &StorageLayout) -> (Vec<PartitionFile>, Vec<SkippedPartition>) {
    let mut found = Vec::new();
    let mut skipped = Vec::new();

    if !layout.fact_dir.is_dir() {
        debug!(path = %layout.fact_dir.display(), "no fact directory");
        return (found, skipped);
    }

    for year_dir in subdirectories(&layout.fact_dir, &mut skipped) {
        let Some(year) = dir_name(&year_dir).and_then(|n| parse_component::<i32>(n, "year")) else {
            skipped.push(SkippedPartition::new(&year_dir, "unrecognised year directory"));
            continue;
        };

        for month_dir in subdirectories(&year_dir, &mut skipped) {
            let month = dir_name(&month_dir)
                .and_then(|n| parse_component::<u32>(n, "month"))
                .filter(|m| (1..=12).contains(m));
            let Some(month) = month else {
                skipped.push(SkippedPartition::new(&month_dir, "unrecognised month directory"));
                continue;
            };

            let path = layout.partition_file(&month_dir);
            if !path.is_file() {
                skipped.push(SkippedPartition::new(&path, "missing partition data file"));
                continue;
            }

            found.push(PartitionFile {
                key: PartitionKey { year, month },
                path,
            });
        }
    }

    found.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.path.cmp(&b.path)));
    (found, skipped)
}

fn subdirectories(dir: &Path, skipped: &mut Vec<SkippedPartition>) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            skipped.push(SkippedPartition::new(dir, format!("unreadable directory: {}", e)));
            return Vec::new();
        }
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs
}

fn dir_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

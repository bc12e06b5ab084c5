use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use crate::core::error::{Error, ErrorKind, Result};

/// Physical encoding of a table file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableFormat {
    Json,      // one JSON array of row objects
    JsonLines, // one row object per line
    Bincode,   // bincode-encoded Vec of rows
}

impl TableFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TableFormat::Json => "json",
            TableFormat::JsonLines => "jsonl",
            TableFormat::Bincode => "bin",
        }
    }
}

/// Rows decoded from one file, plus a reason for each row that was dropped.
#[derive(Debug, Clone)]
pub struct RowBatch<T> {
    pub rows: Vec<T>,
    pub rejected: Vec<String>,
}

impl<T> RowBatch<T> {
    pub fn new() -> Self {
        RowBatch {
            rows: Vec::new(),
            rejected: Vec::new(),
        }
    }

    fn push(&mut self, decoded: serde_json::Result<T>, location: impl FnOnce() -> String) {
        match decoded {
            Ok(row) => self.rows.push(row),
            Err(e) => self.rejected.push(format!("{}: {}", location(), e)),
        }
    }
}

impl<T> Default for RowBatch<T> {
    fn default() -> Self {
        RowBatch::new()
    }
}

/// Produces the rows of one table file.
pub trait TableReader: Send + Sync {
    fn format(&self) -> TableFormat;

    /// Fails on the first row that does not decode.
    fn read_rows<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>>;

    /// Drops rows that do not decode instead of failing the file. Only an
    /// unreadable file is an error. Encodings without row boundaries keep
    /// the all-or-nothing behaviour of `read_rows`.
    fn read_row_batch<T: DeserializeOwned>(&self, path: &Path) -> Result<RowBatch<T>> {
        Ok(RowBatch {
            rows: self.read_rows(path)?,
            rejected: Vec::new(),
        })
    }
}

/// Reads table files from the local filesystem.
#[derive(Debug, Clone, Copy)]
pub struct FsTableReader {
    pub format: TableFormat,
}

impl FsTableReader {
    pub fn new(format: TableFormat) -> Self {
        FsTableReader { format }
    }
}

impl TableReader for FsTableReader {
    fn format(&self) -> TableFormat {
        self.format
    }

    fn read_rows<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        match self.format {
            TableFormat::Json => Ok(serde_json::from_reader(reader)?),
            TableFormat::Bincode => Ok(bincode::deserialize_from(reader)?),
            TableFormat::JsonLines => {
                let mut rows = Vec::new();
                for (line_no, line) in reader.lines().enumerate() {
                    let line = line?;
                    if line.trim().is_empty() {
                        continue;
                    }
                    let row = serde_json::from_str(&line).map_err(|e| Error {
                        kind: ErrorKind::Parse,
                        context: format!("{}:{}: {}", path.display(), line_no + 1, e),
                    })?;
                    rows.push(row);
                }
                Ok(rows)
            }
        }
    }

    fn read_row_batch<T: DeserializeOwned>(&self, path: &Path) -> Result<RowBatch<T>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut batch = RowBatch::new();

        match self.format {
            TableFormat::Bincode => batch.rows = bincode::deserialize_from(reader)?,
            TableFormat::Json => {
                let values: Vec<serde_json::Value> = serde_json::from_reader(reader)?;
                for (index, value) in values.into_iter().enumerate() {
                    batch.push(serde_json::from_value(value), || {
                        format!("{}[{}]", path.display(), index)
                    });
                }
            }
            TableFormat::JsonLines => {
                for (line_no, line) in reader.lines().enumerate() {
                    let line = line?;
                    if line.trim().is_empty() {
                        continue;
                    }
                    batch.push(serde_json::from_str(&line), || {
                        format!("{}:{}", path.display(), line_no + 1)
                    });
                }
            }
        }
        Ok(batch)
    }
}

/// Writes `rows` in `format`, creating parent directories. Used to stage
/// datasets for demos, benchmarks and tests.
pub fn write_table<T: Serialize>(format: TableFormat, path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);

    match format {
        TableFormat::Json => serde_json::to_writer(&mut writer, rows)?,
        TableFormat::Bincode => bincode::serialize_into(&mut writer, rows)?,
        TableFormat::JsonLines => {
            for row in rows {
                serde_json::to_writer(&mut writer, row)?;
                writer.write_all(b"\n")?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

use crate::error::{ExtractError, Result};
use rustc_hash::{FxHashSet, FxHasher};
use serde::Serialize;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Streaming CSV writer that suppresses exact duplicate rows.
///
/// Rows are hashed over their full field tuple; only the hash set grows
/// with input size, so the row source never needs to be resident at once.
/// Two distinct tuples colliding on the hash are treated as duplicates,
/// an accepted risk of this scheme.
///
/// The dataset is written to a temp file next to the destination and
/// renamed into place on `finish()`, so an interrupted run leaves no
/// partial dataset behind. The dedup set is owned by one writer
/// invocation; nothing leaks across runs or approaches.
pub struct DedupWriter {
    writer: csv::Writer<NamedTempFile>,
    destination: PathBuf,
    seen: FxHashSet<u64>,
    written: u64,
    duplicates: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WriteSummary {
    pub rows_written: u64,
    pub duplicates: u64,
    pub output_file: PathBuf,
}

impl DedupWriter {
    /// Create the dataset file and write its header row.
    pub fn create<P: AsRef<Path>>(destination: P, fieldnames: &[&str]) -> Result<Self> {
        let destination = destination.as_ref().to_path_buf();
        let parent = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&parent)?;

        // Same directory as the destination so the final rename never
        // crosses filesystems.
        let temp = NamedTempFile::new_in(&parent).map_err(|e| ExtractError::DatasetWrite {
            path: destination.clone(),
            message: e.to_string(),
        })?;

        let mut writer = csv::Writer::from_writer(temp);
        writer
            .write_record(fieldnames)
            .map_err(|e| ExtractError::DatasetWrite {
                path: destination.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            writer,
            destination,
            seen: FxHashSet::default(),
            written: 0,
            duplicates: 0,
        })
    }

    /// Write one row unless an identical one was already written in this
    /// invocation. Returns whether the row was accepted.
    pub fn write_row(&mut self, row: &[String]) -> Result<bool> {
        let hash = row_hash(row);
        if !self.seen.insert(hash) {
            self.duplicates += 1;
            return Ok(false);
        }

        self.writer
            .write_record(row)
            .map_err(|e| ExtractError::DatasetWrite {
                path: self.destination.clone(),
                message: e.to_string(),
            })?;
        self.written += 1;
        Ok(true)
    }

    pub fn rows_written(&self) -> u64 {
        self.written
    }

    pub fn duplicates(&self) -> u64 {
        self.duplicates
    }

    /// Flush and atomically move the dataset into place.
    pub fn finish(self) -> Result<WriteSummary> {
        let destination = self.destination;
        let temp = self
            .writer
            .into_inner()
            .map_err(|e| ExtractError::DatasetWrite {
                path: destination.clone(),
                message: e.to_string(),
            })?;
        temp.persist(&destination)
            .map_err(|e| ExtractError::DatasetWrite {
                path: destination.clone(),
                message: e.to_string(),
            })?;

        Ok(WriteSummary {
            rows_written: self.written,
            duplicates: self.duplicates,
            output_file: destination,
        })
    }
}

fn row_hash(row: &[String]) -> u64 {
    let mut hasher = FxHasher::default();
    for field in row {
        field.hash(&mut hasher);
    }
    hasher.finish()
}

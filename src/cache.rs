use crate::error::{ExtractError, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

const CACHE_HEADERS: [&str; 2] = ["source_path", "total_records"];

/// Append-only cache of record totals from prior full scans, keyed by
/// source path. Purely a progress-estimation aid: a missing or stale entry
/// only degrades progress feedback, never extraction correctness.
pub struct ProgressCache {
    path: PathBuf,
    entries: Vec<(String, u64)>,
}

impl ProgressCache {
    /// Load the cache file if it exists. Rows that fail to parse are
    /// ignored rather than failing the run.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut entries = Vec::new();

        if path.exists() {
            let mut reader = csv::Reader::from_path(&path).map_err(|e| ExtractError::Cache {
                message: format!("Failed to read {}: {}", path.display(), e),
            })?;
            for row in reader.records() {
                let Ok(row) = row else { continue };
                let (Some(source), Some(total)) = (row.get(0), row.get(1)) else {
                    continue;
                };
                if let Ok(total) = total.trim().parse::<u64>() {
                    entries.push((source.to_string(), total));
                }
            }
        }

        Ok(Self { path, entries })
    }

    /// Prior total-record count for this source, or `None` if the path has
    /// never been fully scanned. Returns the first matching entry.
    pub fn lookup(&self, source_path: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(path, _)| path == source_path)
            .map(|(_, total)| *total)
    }

    /// Append a new entry. Existing entries are never rewritten; a repeat
    /// scan of an already-cached path appends a duplicate row.
    pub fn record(&mut self, source_path: &str, total_records: u64) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let write_header = !self.path.exists()
            || std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0) == 0;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if write_header {
            writer.write_record(CACHE_HEADERS)?;
        }
        writer.write_record([source_path, &total_records.to_string()])?;
        writer.flush()?;

        self.entries
            .push((source_path.to_string(), total_records));
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lookup_on_fresh_cache_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ProgressCache::open(temp_dir.path().join("totals.csv")).unwrap();
        assert_eq!(cache.lookup("archive.gb"), None);
    }

    #[test]
    fn test_record_then_lookup_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("totals.csv");

        let mut cache = ProgressCache::open(&cache_path).unwrap();
        cache.record("archive.gb", 1234).unwrap();
        assert_eq!(cache.lookup("archive.gb"), Some(1234));

        // A separate open sees the persisted entry unchanged.
        let reloaded = ProgressCache::open(&cache_path).unwrap();
        assert_eq!(reloaded.lookup("archive.gb"), Some(1234));
        assert_eq!(reloaded.lookup("other.gb"), None);
    }

    #[test]
    fn test_repeat_scan_appends_duplicate_row() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("totals.csv");

        let mut cache = ProgressCache::open(&cache_path).unwrap();
        cache.record("archive.gb", 100).unwrap();
        cache.record("archive.gb", 100).unwrap();

        // First entry wins on lookup; both rows are on disk.
        assert_eq!(cache.lookup("archive.gb"), Some(100));
        let content = std::fs::read_to_string(&cache_path).unwrap();
        assert_eq!(content.matches("archive.gb").count(), 2);
        assert_eq!(content.matches("source_path").count(), 1);
    }

    #[test]
    fn test_bad_rows_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("totals.csv");
        std::fs::write(
            &cache_path,
            "source_path,total_records\narchive.gb,not-a-number\nother.gb,42\n",
        )
        .unwrap();

        let cache = ProgressCache::open(&cache_path).unwrap();
        assert_eq!(cache.lookup("archive.gb"), None);
        assert_eq!(cache.lookup("other.gb"), Some(42));
    }

    #[test]
    fn test_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("cache").join("totals.csv");
        let mut cache = ProgressCache::open(&cache_path).unwrap();
        cache.record("archive.gb", 7).unwrap();
        assert!(cache_path.exists());
    }
}

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod reader;
pub mod record;
pub mod strategy;
pub mod ui;
pub mod writer;

// Public API re-exports
pub use cli::{Approach, Cli, OutputFormat};
pub use config::{ApproachConfig, CliOverrides, Config, ExtractionSection, OutputConfig};
pub use error::{ExtractError, Result, UserFriendlyError};

// Core functionality re-exports
pub use cache::ProgressCache;
pub use reader::GenbankReader;
pub use record::{reverse_complement, Feature, FeatureKind, SequenceRecord, Strand};
pub use strategy::{
    ExtractionConfig, ProteinExtraction, RecordOutcome, ScanSummary, SequenceRebuild,
    SiteExtraction, SkipReason, SlidingWindowLabeling, Strategy,
};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};
pub use writer::{DedupWriter, WriteSummary};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything one approach run produced, for summaries and JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub approach: String,
    pub source: PathBuf,
    pub extracted_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub scan: ScanSummary,
    pub write: WriteSummary,
}

/// Main library interface for the extraction pipeline
pub struct GbDatasets {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl GbDatasets {
    /// Create a new instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    /// Create an instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            cli::OutputFormat::Human => OutputMode::Human,
            cli::OutputFormat::Json => OutputMode::Json,
            cli::OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbose,
            cli_args.quiet,
        ))
    }

    /// Run the selected approach (or all four) over one archive.
    pub fn extract_datasets(&self, archive: &Path, approach: Approach) -> Result<Vec<RunReport>> {
        let mut reports = Vec::new();
        for concrete in approach.expand() {
            reports.push(self.run_approach(archive, concrete)?);
        }
        Ok(reports)
    }

    fn run_approach(&self, archive: &Path, approach: Approach) -> Result<RunReport> {
        let strategy = self.strategy_for(approach)?;
        let started = Instant::now();
        let extracted_at = Utc::now();

        self.output_formatter
            .start_operation(&format!("Extracting {} dataset", strategy.name()));

        // A broken cache only costs the progress bar its total, never the run.
        let mut cache = match ProgressCache::open(&self.config.cache.path) {
            Ok(cache) => Some(cache),
            Err(e) => {
                self.output_formatter
                    .warning(&format!("Progress cache unavailable: {}", e));
                None
            }
        };

        let source_key = archive.to_string_lossy().to_string();
        let known_total = cache.as_ref().and_then(|c| c.lookup(&source_key));

        let mut reader = GenbankReader::open(archive)?;
        let mut writer = DedupWriter::create(
            self.config.dataset_path(strategy.name()),
            strategy.fieldnames(),
        )?;

        let scan_progress = self.progress_manager.create_scan_progress(known_total);
        let mut summary = ScanSummary::default();
        let mut rows = Vec::new();

        for record in &mut reader {
            rows.clear();
            let outcome = strategy.process(&record, &mut rows);
            summary.apply(&outcome, rows.len() as u64);

            for row in &rows {
                writer.write_row(row)?;
            }

            ui::progress::update_scan_progress(&scan_progress, writer.duplicates());
        }

        summary.malformed = reader.malformed_count();

        ui::progress::finish_progress_with_summary(
            &scan_progress,
            &format!("{} scan finished", strategy.name()),
            started.elapsed(),
        );

        if summary.malformed > 0 {
            self.output_formatter.warning(&format!(
                "{} malformed archive entries were skipped",
                summary.malformed
            ));
        }

        // First full scan of this archive; later runs reuse the total.
        if known_total.is_none() {
            if let Some(cache) = cache.as_mut() {
                if let Err(e) = cache.record(&source_key, summary.scanned) {
                    self.output_formatter
                        .warning(&format!("Could not update progress cache: {}", e));
                }
            }
        }

        let write = writer.finish()?;
        self.output_formatter.success(&format!(
            "{} rows written to {}",
            write.rows_written,
            write.output_file.display()
        ));

        Ok(RunReport {
            approach: strategy.name().to_string(),
            source: archive.to_path_buf(),
            extracted_at,
            duration_ms: started.elapsed().as_millis() as u64,
            scan: summary,
            write,
        })
    }

    fn strategy_for(&self, approach: Approach) -> Result<Box<dyn Strategy>> {
        let extraction = &self.config.extraction;
        Ok(match approach {
            Approach::Sites => Box::new(SiteExtraction::new(extraction.sites.extraction_config())),
            Approach::Rebuild => {
                Box::new(SequenceRebuild::new(extraction.rebuild.extraction_config()))
            }
            Approach::SlidingWindow => Box::new(SlidingWindowLabeling::new(
                extraction.sliding_window.extraction_config(),
            )),
            Approach::Protein => {
                Box::new(ProteinExtraction::new(extraction.protein.extraction_config()))
            }
            Approach::All => {
                return Err(ExtractError::Config {
                    message: "'all' must be expanded into concrete approaches".to_string(),
                })
            }
        })
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(ExtractError::Io)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &ExtractError) {
        self.progress_manager.clear();
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_gbdatasets_creation() {
        let config = Config::default();
        let gbd = GbDatasets::new(config, OutputMode::Plain, 0, true);
        assert_eq!(gbd.config().extraction.sites.flank_small, 10);
        assert!(!gbd.progress_manager().is_enabled());
    }

    #[test]
    fn test_progress_disabled_outside_human_mode() {
        let gbd = GbDatasets::new(Config::default(), OutputMode::Json, 0, false);
        assert!(!gbd.progress_manager().is_enabled());

        let gbd = GbDatasets::new(Config::default(), OutputMode::Human, 0, false);
        assert!(gbd.progress_manager().is_enabled());
    }

    #[test]
    fn test_strategy_selection() {
        let gbd = GbDatasets::new(Config::default(), OutputMode::Plain, 0, true);

        assert_eq!(gbd.strategy_for(Approach::Sites).unwrap().name(), "ExInSeqs");
        assert_eq!(
            gbd.strategy_for(Approach::Rebuild).unwrap().name(),
            "RebuildSeqs"
        );
        assert_eq!(
            gbd.strategy_for(Approach::SlidingWindow).unwrap().name(),
            "SWExInSeqs"
        );
        assert_eq!(
            gbd.strategy_for(Approach::Protein).unwrap().name(),
            "ProteinSeqs"
        );
        assert!(gbd.strategy_for(Approach::All).is_err());
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        GbDatasets::generate_sample_config(&config_path).unwrap();
        assert!(config_path.exists());

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[extraction.sites]"));
        assert!(content.contains("[output]"));
        assert!(content.contains("[cache]"));
    }

    #[test]
    fn test_missing_archive_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.output.base_directory = temp_dir.path().join("out");
        config.cache.path = temp_dir.path().join("cache.csv");

        let gbd = GbDatasets::new(config, OutputMode::Plain, 0, true);
        let result = gbd.extract_datasets(&temp_dir.path().join("missing.gb"), Approach::Sites);
        assert!(matches!(result, Err(ExtractError::ArchiveOpen { .. })));
    }

    #[test]
    fn test_run_report_serializes() {
        let report = RunReport {
            approach: "ExInSeqs".to_string(),
            source: PathBuf::from("genome.gb"),
            extracted_at: Utc::now(),
            duration_ms: 12,
            scan: ScanSummary::default(),
            write: WriteSummary {
                rows_written: 0,
                duplicates: 0,
                output_file: PathBuf::from("out.csv"),
            },
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"approach\":\"ExInSeqs\""));
        assert!(json.contains("\"rows_written\""));
    }

    #[test]
    fn test_version_info() {
        assert!(!version_info().is_empty());
    }
}

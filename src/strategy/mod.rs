pub mod protein;
pub mod rebuild;
pub mod sites;
pub mod sliding_window;

pub use protein::ProteinExtraction;
pub use rebuild::SequenceRebuild;
pub use sites::SiteExtraction;
pub use sliding_window::SlidingWindowLabeling;

use crate::record::SequenceRecord;
use serde::Serialize;

/// Per-approach numeric parameters. The flank lengths only matter to site
/// extraction; the other strategies read `sequence_max_length` alone.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionConfig {
    pub sequence_max_length: usize,
    pub flank_small: usize,
    pub flank_default: usize,
}

/// One dataset row: field values in the order of the strategy's schema.
pub type OutputRow = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No literal symbols exist to extract.
    Unresolved,
    TooLong,
    TooShort,
    UnknownStrand,
    /// No qualifying CDS/translation annotation.
    MissingAnnotation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Accepted { skipped_features: u64 },
    Skipped(SkipReason),
}

/// One extraction algorithm. Consumes one record at a time and pushes zero
/// or more rows; skip/abort decisions come back as the outcome, never as
/// errors.
pub trait Strategy {
    /// Dataset file stem, e.g. `ExInSeqs` for `ExInSeqs_genbank.csv`.
    fn name(&self) -> &'static str;

    fn fieldnames(&self) -> &'static [&'static str];

    fn process(&self, record: &SequenceRecord, rows: &mut Vec<OutputRow>) -> RecordOutcome;
}

/// End-of-run counters for one scan.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ScanSummary {
    pub scanned: u64,
    pub accepted: u64,
    pub skipped_unresolved: u64,
    pub skipped_too_long: u64,
    pub skipped_too_short: u64,
    pub skipped_unknown_strand: u64,
    pub skipped_missing_annotation: u64,
    /// Feature-level skips inside accepted records (site extraction only).
    pub skipped_features: u64,
    /// Archive entries that failed to parse.
    pub malformed: u64,
    pub rows_emitted: u64,
}

impl ScanSummary {
    pub fn apply(&mut self, outcome: &RecordOutcome, rows_emitted: u64) {
        self.scanned += 1;
        self.rows_emitted += rows_emitted;
        match outcome {
            RecordOutcome::Accepted { skipped_features } => {
                self.accepted += 1;
                self.skipped_features += skipped_features;
            }
            RecordOutcome::Skipped(reason) => match reason {
                SkipReason::Unresolved => self.skipped_unresolved += 1,
                SkipReason::TooLong => self.skipped_too_long += 1,
                SkipReason::TooShort => self.skipped_too_short += 1,
                SkipReason::UnknownStrand => self.skipped_unknown_strand += 1,
                SkipReason::MissingAnnotation => self.skipped_missing_annotation += 1,
            },
        }
    }

    pub fn skipped_records(&self) -> u64 {
        self.skipped_unresolved
            + self.skipped_too_long
            + self.skipped_too_short
            + self.skipped_unknown_strand
            + self.skipped_missing_annotation
    }
}

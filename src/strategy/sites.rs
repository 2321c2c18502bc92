use crate::record::{reverse_complement_str, SequenceRecord, Strand};
use crate::strategy::{ExtractionConfig, OutputRow, RecordOutcome, SkipReason, Strategy};

const FIELDNAMES: &[&str] = &[
    "sequence",
    "label",
    "organism",
    "gene",
    "flank_before",
    "flank_before_extended",
    "flank_after",
    "flank_after_extended",
];

/// Emits one row per intron/exon feature, with the feature sequence and
/// two flank windows on each side.
///
/// Skips are feature-level: an unknown strand or an over-long span drops
/// the feature, not the record. On the reverse strand the feature sequence
/// is reverse-complemented but the flank windows are not; the flanks stay
/// in archive orientation.
pub struct SiteExtraction {
    config: ExtractionConfig,
}

impl SiteExtraction {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    fn flank_before(&self, record: &SequenceRecord, start: usize, flank_len: usize) -> String {
        if start == 0 {
            return String::new();
        }
        record.subsequence(start.saturating_sub(flank_len), start)
    }

    fn flank_after(&self, record: &SequenceRecord, end: usize, flank_len: usize) -> String {
        if end >= record.len() {
            return String::new();
        }
        record.subsequence(end, (end + flank_len).min(record.len()))
    }
}

impl Strategy for SiteExtraction {
    fn name(&self) -> &'static str {
        "ExInSeqs"
    }

    fn fieldnames(&self) -> &'static [&'static str] {
        FIELDNAMES
    }

    fn process(&self, record: &SequenceRecord, rows: &mut Vec<OutputRow>) -> RecordOutcome {
        if !record.is_resolved() {
            return RecordOutcome::Skipped(SkipReason::Unresolved);
        }

        let mut skipped_features = 0;
        for feature in record.features.iter().filter(|f| f.kind.is_splice_site()) {
            if feature.strand == Strand::Unknown {
                skipped_features += 1;
                continue;
            }
            if feature.span() > self.config.sequence_max_length {
                skipped_features += 1;
                continue;
            }

            let feature_sequence = record.subsequence(feature.start, feature.end);
            let sequence = match feature.strand {
                Strand::Reverse => reverse_complement_str(&feature_sequence),
                _ => feature_sequence,
            };

            rows.push(vec![
                sequence,
                feature.kind.label().to_string(),
                record.organism_label().to_string(),
                feature.qualifier("gene").unwrap_or("").to_string(),
                self.flank_before(record, feature.start, self.config.flank_small),
                self.flank_before(record, feature.start, self.config.flank_default),
                self.flank_after(record, feature.end, self.config.flank_small),
                self.flank_after(record, feature.end, self.config.flank_default),
            ]);
        }

        RecordOutcome::Accepted { skipped_features }
    }
}

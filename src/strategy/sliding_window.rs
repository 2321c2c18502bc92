use crate::record::{reverse_complement_str, SequenceRecord, Strand};
use crate::strategy::{ExtractionConfig, OutputRow, RecordOutcome, SkipReason, Strategy};

const FIELDNAMES: &[&str] = &["sequence", "organism", "labeled_sequence"];

/// Labels every position of the record: `E` under exons, `I` under introns,
/// `U` elsewhere. The labeled string always has the record's exact length.
///
/// Record-level policy: an unknown strand on any intron/exon abandons the
/// record. The emitted sequence is reverse-complemented when the LAST seen
/// feature's strand is reverse, while the label array is left unreversed;
/// this asymmetry is long-standing observed behavior kept for dataset
/// compatibility (see the regression test below).
pub struct SlidingWindowLabeling {
    config: ExtractionConfig,
}

impl SlidingWindowLabeling {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }
}

impl Strategy for SlidingWindowLabeling {
    fn name(&self) -> &'static str {
        "SWExInSeqs"
    }

    fn fieldnames(&self) -> &'static [&'static str] {
        FIELDNAMES
    }

    fn process(&self, record: &SequenceRecord, rows: &mut Vec<OutputRow>) -> RecordOutcome {
        if !record.is_resolved() {
            return RecordOutcome::Skipped(SkipReason::Unresolved);
        }
        if record.len() > self.config.sequence_max_length {
            return RecordOutcome::Skipped(SkipReason::TooLong);
        }
        if record.len() < 3 {
            return RecordOutcome::Skipped(SkipReason::TooShort);
        }

        let mut labels = vec![b'U'; record.len()];
        let mut last_strand = Strand::Forward;
        for feature in record.features.iter().filter(|f| f.kind.is_splice_site()) {
            if feature.strand == Strand::Unknown {
                return RecordOutcome::Skipped(SkipReason::UnknownStrand);
            }
            last_strand = feature.strand;
            labels[feature.start..feature.end].fill(feature.kind.position_code());
        }

        let sequence = match last_strand {
            Strand::Reverse => reverse_complement_str(&record.subsequence(0, record.len())),
            _ => record.subsequence(0, record.len()),
        };
        let labeled_sequence =
            String::from_utf8(labels).unwrap_or_else(|e| {
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            });

        rows.push(vec![
            sequence,
            record.organism_label().to_string(),
            labeled_sequence,
        ]);

        RecordOutcome::Accepted { skipped_features: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Feature, FeatureKind};

    fn config() -> ExtractionConfig {
        ExtractionConfig {
            sequence_max_length: 100,
            flank_small: 0,
            flank_default: 0,
        }
    }

    fn feature(kind: FeatureKind, start: usize, end: usize, strand: Strand) -> Feature {
        Feature {
            kind,
            start,
            end,
            strand,
            qualifiers: vec![],
        }
    }

    fn record(seq: &[u8], features: Vec<Feature>) -> SequenceRecord {
        SequenceRecord::new(
            "TEST1".to_string(),
            seq.to_vec(),
            true,
            Some("Synthetica testii".to_string()),
            features,
        )
    }

    #[test]
    fn test_exon_and_intron_labels() {
        let strategy = SlidingWindowLabeling::new(config());
        let rec = record(
            b"ACGTACGTAC",
            vec![
                feature(FeatureKind::Exon, 2, 5, Strand::Forward),
                feature(FeatureKind::Intron, 5, 8, Strand::Forward),
            ],
        );

        let mut rows = Vec::new();
        let outcome = strategy.process(&rec, &mut rows);

        assert_eq!(outcome, RecordOutcome::Accepted { skipped_features: 0 });
        assert_eq!(rows[0][0], "ACGTACGTAC");
        assert_eq!(rows[0][2], "UUEEEIIIUU");
    }

    #[test]
    fn test_labels_always_match_sequence_length() {
        let strategy = SlidingWindowLabeling::new(config());
        for features in [
            vec![],
            vec![feature(FeatureKind::Exon, 0, 10, Strand::Forward)],
            vec![feature(FeatureKind::Intron, 7, 10, Strand::Forward)],
        ] {
            let rec = record(b"ACGTACGTAC", features);
            let mut rows = Vec::new();
            strategy.process(&rec, &mut rows);
            assert_eq!(rows[0][0].len(), rows[0][2].len());
        }
    }

    #[test]
    fn test_uncovered_tail_stays_unknown() {
        let strategy = SlidingWindowLabeling::new(config());
        let rec = record(
            b"ACGTACGTAC",
            vec![feature(FeatureKind::Exon, 0, 4, Strand::Forward)],
        );

        let mut rows = Vec::new();
        strategy.process(&rec, &mut rows);
        assert_eq!(rows[0][2], "EEEEUUUUUU");
    }

    #[test]
    fn test_reverse_last_feature_flips_sequence_but_not_labels() {
        // The sequence follows the last feature's strand while the label
        // array keeps archive orientation. Kept as-is for compatibility
        // with previously produced datasets.
        let strategy = SlidingWindowLabeling::new(config());
        let rec = record(
            b"AAACCCGGGT",
            vec![feature(FeatureKind::Exon, 2, 5, Strand::Reverse)],
        );

        let mut rows = Vec::new();
        strategy.process(&rec, &mut rows);

        assert_eq!(rows[0][0], "ACCCGGGTTT"); // revcomp of the full record
        assert_eq!(rows[0][2], "UUEEEUUUUU"); // labels not reversed
    }

    #[test]
    fn test_unknown_strand_aborts_record() {
        let strategy = SlidingWindowLabeling::new(config());
        let rec = record(
            b"ACGTACGTAC",
            vec![feature(FeatureKind::Exon, 2, 5, Strand::Unknown)],
        );

        let mut rows = Vec::new();
        let outcome = strategy.process(&rec, &mut rows);

        assert_eq!(outcome, RecordOutcome::Skipped(SkipReason::UnknownStrand));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_length_bounds() {
        let mut cfg = config();
        cfg.sequence_max_length = 5;
        let strategy = SlidingWindowLabeling::new(cfg);

        let mut rows = Vec::new();
        let long = record(b"ACGTACGTAC", vec![]);
        assert_eq!(
            strategy.process(&long, &mut rows),
            RecordOutcome::Skipped(SkipReason::TooLong)
        );

        let short = record(b"AC", vec![]);
        assert_eq!(
            strategy.process(&short, &mut rows),
            RecordOutcome::Skipped(SkipReason::TooShort)
        );
        assert!(rows.is_empty());
    }
}

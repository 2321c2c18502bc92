use crate::record::{FeatureKind, SequenceRecord};
use crate::strategy::{ExtractionConfig, OutputRow, RecordOutcome, SkipReason, Strategy};

const FIELDNAMES: &[&str] = &["sequence", "organism", "translation"];

/// Pairs each record's nucleotide sequence with the translation of its
/// first CDS feature. Records without a CDS, or whose first CDS carries no
/// translation qualifier, are skipped.
pub struct ProteinExtraction {
    config: ExtractionConfig,
}

impl ProteinExtraction {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }
}

impl Strategy for ProteinExtraction {
    fn name(&self) -> &'static str {
        "ProteinSeqs"
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

        let first_cds = record
            .features
            .iter()
            .find(|feature| feature.kind == FeatureKind::Cds);

        let translation = match first_cds.and_then(|cds| cds.qualifier("translation")) {
            Some(translation) if !translation.is_empty() => translation,
            _ => return RecordOutcome::Skipped(SkipReason::MissingAnnotation),
        };

        rows.push(vec![
            record.subsequence(0, record.len()),
            record.organism_label().to_string(),
            translation.to_string(),
        ]);

        RecordOutcome::Accepted { skipped_features: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Feature, Strand};

    fn config() -> ExtractionConfig {
        ExtractionConfig {
            sequence_max_length: 100,
            flank_small: 0,
            flank_default: 0,
        }
    }

    fn cds(qualifiers: Vec<(String, String)>) -> Feature {
        Feature {
            kind: FeatureKind::Cds,
            start: 0,
            end: 9,
            strand: Strand::Forward,
            qualifiers,
        }
    }

    fn record(features: Vec<Feature>) -> SequenceRecord {
        SequenceRecord::new(
            "TEST1".to_string(),
            b"ATGAAATAG".to_vec(),
            true,
            Some("Synthetica testii".to_string()),
            features,
        )
    }

    #[test]
    fn test_first_cds_translation_emitted() {
        let strategy = ProteinExtraction::new(config());
        let rec = record(vec![
            cds(vec![("translation".to_string(), "MK".to_string())]),
            cds(vec![("translation".to_string(), "IGNORED".to_string())]),
        ]);

        let mut rows = Vec::new();
        let outcome = strategy.process(&rec, &mut rows);

        assert_eq!(outcome, RecordOutcome::Accepted { skipped_features: 0 });
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], vec!["ATGAAATAG", "Synthetica testii", "MK"]);
    }

    #[test]
    fn test_record_without_cds_is_skipped() {
        let strategy = ProteinExtraction::new(config());
        let rec = record(vec![]);

        let mut rows = Vec::new();
        let outcome = strategy.process(&rec, &mut rows);

        assert_eq!(outcome, RecordOutcome::Skipped(SkipReason::MissingAnnotation));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_cds_without_translation_is_skipped() {
        let strategy = ProteinExtraction::new(config());
        let rec = record(vec![cds(vec![("gene".to_string(), "abcA".to_string())])]);

        let mut rows = Vec::new();
        let outcome = strategy.process(&rec, &mut rows);

        assert_eq!(outcome, RecordOutcome::Skipped(SkipReason::MissingAnnotation));
    }

    #[test]
    fn test_length_bounds() {
        let mut cfg = config();
        cfg.sequence_max_length = 5;
        let strategy = ProteinExtraction::new(cfg);
        let rec = record(vec![cds(vec![("translation".to_string(), "MK".to_string())])]);

        let mut rows = Vec::new();
        assert_eq!(
            strategy.process(&rec, &mut rows),
            RecordOutcome::Skipped(SkipReason::TooLong)
        );
    }
}

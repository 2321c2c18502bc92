use crate::record::{reverse_complement_str, SequenceRecord, Strand};
use crate::strategy::{ExtractionConfig, OutputRow, RecordOutcome, SkipReason, Strategy};

const FIELDNAMES: &[&str] = &["sequence", "builded", "organism"];

struct Site {
    start: usize,
    end: usize,
    label: String,
    sequence: String,
}

/// Rebuilds the whole record as one annotated string: literal gaps between
/// splice sites, each site wrapped in `(type)` markers, reverse-strand
/// sites reverse-complemented individually.
///
/// Record-level policy: any intron/exon with unknown strand abandons the
/// record with no partial output.
pub struct SequenceRebuild {
    config: ExtractionConfig,
}

impl SequenceRebuild {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }
}

impl Strategy for SequenceRebuild {
    fn name(&self) -> &'static str {
        "RebuildSeqs"
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

        let mut sites = Vec::new();
        for feature in record.features.iter().filter(|f| f.kind.is_splice_site()) {
            if feature.strand == Strand::Unknown {
                return RecordOutcome::Skipped(SkipReason::UnknownStrand);
            }

            let site_sequence = record.subsequence(feature.start, feature.end);
            let sequence = match feature.strand {
                Strand::Reverse => reverse_complement_str(&site_sequence),
                _ => site_sequence,
            };

            sites.push(Site {
                start: feature.start,
                end: feature.end,
                label: feature.kind.label().to_string(),
                sequence,
            });
        }

        sites.sort_by_key(|site| site.start);

        let mut builded = String::new();
        let mut last_index = 0;
        for site in &sites {
            // Overlapping sites produce an empty gap, not a failure.
            if site.start > last_index {
                builded.push_str(&record.subsequence(last_index, site.start));
            }
            builded.push_str(&format!("({})", site.label));
            builded.push_str(&site.sequence);
            builded.push_str(&format!("({})", site.label));
            last_index = site.end;
        }
        builded.push_str(&record.subsequence(last_index.min(record.len()), record.len()));

        rows.push(vec![
            record.subsequence(0, record.len()),
            builded,
            record.organism_label().to_string(),
        ]);

        RecordOutcome::Accepted { skipped_features: 0 }
    }
}

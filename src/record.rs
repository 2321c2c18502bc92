//! Domain model for annotated sequence records, decoupled from any
//! particular archive-parsing library.

/// Orientation of a feature on the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
    /// The location did not carry a usable orientation (e.g. a
    /// mixed-strand compound location).
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureKind {
    Exon,
    Intron,
    Cds,
    Other(String),
}

impl FeatureKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "exon" => FeatureKind::Exon,
            "intron" => FeatureKind::Intron,
            "CDS" => FeatureKind::Cds,
            other => FeatureKind::Other(other.to_string()),
        }
    }

    pub fn is_splice_site(&self) -> bool {
        matches!(self, FeatureKind::Exon | FeatureKind::Intron)
    }

    /// Lowercase tag as it appears in dataset labels and rebuild markers.
    pub fn label(&self) -> &str {
        match self {
            FeatureKind::Exon => "exon",
            FeatureKind::Intron => "intron",
            FeatureKind::Cds => "CDS",
            FeatureKind::Other(tag) => tag,
        }
    }

    /// Single-character position code used by sliding-window labeling.
    pub fn position_code(&self) -> u8 {
        match self {
            FeatureKind::Exon => b'E',
            FeatureKind::Intron => b'I',
            _ => b'U',
        }
    }
}

/// An annotated sub-interval of a record's sequence.
///
/// `start..end` is half-open with `start <= end`; the reader guarantees
/// both lie within the record's sequence for resolved records.
#[derive(Debug, Clone)]
pub struct Feature {
    pub kind: FeatureKind,
    pub start: usize,
    pub end: usize,
    pub strand: Strand,
    pub qualifiers: Vec<(String, String)>,
}

impl Feature {
    /// First value of the named qualifier, if present.
    pub fn qualifier(&self, name: &str) -> Option<&str> {
        self.qualifiers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn span(&self) -> usize {
        self.end - self.start
    }
}

/// One annotated sequence entry from the source archive.
#[derive(Debug, Clone)]
pub struct SequenceRecord {
    pub id: String,
    pub sequence: Vec<u8>,
    resolved: bool,
    pub organism: Option<String>,
    pub features: Vec<Feature>,
}

impl SequenceRecord {
    pub fn new(
        id: String,
        sequence: Vec<u8>,
        resolved: bool,
        organism: Option<String>,
        features: Vec<Feature>,
    ) -> Self {
        Self {
            id,
            sequence,
            resolved,
            organism,
            features,
        }
    }

    /// Whether literal sequence symbols exist for this record. Placeholder
    /// entries (CONTIG indirection, not-yet-sequenced data) report false
    /// and are skipped by every strategy.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn organism_label(&self) -> &str {
        self.organism.as_deref().unwrap_or("")
    }

    /// Sub-sequence as a UTF-8 string. Callers pass ranges already
    /// validated against the sequence length.
    pub fn subsequence(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.sequence[start..end]).into_owned()
    }
}

/// Byte-wise complement table. Unmapped bytes pass through unchanged so
/// unexpected symbols survive a round trip instead of corrupting the row.
const COMPLEMENT_TABLE: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = i as u8;
        i += 1;
    }

    table[b'A' as usize] = b'T';
    table[b'T' as usize] = b'A';
    table[b'G' as usize] = b'C';
    table[b'C' as usize] = b'G';
    table[b'a' as usize] = b't';
    table[b't' as usize] = b'a';
    table[b'g' as usize] = b'c';
    table[b'c' as usize] = b'g';

    table[b'U' as usize] = b'A';
    table[b'u' as usize] = b'a';

    // IUPAC ambiguity codes
    table[b'R' as usize] = b'Y';
    table[b'Y' as usize] = b'R';
    table[b'K' as usize] = b'M';
    table[b'M' as usize] = b'K';
    table[b'B' as usize] = b'V';
    table[b'V' as usize] = b'B';
    table[b'D' as usize] = b'H';
    table[b'H' as usize] = b'D';
    table[b'r' as usize] = b'y';
    table[b'y' as usize] = b'r';
    table[b'k' as usize] = b'm';
    table[b'm' as usize] = b'k';
    table[b'b' as usize] = b'v';
    table[b'v' as usize] = b'b';
    table[b'd' as usize] = b'h';
    table[b'h' as usize] = b'd';

    table
};

pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|&base| COMPLEMENT_TABLE[base as usize])
        .collect()
}

pub fn reverse_complement_str(seq: &str) -> String {
    String::from_utf8_lossy(&reverse_complement(seq.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_complement_basic() {
        assert_eq!(reverse_complement(b"ATGC"), b"GCAT");
        assert_eq!(reverse_complement(b"AAACCC"), b"GGGTTT");
        assert_eq!(reverse_complement_str("acgt"), "acgt");
    }

    #[test]
    fn test_reverse_complement_is_involution() {
        let original = b"ACGTRYSWKMBDHVNacgtn".to_vec();
        let twice = reverse_complement(&reverse_complement(&original));
        assert_eq!(twice, original);
    }

    #[test]
    fn test_unmapped_bytes_pass_through() {
        assert_eq!(reverse_complement(b"A-N*T"), b"A*N-T");
    }

    #[test]
    fn test_feature_kind_from_tag() {
        assert_eq!(FeatureKind::from_tag("exon"), FeatureKind::Exon);
        assert_eq!(FeatureKind::from_tag("intron"), FeatureKind::Intron);
        assert_eq!(FeatureKind::from_tag("CDS"), FeatureKind::Cds);
        // Matching is exact, as in the annotation format itself.
        assert_eq!(
            FeatureKind::from_tag("Exon"),
            FeatureKind::Other("Exon".to_string())
        );
        assert!(FeatureKind::Exon.is_splice_site());
        assert!(!FeatureKind::Cds.is_splice_site());
    }

    #[test]
    fn test_position_codes() {
        assert_eq!(FeatureKind::Exon.position_code(), b'E');
        assert_eq!(FeatureKind::Intron.position_code(), b'I');
        assert_eq!(FeatureKind::Cds.position_code(), b'U');
    }

    #[test]
    fn test_feature_qualifier_lookup() {
        let feature = Feature {
            kind: FeatureKind::Cds,
            start: 0,
            end: 9,
            strand: Strand::Forward,
            qualifiers: vec![
                ("gene".to_string(), "abcA".to_string()),
                ("translation".to_string(), "MKL".to_string()),
            ],
        };
        assert_eq!(feature.qualifier("gene"), Some("abcA"));
        assert_eq!(feature.qualifier("translation"), Some("MKL"));
        assert_eq!(feature.qualifier("product"), None);
        assert_eq!(feature.span(), 9);
    }

    #[test]
    fn test_record_accessors() {
        let record = SequenceRecord::new(
            "TEST1".to_string(),
            b"ACGTACGTAC".to_vec(),
            true,
            Some("Synthetica testii".to_string()),
            vec![],
        );
        assert!(record.is_resolved());
        assert_eq!(record.len(), 10);
        assert_eq!(record.subsequence(2, 5), "GTA");
        assert_eq!(record.organism_label(), "Synthetica testii");

        let placeholder = SequenceRecord::new("TEST2".to_string(), vec![], false, None, vec![]);
        assert!(!placeholder.is_resolved());
        assert_eq!(placeholder.organism_label(), "");
    }
}

use crate::error::{ExtractError, Result};
use crate::record::{Feature, FeatureKind, SequenceRecord, Strand};
use gb_io::reader::SeqReader;
use gb_io::seq::{Location, Seq};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Lazy, forward-only reader over a GenBank flat-file archive.
///
/// Records come back in file order. A malformed individual entry is counted
/// and skipped; only failure to open the archive is fatal. Not restartable
/// without reopening.
#[derive(Debug)]
pub struct GenbankReader {
    inner: SeqReader<BufReader<File>>,
    source_path: PathBuf,
    malformed: u64,
}

impl GenbankReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ExtractError::ArchiveOpen {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            inner: SeqReader::new(BufReader::new(file)),
            source_path: path.to_path_buf(),
            malformed: 0,
        })
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Number of entries that failed to parse and were skipped so far.
    pub fn malformed_count(&self) -> u64 {
        self.malformed
    }
}

impl Iterator for GenbankReader {
    type Item = SequenceRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(seq) => return Some(map_seq(seq)),
                Err(_) => {
                    self.malformed += 1;
                    continue;
                }
            }
        }
    }
}

/// Map a parsed GenBank entry into the domain model.
///
/// Features whose bounds cannot be resolved, or that fall outside the
/// record's sequence, are dropped here so the strategies only ever see
/// `start <= end <= len`.
pub fn map_seq(seq: Seq) -> SequenceRecord {
    // CONTIG-only and placeholder entries carry no literal symbols.
    let resolved = !seq.seq.is_empty() && seq.contig.is_none();
    let len = seq.seq.len();

    let id = seq
        .name
        .clone()
        .or_else(|| seq.accession.clone())
        .unwrap_or_default();

    let organism = seq.source.as_ref().and_then(|s| s.organism.clone());

    let features = seq
        .features
        .iter()
        .filter_map(|feature| map_feature(feature, len, resolved))
        .collect();

    SequenceRecord::new(id, seq.seq, resolved, organism, features)
}

fn map_feature(
    feature: &gb_io::seq::Feature,
    sequence_len: usize,
    resolved: bool,
) -> Option<Feature> {
    let (from, to) = feature.location.find_bounds().ok()?;
    if from < 0 || to < from {
        return None;
    }
    let start = from as usize;
    let end = to as usize;
    if resolved && end > sequence_len {
        return None;
    }

    let qualifiers = feature
        .qualifiers
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone().unwrap_or_default()))
        .collect();

    Some(Feature {
        kind: FeatureKind::from_tag(&feature.kind.to_string()),
        start,
        end,
        strand: location_strand(&feature.location),
        qualifiers,
    })
}

/// Derive one orientation for a whole location tree. A `complement(...)`
/// wrapper flips everything beneath it; spans that disagree (mixed-strand
/// joins) yield `Unknown`, as does a location with no concrete span.
fn location_strand(location: &Location) -> Strand {
    let mut strands = Vec::new();
    collect_strands(location, false, &mut strands);

    if strands.is_empty() {
        return Strand::Unknown;
    }
    if strands.iter().all(|&reverse| !reverse) {
        Strand::Forward
    } else if strands.iter().all(|&reverse| reverse) {
        Strand::Reverse
    } else {
        Strand::Unknown
    }
}

fn collect_strands(location: &Location, reverse: bool, strands: &mut Vec<bool>) {
    match location {
        Location::Range(_, _) | Location::Between(_, _) => strands.push(reverse),
        Location::Complement(inner) => collect_strands(inner, !reverse, strands),
        Location::Join(parts)
        | Location::Order(parts)
        | Location::Bond(parts)
        | Location::OneOf(parts) => {
            for part in parts {
                collect_strands(part, reverse, strands);
            }
        }
        Location::External(_, maybe_loc) => {
            if let Some(loc) = maybe_loc {
                collect_strands(loc, reverse, strands);
            }
        }
        Location::Gap(_) => {}
    }
}

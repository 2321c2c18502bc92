pub mod genbank_reader;

pub use genbank_reader::{map_seq, GenbankReader};

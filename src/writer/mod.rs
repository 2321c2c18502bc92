pub mod dedup_writer;

pub use dedup_writer::{DedupWriter, WriteSummary};

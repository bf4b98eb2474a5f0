// Training: derive lookup tables from labeled English/Hindi pairs
//
// - align: word alignment capability and the built-in positional heuristic
// - ingest: batch ingestion, full rebuild and the shared merge procedure

pub mod align;
pub mod ingest;

pub use align::{Aligner, NaivePositionalAligner};
pub use ingest::{IngestOutcome, RawTrainingPair, RebuildOutcome, TrainingIngestor, merge_pair};

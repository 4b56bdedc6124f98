use serde::{Deserialize, Serialize};

pub use crate::types::{Diagnostic, RelativePath, RowId, Transcript};

/// One validated corpus entry prior to sharding.
///
/// Produced by a scanner; `path` is relative to the corpus audio root and
/// is guaranteed to reference an existing file no larger than
/// [`crate::constants::scan::MAX_AUDIO_BYTES`] at scan time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Audio file path relative to the corpus audio root.
    pub path: RelativePath,
    /// Encoded audio file size in bytes.
    pub size: u64,
    /// Cleaned transcript (see [`crate::text::clean`]).
    pub sentence: Transcript,
    /// Transcript as found in the source corpus.
    pub original: Transcript,
}

/// Result of scanning one corpus source: validated rows plus diagnostics
/// for entries that were dropped.
#[derive(Clone, Debug, Default)]
pub struct ScanOutcome {
    /// Rows that passed existence and size validation.
    pub rows: Vec<Row>,
    /// Human-readable messages for dropped entries; never fatal.
    pub errors: Vec<Diagnostic>,
}

impl ScanOutcome {
    /// Fold another outcome into this one, preserving order.
    pub fn extend(&mut self, other: ScanOutcome) {
        self.rows.extend(other.rows);
        self.errors.extend(other.errors);
    }
}

/// One serialized record inside a shard file.
///
/// The uuid is generated at shard-write time and keys the split label map.
/// Inline transcripts are carried only for corpora configured to embed
/// them in the record itself.
#[derive(Clone, Debug, PartialEq, bitcode::Encode, bitcode::Decode)]
pub struct AudioRecord {
    /// Unique row identifier; keys the label map in split metadata.
    pub uuid: RowId,
    /// Decoded audio samples, flattened to one sequence.
    pub audio: Vec<f32>,
    /// Cleaned transcript, when embedded inline.
    pub sentence: Option<Transcript>,
    /// Original transcript, when embedded inline.
    pub original: Option<Transcript>,
}

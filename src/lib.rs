#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// WAV decoding helpers used by the shard writer.
pub mod audio;
/// Centralized constants used across scanning, sharding, and metadata.
pub mod constants;
/// Row, scan-outcome, and serialized-record types.
pub mod data;
/// Split/dataset/collection accessor facades.
pub mod dataset;
/// Split metadata sidecars.
pub mod metadata;
/// Offline per-corpus preparation pipeline.
pub mod pipeline;
/// Append-only record container files.
pub mod recordio;
/// Corpus scanners, one per source layout.
pub mod scan;
/// Shard writer.
pub mod shard;
/// Intermediate tabular row sidecars.
pub mod sidecar;
/// Split labels and stratified assignment.
pub mod splitter;
/// Shuffled record streams.
pub mod stream;
/// Transcript normalization.
pub mod text;
/// Shared type aliases.
pub mod types;

mod errors;

pub use data::{AudioRecord, Row, ScanOutcome};
pub use dataset::{Dataset, MultiSet, MultiSplit, Split};
pub use errors::PipelineError;
pub use metadata::{DtypeTag, SplitMetadata};
pub use pipeline::{
    CommonVoiceConfig, LibriSpeechConfig, PrepareReport, VoxForgeConfig, prepare_common_voice,
    prepare_librispeech, prepare_voxforge,
};
pub use shard::{ShardConfig, write_split};
pub use splitter::{SplitAssignment, SplitLabel, SplitProbs, assign};
pub use stream::{RecordStream, RecordStreamIter};
pub use text::clean;

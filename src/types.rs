/// Name of a corpus within the collection.
/// Examples: `common_voice`, `librispeech`, `voxforge`
pub type CorpusName = String;
/// Audio file path relative to a corpus root.
/// Example: `anonymous-20080701-xzb/wav/b0167.wav`
pub type RelativePath = String;
/// Transcript text, original or cleaned.
/// Example: `hello world isn't it nice`
pub type Transcript = String;
/// Generated per-row unique identifier used to key labels.
/// Example: `3b9e1d10-41a2-4f7e-9a57-0f6f5f1c2ab3`
pub type RowId = String;
/// Shard file name within a split's data directory.
/// Example: `train-0003-of-0017.rec`
pub type ShardName = String;
/// Human-readable validation diagnostic collected during scanning.
/// Example: `Missing file: /corpora/voxforge/extracted/foo/wav/a1.wav`
pub type Diagnostic = String;

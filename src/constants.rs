use crate::splitter::SplitLabel;

/// Constants used by corpus scanners and row validation.
pub mod scan {
    /// Maximum encoded audio file size accepted at scan time.
    ///
    /// 680 kB is ~21.25 seconds at 16 kHz, 16-bit. Checked against the
    /// encoded file, not the decoded sample count.
    pub const MAX_AUDIO_BYTES: u64 = 680_000;

    /// Prompt file names recognized inside a VoxForge archive's `etc/`
    /// directory, in priority order. The first existing one wins.
    pub const VOXFORGE_PROMPT_NAMES: [&str; 9] = [
        "prompts-original",
        "prompt.txt",
        "prompts.txt",
        "cc.prompts",
        "therainbowpassage.prompt",
        "Transcriptions.txt",
        "a13.text",
        "rp.text",
        "PROMPTS",
    ];

    /// Audio subdirectory names probed inside a VoxForge archive, in order.
    pub const VOXFORGE_AUDIO_DIRS: [&str; 2] = ["wav", "flac"];

    /// Suffix identifying LibriSpeech transcript files.
    pub const LIBRISPEECH_TRANS_SUFFIX: &str = ".trans.txt";
}

/// Constants used by the shard writer.
pub mod shard {
    /// Decoded-size expansion factor: 16-bit samples decode to 32-bit floats.
    pub const DECODE_EXPANSION: u64 = 2;
    /// File extension for shard record files.
    pub const SHARD_EXT: &str = "rec";
    /// Largest worker-pool size the shard writer will use.
    ///
    /// Shard writing is I/O bound; more concurrent readers/writers than
    /// this degrade throughput.
    pub const MAX_WORKERS: usize = 8;
    /// Default worker-pool size.
    pub const DEFAULT_WORKERS: usize = 2;
    /// Default shard size bound (256 MiB).
    pub const DEFAULT_MAX_SHARD_BYTES: u64 = 256 * 1024 * 1024;
    /// Shard size bound used for Common Voice (200 MiB).
    pub const COMMON_VOICE_MAX_SHARD_BYTES: u64 = 200 * 1024 * 1024;
    /// Sanity bound on a single serialized record read back from a shard.
    pub const MAX_RECORD_BYTES: u32 = 1 << 30;
}

/// Constants used by audio decoding and duration capping.
pub mod audio {
    /// Target audio sample rate for all prepared corpora.
    pub const SAMPLE_RATE: u32 = 16_000;
    /// Decoded-duration cap applied to Common Voice audio (15 s @ 16 kHz).
    ///
    /// Some Common Voice files carry long trailing silence; capping bounds
    /// worst-case shard memory during training.
    pub const COMMON_VOICE_MAX_SAMPLES: usize = 15 * SAMPLE_RATE as usize;
}

/// Constants used by split metadata sidecars.
pub mod metadata {
    /// File extension for per-split metadata sidecars.
    pub const METADATA_EXT: &str = "json";
    /// Serialized tag for 32-bit float audio samples.
    pub const DTYPE_F32: &str = "float32";
}

/// Canonical split iteration order used when preparing and composing splits.
pub const ALL_SPLITS: [SplitLabel; 3] = [SplitLabel::Train, SplitLabel::Valid, SplitLabel::Test];

//! Corpus scanners.
//!
//! One scanner per source layout: tab-separated manifests (Common Voice),
//! transcript-file trees (LibriSpeech), and prompt-file archive trees
//! (VoxForge). All three validate candidate rows the same way: the
//! referenced audio file must exist and its encoded size must not exceed
//! [`crate::constants::scan::MAX_AUDIO_BYTES`]. Failing rows are dropped
//! with one diagnostic string; the scan itself keeps going.

use std::fs;
use std::path::Path;

use crate::constants::scan::MAX_AUDIO_BYTES;
use crate::types::Diagnostic;

/// Common Voice tab-separated manifest scanner.
pub mod common_voice;
/// LibriSpeech `*.trans.txt` tree scanner.
pub mod librispeech;
/// VoxForge prompt-file archive scanner.
pub mod voxforge;

/// Validate one candidate audio file, returning its encoded size.
///
/// Size and existence are checked against the encoded file on disk, not
/// the decoded sample count.
pub(crate) fn validated_size(path: &Path) -> Result<u64, Diagnostic> {
    let Ok(meta) = fs::metadata(path) else {
        return Err(format!("Missing file: {}", path.display()));
    };
    let size = meta.len();
    if size > MAX_AUDIO_BYTES {
        return Err(format!("Long file: {}", path.display()));
    }
    Ok(size)
}

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::constants::scan::{VOXFORGE_AUDIO_DIRS, VOXFORGE_PROMPT_NAMES};
use crate::data::{Row, ScanOutcome};
use crate::errors::PipelineError;
use crate::scan::validated_size;
use crate::text::clean;

/// Scan every VoxForge archive directory under `extracted_root`.
///
/// Archives are processed in name order so a seeded downstream split
/// sees a stable row sequence. An archive missing its audio directory or
/// prompt file contributes a single diagnostic and zero rows.
pub fn scan_archives(extracted_root: &Path) -> Result<ScanOutcome, PipelineError> {
    let mut archives: Vec<PathBuf> = fs::read_dir(extracted_root)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    archives.sort();

    let mut outcome = ScanOutcome::default();
    for archive in &archives {
        outcome.extend(scan_archive(archive, extracted_root)?);
    }
    debug!(
        root = %extracted_root.display(),
        archives = archives.len(),
        rows = outcome.rows.len(),
        dropped = outcome.errors.len(),
        "scanned prompt archives"
    );
    Ok(outcome)
}

/// Scan a single archive directory.
///
/// The archive must contain an audio subdirectory (`wav/`, falling back
/// to `flac/`) and one prompt file under `etc/` chosen by first match
/// from the fixed priority list.
pub fn scan_archive(archive: &Path, extracted_root: &Path) -> Result<ScanOutcome, PipelineError> {
    let mut outcome = ScanOutcome::default();

    let Some(audio_dir) = VOXFORGE_AUDIO_DIRS
        .iter()
        .map(|name| archive.join(name))
        .find(|dir| dir.is_dir())
    else {
        outcome.errors.push(format!("Missing audio dir: {}", archive.display()));
        return Ok(outcome);
    };

    let Some(prompt_path) = VOXFORGE_PROMPT_NAMES
        .iter()
        .map(|name| archive.join("etc").join(name))
        .find(|path| path.is_file())
    else {
        outcome.errors.push(format!("Missing prompts: {}", archive.display()));
        return Ok(outcome);
    };

    let audio_rel = audio_dir
        .strip_prefix(extracted_root)
        .map_err(|_| PipelineError::Manifest {
            path: archive.to_path_buf(),
            reason: "archive is outside the extracted root".to_string(),
        })?
        .to_path_buf();

    let body = fs::read_to_string(&prompt_path)?;
    for line in body.lines() {
        let Some((name, original)) = line.split_once(' ') else {
            continue;
        };

        // Prompt ids are sometimes full paths; only the basename matters.
        let Some(stem) = Path::new(name).file_name().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let rel = audio_rel.join(format!("{stem}.wav"));
        let resolved = extracted_root.join(&rel);
        match validated_size(&resolved) {
            Err(diagnostic) => outcome.errors.push(diagnostic),
            Ok(size) => outcome.rows.push(Row {
                path: rel.to_string_lossy().into_owned(),
                size,
                sentence: clean(original),
                original: original.to_string(),
            }),
        }
    }
    Ok(outcome)
}

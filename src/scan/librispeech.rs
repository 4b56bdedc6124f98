use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::constants::scan::LIBRISPEECH_TRANS_SUFFIX;
use crate::data::{Row, ScanOutcome};
use crate::errors::PipelineError;
use crate::scan::validated_size;
use crate::text::clean;

/// Scan one LibriSpeech part (e.g. `train-clean-100`) for transcript rows.
///
/// Each chapter directory holds one `*.trans.txt` file with
/// `id transcript` lines; the matching audio lives beside it as
/// `<id>.wav`. Row paths are stored relative to `corpus_root`. Lines that
/// do not split into an id and a remainder are skipped silently.
pub fn scan_part(part_root: &Path, corpus_root: &Path) -> Result<ScanOutcome, PipelineError> {
    let mut trans_paths: Vec<_> = WalkDir::new(part_root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(LIBRISPEECH_TRANS_SUFFIX))
        })
        .map(|entry| entry.into_path())
        .collect();
    trans_paths.sort();

    let mut outcome = ScanOutcome::default();
    for trans_path in &trans_paths {
        outcome.extend(scan_trans_file(trans_path, corpus_root)?);
    }
    debug!(
        part = %part_root.display(),
        transcripts = trans_paths.len(),
        rows = outcome.rows.len(),
        dropped = outcome.errors.len(),
        "scanned transcript tree"
    );
    Ok(outcome)
}

fn scan_trans_file(trans_path: &Path, corpus_root: &Path) -> Result<ScanOutcome, PipelineError> {
    let audio_dir = trans_path
        .parent()
        .and_then(|parent| parent.strip_prefix(corpus_root).ok())
        .ok_or_else(|| PipelineError::Manifest {
            path: trans_path.to_path_buf(),
            reason: "transcript file is outside the corpus root".to_string(),
        })?;
    let body = fs::read_to_string(trans_path)?;

    let mut outcome = ScanOutcome::default();
    for line in body.lines() {
        let Some((name, original)) = line.split_once(' ') else {
            continue;
        };

        let rel = audio_dir.join(format!("{name}.wav"));
        let resolved = corpus_root.join(&rel);
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn scan_walks_chapter_directories() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let chapter = root.join("train-clean-100/19/198");
        fs::create_dir_all(&chapter).unwrap();
        fs::write(
            chapter.join("19-198.trans.txt"),
            "19-198-0000 NORTHANGER ABBEY\n19-198-0001 IT'S FINE\nmalformed_line_without_space\n",
        )
        .unwrap();
        fs::write(chapter.join("19-198-0000.wav"), vec![0u8; 32]).unwrap();
        fs::write(chapter.join("19-198-0001.wav"), vec![0u8; 48]).unwrap();

        let outcome = scan_part(&root.join("train-clean-100"), root).unwrap();
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.rows[0].path, "train-clean-100/19/198/19-198-0000.wav");
        assert_eq!(outcome.rows[0].sentence, "northanger abbey");
        assert_eq!(outcome.rows[1].sentence, "it's fine");
    }

    #[test]
    fn scan_reports_missing_audio_and_keeps_going() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let chapter = root.join("dev-clean/84/121123");
        fs::create_dir_all(&chapter).unwrap();
        fs::write(
            chapter.join("84-121123.trans.txt"),
            "84-121123-0000 MISSING AUDIO\n84-121123-0001 PRESENT AUDIO\n",
        )
        .unwrap();
        fs::write(chapter.join("84-121123-0001.wav"), vec![0u8; 16]).unwrap();

        let outcome = scan_part(&root.join("dev-clean"), root).unwrap();
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("84-121123-0000.wav"));
    }

    #[test]
    fn scan_of_empty_part_is_empty() {
        let dir = tempdir().unwrap();
        let part = dir.path().join("test-clean");
        fs::create_dir_all(&part).unwrap();
        let outcome = scan_part(&part, dir.path()).unwrap();
        assert!(outcome.rows.is_empty());
        assert!(outcome.errors.is_empty());
    }
}

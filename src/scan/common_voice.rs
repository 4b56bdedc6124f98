use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::data::{Row, ScanOutcome};
use crate::errors::PipelineError;
use crate::scan::validated_size;
use crate::text::clean;

/// Columns of interest in a Common Voice tsv manifest; the remaining
/// columns (client id, votes, demographics) are ignored.
#[derive(Debug, Deserialize)]
struct ManifestRow {
    path: String,
    sentence: String,
}

/// Scan one tab-separated manifest (`dev.tsv`, `test.tsv` or `train.tsv`).
///
/// Each manifest row names a clip and its sentence; the matching audio
/// file is the clip name with its extension replaced by `.wav`, resolved
/// under `audio_root`. Rows whose audio is missing or oversized are
/// dropped with a diagnostic. Rows the tsv reader cannot parse are
/// skipped silently.
pub fn scan(tsv_path: &Path, audio_root: &Path) -> Result<ScanOutcome, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_path(tsv_path)
        .map_err(|err| PipelineError::Manifest {
            path: tsv_path.to_path_buf(),
            reason: err.to_string(),
        })?;

    let mut outcome = ScanOutcome::default();
    for result in reader.deserialize::<ManifestRow>() {
        let Ok(record) = result else { continue };

        let name = Path::new(&record.path).with_extension("wav");
        let resolved = audio_root.join(&name);
        match validated_size(&resolved) {
            Err(diagnostic) => outcome.errors.push(diagnostic),
            Ok(size) => outcome.rows.push(Row {
                path: name.to_string_lossy().into_owned(),
                size,
                sentence: clean(&record.sentence),
                original: record.sentence,
            }),
        }
    }
    debug!(
        manifest = %tsv_path.display(),
        rows = outcome.rows.len(),
        dropped = outcome.errors.len(),
        "scanned tab-separated manifest"
    );
    Ok(outcome)
}

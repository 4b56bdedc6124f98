use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;
use crate::types::{RowId, ShardName, Transcript};

/// Data type tag for decoded audio samples.
///
/// A closed set so metadata from a newer writer fails loudly instead of
/// being silently misinterpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DtypeTag {
    /// 32-bit IEEE float samples.
    #[serde(rename = "float32")]
    F32,
}

impl fmt::Display for DtypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(crate::constants::metadata::DTYPE_F32)
    }
}

/// Sidecar metadata describing one prepared split.
///
/// `files` keeps shard order; `labels` keeps insertion order and maps each
/// record's uuid to its cleaned transcript.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitMetadata {
    /// Audio sample rate shared by every record in the split.
    pub sample_rate: u32,
    /// Sample data type tag.
    pub dtype: DtypeTag,
    /// Shard file names relative to the split's data root, in shard order.
    pub files: Vec<ShardName>,
    /// uuid → cleaned transcript for every record in the split.
    pub labels: IndexMap<RowId, Transcript>,
}

impl SplitMetadata {
    /// Persist this metadata as a JSON sidecar at `path`.
    pub fn save(&self, path: &Path) -> Result<(), PipelineError> {
        let body = serde_json::to_string(self)
            .map_err(|err| PipelineError::Metadata(format!("failed to encode metadata: {err}")))?;
        fs::write(path, body)?;
        Ok(())
    }

    /// Load a metadata sidecar from `path`.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let body = fs::read_to_string(path)?;
        serde_json::from_str(&body).map_err(|err| {
            PipelineError::Metadata(format!("corrupt metadata {}: {err}", path.display()))
        })
    }
}

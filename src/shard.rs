//! Shard writer: turns one split's rows into bounded-size record files
//! plus the split's metadata sidecar.

use std::path::Path;

use indexmap::IndexMap;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use tracing::{debug, info};
use uuid::Uuid;

use crate::audio::{decode_wav, truncate};
use crate::constants::audio::SAMPLE_RATE;
use crate::constants::shard::{
    DECODE_EXPANSION, DEFAULT_MAX_SHARD_BYTES, DEFAULT_WORKERS, MAX_WORKERS, SHARD_EXT,
};
use crate::data::Row;
use crate::errors::PipelineError;
use crate::metadata::{DtypeTag, SplitMetadata};
use crate::splitter::SplitLabel;
use crate::types::{RowId, ShardName, Transcript};

/// Per-corpus shard writer configuration.
#[derive(Clone, Debug)]
pub struct ShardConfig {
    /// Upper bound on projected decoded bytes per shard.
    pub max_shard_bytes: u64,
    /// Optional decoded-duration cap in samples, applied per row.
    pub max_samples: Option<usize>,
    /// Embed cleaned and original transcripts in each record, in addition
    /// to the uuid-keyed label map.
    pub inline_transcripts: bool,
    /// Worker pool size; clamped to `1..=8` (I/O bound work).
    pub workers: usize,
    /// Seed for the split-level row shuffle.
    pub seed: u64,
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self {
            max_shard_bytes: DEFAULT_MAX_SHARD_BYTES,
            max_samples: None,
            inline_transcripts: false,
            workers: DEFAULT_WORKERS,
            seed: 42,
        }
    }
}

/// Shuffle a split's rows and compute how many rows fit one shard.
///
/// The row budget projects decoded size from the median encoded size:
/// 16-bit samples decode to 32-bit floats (×2), and rows subject to a
/// duration cap are clipped to the cap's encoded size before taking the
/// median, since they will be truncated at decode time.
fn shard_plan(mut rows: Vec<Row>, config: &ShardConfig) -> (Vec<Row>, usize) {
    let mut rng = StdRng::seed_from_u64(config.seed);
    rows.shuffle(&mut rng);

    let mut sizes: Vec<u64> = rows.iter().map(|row| row.size).collect();
    if let Some(cap) = config.max_samples {
        let encoded_cap = 2 * cap as u64;
        for size in &mut sizes {
            *size = (*size).min(encoded_cap);
        }
    }
    let projected = DECODE_EXPANSION * median(&mut sizes);
    let files_per_shard = (config.max_shard_bytes / projected.max(1)).max(1) as usize;
    (rows, files_per_shard)
}

fn median(sizes: &mut [u64]) -> u64 {
    if sizes.is_empty() {
        return 0;
    }
    sizes.sort_unstable();
    let mid = sizes.len() / 2;
    if sizes.len() % 2 == 1 {
        sizes[mid]
    } else {
        (sizes[mid - 1] + sizes[mid]) / 2
    }
}

/// Shard file name for `index` out of `total`, e.g. `train-0002-of-0017.rec`.
fn shard_name(split: SplitLabel, index: usize, total: usize) -> ShardName {
    format!("{split}-{index:04}-of-{total:04}.{SHARD_EXT}")
}

struct ShardDone {
    name: ShardName,
    labels: IndexMap<RowId, Transcript>,
}

/// Write one split's rows as shard files under `out_dir` and return the
/// split's metadata.
///
/// Rows are shuffled once (seeded), grouped into consecutive shards, and
/// written by a bounded worker pool; each worker owns one shard file for
/// its duration. A decode failure on any row aborts the whole run:
/// scanning already filtered for existing, size-bounded files, so decode
/// failure signals environment breakage rather than bad data.
pub fn write_split(
    rows: Vec<Row>,
    split: SplitLabel,
    audio_root: &Path,
    out_dir: &Path,
    config: &ShardConfig,
) -> Result<SplitMetadata, PipelineError> {
    std::fs::create_dir_all(out_dir)?;

    let total_rows = rows.len();
    let (rows, files_per_shard) = shard_plan(rows, config);
    let chunks: Vec<&[Row]> = rows.chunks(files_per_shard).collect();
    let shard_count = chunks.len();
    info!(%split, rows = total_rows, files_per_shard, shards = shard_count, "writing shards");

    let workers = config.workers.clamp(1, MAX_WORKERS);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|err| PipelineError::Configuration(format!("worker pool: {err}")))?;

    let done: Vec<ShardDone> = pool.install(|| {
        chunks
            .par_iter()
            .enumerate()
            .map(|(index, chunk)| {
                let name = shard_name(split, index, shard_count);
                write_shard(chunk, &out_dir.join(&name), audio_root, config).map(|labels| {
                    ShardDone { name, labels }
                })
            })
            .collect::<Result<_, PipelineError>>()
    })?;

    let mut files = Vec::with_capacity(done.len());
    let mut labels = IndexMap::with_capacity(total_rows);
    for shard in done {
        files.push(shard.name);
        labels.extend(shard.labels);
    }
    Ok(SplitMetadata {
        sample_rate: SAMPLE_RATE,
        dtype: DtypeTag::F32,
        files,
        labels,
    })
}

fn write_shard(
    rows: &[Row],
    shard_path: &Path,
    audio_root: &Path,
    config: &ShardConfig,
) -> Result<IndexMap<RowId, Transcript>, PipelineError> {
    let mut writer = crate::recordio::RecordWriter::create(shard_path)?;
    let mut labels = IndexMap::with_capacity(rows.len());
    for row in rows {
        let audio = decode_wav(&audio_root.join(&row.path))?;
        let audio = truncate(audio, config.max_samples);
        let uuid = Uuid::new_v4().to_string();
        let record = crate::data::AudioRecord {
            uuid: uuid.clone(),
            audio,
            sentence: config.inline_transcripts.then(|| row.sentence.clone()),
            original: config.inline_transcripts.then(|| row.original.clone()),
        };
        writer.append(&record)?;
        labels.insert(uuid, row.sentence.clone());
    }
    debug!(shard = %shard_path.display(), rows = writer.written(), "shard written");
    writer.finish()?;
    Ok(labels)
}

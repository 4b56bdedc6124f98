//! Offline per-corpus preparation: scan → split → row table → shards →
//! metadata. Each corpus is prepared once; a crash mid-run leaves
//! truncated shards, and the corpus is simply re-run from scratch.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::constants::audio::COMMON_VOICE_MAX_SAMPLES;
use crate::constants::shard::{COMMON_VOICE_MAX_SHARD_BYTES, MAX_WORKERS};
use crate::data::{Row, ScanOutcome};
use crate::errors::PipelineError;
use crate::scan::{common_voice, librispeech, voxforge};
use crate::shard::{ShardConfig, write_split};
use crate::sidecar::write_table;
use crate::splitter::{SplitAssignment, SplitLabel, SplitProbs, assign};
use crate::types::{CorpusName, Diagnostic};

/// Summary of one corpus preparation run.
///
/// Scan diagnostics are collected here rather than aborting the run, so
/// the operator can remediate (re-download missing clips) and re-run.
#[derive(Clone, Debug)]
pub struct PrepareReport {
    /// Corpus that was prepared.
    pub corpus: CorpusName,
    /// Row count per prepared split.
    pub split_rows: Vec<(SplitLabel, usize)>,
    /// Validation diagnostics accumulated while scanning.
    pub errors: Vec<Diagnostic>,
}

/// Configuration for preparing a Common Voice corpus tree.
#[derive(Clone, Debug)]
pub struct CommonVoiceConfig {
    /// Directory holding `dev.tsv`, `test.tsv` and `train.tsv`.
    pub extracted_dir: PathBuf,
    /// Directory holding the corpus wav files; row tables land here too.
    pub audio_dir: PathBuf,
    /// Output directory for shards and metadata sidecars.
    pub out_dir: PathBuf,
    /// Shard writer settings.
    pub shard: ShardConfig,
}

impl CommonVoiceConfig {
    /// Common Voice defaults: 200 MiB shards, 15 s duration cap, inline
    /// transcripts, two workers.
    pub fn new(
        extracted_dir: impl Into<PathBuf>,
        audio_dir: impl Into<PathBuf>,
        out_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            extracted_dir: extracted_dir.into(),
            audio_dir: audio_dir.into(),
            out_dir: out_dir.into(),
            shard: ShardConfig {
                max_shard_bytes: COMMON_VOICE_MAX_SHARD_BYTES,
                max_samples: Some(COMMON_VOICE_MAX_SAMPLES),
                inline_transcripts: true,
                ..ShardConfig::default()
            },
        }
    }
}

/// Prepare a Common Voice corpus.
///
/// Split membership is authoritative: each tsv manifest feeds exactly one
/// split (`dev` → valid).
pub fn prepare_common_voice(config: &CommonVoiceConfig) -> Result<PrepareReport, PipelineError> {
    let manifests = [
        ("dev.tsv", SplitLabel::Valid),
        ("test.tsv", SplitLabel::Test),
        ("train.tsv", SplitLabel::Train),
    ];

    let mut report = PrepareReport {
        corpus: "common_voice".to_string(),
        split_rows: Vec::new(),
        errors: Vec::new(),
    };
    for (tsv_name, label) in manifests {
        let tsv_path = config.extracted_dir.join(tsv_name);
        info!(manifest = %tsv_path.display(), "processing");
        let outcome = common_voice::scan(&tsv_path, &config.audio_dir)?;
        report.errors.extend(outcome.errors);

        let table = table_path(&config.audio_dir, tsv_name);
        prepare_split(
            outcome.rows,
            label,
            &config.audio_dir,
            &table,
            &config.out_dir,
            &config.shard,
            &mut report,
        )?;
    }
    Ok(report)
}

/// Configuration for preparing a LibriSpeech corpus tree.
#[derive(Clone, Debug)]
pub struct LibriSpeechConfig {
    /// The extracted `LibriSpeech` root holding the part directories.
    pub extracted_dir: PathBuf,
    /// Output directory for shards and metadata sidecars.
    pub out_dir: PathBuf,
    /// Shard writer settings.
    pub shard: ShardConfig,
}

impl LibriSpeechConfig {
    /// LibriSpeech defaults: 256 MiB shards, uuid-only records, the full
    /// worker pool.
    pub fn new(extracted_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            extracted_dir: extracted_dir.into(),
            out_dir: out_dir.into(),
            shard: ShardConfig {
                workers: MAX_WORKERS,
                ..ShardConfig::default()
            },
        }
    }
}

/// Prepare a LibriSpeech corpus.
///
/// Split membership is authoritative: named part directories feed each
/// split (`train-clean-100` + `train-clean-360` → train, `dev-clean` →
/// valid, `test-clean` → test).
pub fn prepare_librispeech(config: &LibriSpeechConfig) -> Result<PrepareReport, PipelineError> {
    let parts: [(SplitLabel, &[&str]); 3] = [
        (SplitLabel::Train, &["train-clean-100", "train-clean-360"]),
        (SplitLabel::Valid, &["dev-clean"]),
        (SplitLabel::Test, &["test-clean"]),
    ];

    let mut report = PrepareReport {
        corpus: "librispeech".to_string(),
        split_rows: Vec::new(),
        errors: Vec::new(),
    };
    for (label, part_names) in parts {
        let mut outcome = ScanOutcome::default();
        for part_name in part_names {
            info!(part = part_name, "processing");
            outcome.extend(librispeech::scan_part(
                &config.extracted_dir.join(part_name),
                &config.extracted_dir,
            )?);
        }
        report.errors.extend(std::mem::take(&mut outcome.errors));

        let table = table_path(&config.extracted_dir, &format!("{label}.json"));
        prepare_split(
            outcome.rows,
            label,
            &config.extracted_dir,
            &table,
            &config.out_dir,
            &config.shard,
            &mut report,
        )?;
    }
    Ok(report)
}

/// Configuration for preparing a VoxForge corpus tree.
#[derive(Clone, Debug)]
pub struct VoxForgeConfig {
    /// Directory holding the extracted archive directories.
    pub extracted_dir: PathBuf,
    /// Output directory for shards and metadata sidecars.
    pub out_dir: PathBuf,
    /// Shard writer settings.
    pub shard: ShardConfig,
    /// Stratified split probabilities.
    pub split_probs: SplitProbs,
    /// Seed for the stratified split draw.
    pub split_seed: u64,
}

impl VoxForgeConfig {
    /// VoxForge defaults: 256 MiB shards, uuid-only records, the full
    /// worker pool, default split probabilities.
    pub fn new(extracted_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            extracted_dir: extracted_dir.into(),
            out_dir: out_dir.into(),
            shard: ShardConfig {
                workers: MAX_WORKERS,
                ..ShardConfig::default()
            },
            split_probs: SplitProbs::default(),
            split_seed: 42,
        }
    }
}

/// Prepare a VoxForge corpus.
///
/// VoxForge ships no split manifests, so rows are assigned by a seeded
/// stratified draw. Utterances from one archive can land in different
/// splits; no speaker grouping is applied.
pub fn prepare_voxforge(config: &VoxForgeConfig) -> Result<PrepareReport, PipelineError> {
    info!(root = %config.extracted_dir.display(), "processing archives");
    let outcome = voxforge::scan_archives(&config.extracted_dir)?;
    info!(total = outcome.rows.len(), "total examples");

    let assignment: SplitAssignment = assign(outcome.rows, config.split_probs, config.split_seed)?;

    let mut report = PrepareReport {
        corpus: "voxforge".to_string(),
        split_rows: Vec::new(),
        errors: outcome.errors,
    };
    for label in crate::constants::ALL_SPLITS {
        let rows = assignment.rows(label).to_vec();
        let table = table_path(&config.extracted_dir, &format!("{label}.json"));
        prepare_split(
            rows,
            label,
            &config.extracted_dir,
            &table,
            &config.out_dir,
            &config.shard,
            &mut report,
        )?;
    }
    Ok(report)
}

/// Row-table path beside the scanned corpus data, named after the source
/// manifest (`dev.tsv` → `dev.json`).
fn table_path(dir: &Path, source_name: &str) -> PathBuf {
    dir.join(Path::new(source_name).with_extension("json"))
}

#[allow(clippy::too_many_arguments)]
fn prepare_split(
    rows: Vec<Row>,
    label: SplitLabel,
    audio_root: &Path,
    table_path: &Path,
    out_dir: &Path,
    shard: &ShardConfig,
    report: &mut PrepareReport,
) -> Result<(), PipelineError> {
    info!(%label, rows = rows.len(), table = %table_path.display(), "saving row table");
    write_table(&rows, table_path)?;

    let metadata = write_split(rows, label, audio_root, out_dir, shard)?;
    let metadata_path = out_dir.join(format!(
        "{label}.{}",
        crate::constants::metadata::METADATA_EXT
    ));
    info!(%label, metadata = %metadata_path.display(), "saving metadata");
    metadata.save(&metadata_path)?;

    report.split_rows.push((label, metadata.labels.len()));
    Ok(())
}

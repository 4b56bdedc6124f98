//! Accessor facades over prepared split metadata.
//!
//! Three layers, each exposing the same capability surface
//! (`sample_rate`, `dtype`, `files`, `labels`, `lookup`,
//! `record_stream`): a [`Split`] reads one metadata sidecar, a
//! [`Dataset`] composes one corpus' three splits, and a [`MultiSet`]
//! merges same-named splits across corpora into one logical collection.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::constants::metadata::METADATA_EXT;
use crate::errors::PipelineError;
use crate::metadata::{DtypeTag, SplitMetadata};
use crate::splitter::SplitLabel;
use crate::stream::RecordStream;
use crate::types::{CorpusName, RowId, Transcript};

/// One (corpus, split) pair backed by a metadata sidecar on disk.
///
/// Metadata is loaded on first use and cached for the accessor's
/// lifetime. Two threads racing the first load may both read the sidecar;
/// the load is idempotent and cheap, so no stronger guard is needed.
pub struct Split {
    dir: PathBuf,
    label: SplitLabel,
    metadata: OnceLock<SplitMetadata>,
}

impl Split {
    /// Open the `label` split of the corpus prepared under `dir`.
    ///
    /// No I/O happens until a metadata-derived property is first read.
    pub fn open(dir: impl Into<PathBuf>, label: SplitLabel) -> Self {
        Self {
            dir: dir.into(),
            label,
            metadata: OnceLock::new(),
        }
    }

    /// Split label.
    pub fn label(&self) -> SplitLabel {
        self.label
    }

    /// Path of the metadata sidecar backing this split.
    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(format!("{}.{METADATA_EXT}", self.label))
    }

    fn metadata(&self) -> Result<&SplitMetadata, PipelineError> {
        if let Some(metadata) = self.metadata.get() {
            return Ok(metadata);
        }
        let loaded = SplitMetadata::load(&self.metadata_path())?;
        Ok(self.metadata.get_or_init(|| loaded))
    }

    /// Audio sample rate of the split.
    pub fn sample_rate(&self) -> Result<u32, PipelineError> {
        Ok(self.metadata()?.sample_rate)
    }

    /// Sample data type of the split.
    pub fn dtype(&self) -> Result<DtypeTag, PipelineError> {
        Ok(self.metadata()?.dtype)
    }

    /// Shard files of the split, resolved against its data root.
    pub fn files(&self) -> Result<Vec<PathBuf>, PipelineError> {
        Ok(self
            .metadata()?
            .files
            .iter()
            .map(|name| self.dir.join(name))
            .collect())
    }

    /// uuid → cleaned transcript map for the split.
    pub fn labels(&self) -> Result<&IndexMap<RowId, Transcript>, PipelineError> {
        Ok(&self.metadata()?.labels)
    }

    /// Transcript for `id`, or `default` when unknown.
    pub fn lookup<'a>(&'a self, id: &str, default: &'a str) -> Result<&'a str, PipelineError> {
        Ok(self
            .labels()?
            .get(id)
            .map(Transcript::as_str)
            .unwrap_or(default))
    }

    /// Build a shuffled record stream over this split's shard files.
    pub fn record_stream(&self, parallelism: usize) -> Result<RecordStream, PipelineError> {
        Ok(RecordStream::new(self.files()?, parallelism))
    }
}

fn all_equal<T: PartialEq + Copy>(
    values: impl IntoIterator<Item = Result<T, PipelineError>>,
    what: &str,
    scope: &str,
) -> Result<T, PipelineError> {
    let mut common: Option<T> = None;
    for value in values {
        let value = value?;
        match common {
            None => common = Some(value),
            Some(seen) if seen == value => {}
            Some(_) => {
                return Err(PipelineError::Consistency(format!(
                    "{what} mismatch across {scope}"
                )));
            }
        }
    }
    common.ok_or_else(|| PipelineError::Configuration(format!("{scope} is empty")))
}

/// One corpus: a fixed train/valid/test triple of [`Split`]s.
pub struct Dataset {
    name: CorpusName,
    train: Split,
    valid: Split,
    test: Split,
}

impl Dataset {
    /// Open the corpus prepared under `dir`.
    pub fn open(dir: impl AsRef<Path>, name: impl Into<CorpusName>) -> Self {
        let dir = dir.as_ref();
        Self {
            name: name.into(),
            train: Split::open(dir, SplitLabel::Train),
            valid: Split::open(dir, SplitLabel::Valid),
            test: Split::open(dir, SplitLabel::Test),
        }
    }

    /// Corpus name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Training split.
    pub fn train(&self) -> &Split {
        &self.train
    }

    /// Validation split.
    pub fn valid(&self) -> &Split {
        &self.valid
    }

    /// Test split.
    pub fn test(&self) -> &Split {
        &self.test
    }

    fn splits(&self) -> [&Split; 3] {
        [&self.train, &self.valid, &self.test]
    }

    /// Common sample rate of the three splits.
    ///
    /// Fails fast on drift: mixing sample rates would silently corrupt
    /// training downstream.
    pub fn sample_rate(&self) -> Result<u32, PipelineError> {
        all_equal(
            self.splits().map(|split| split.sample_rate()),
            "sample rate",
            &format!("splits of '{}'", self.name),
        )
    }

    /// Common sample data type of the three splits.
    pub fn dtype(&self) -> Result<DtypeTag, PipelineError> {
        all_equal(
            self.splits().map(|split| split.dtype()),
            "dtype",
            &format!("splits of '{}'", self.name),
        )
    }

    /// All shard files of the corpus.
    pub fn files(&self) -> Result<Vec<PathBuf>, PipelineError> {
        let mut files = Vec::new();
        for split in self.splits() {
            files.extend(split.files()?);
        }
        Ok(files)
    }

    /// Merged uuid → transcript map across the three splits.
    pub fn labels(&self) -> Result<IndexMap<RowId, Transcript>, PipelineError> {
        let mut labels = IndexMap::new();
        for split in self.splits() {
            labels.extend(split.labels()?.clone());
        }
        Ok(labels)
    }

    /// Transcript for `id` in any split, or `default` when unknown.
    pub fn lookup<'a>(&'a self, id: &str, default: &'a str) -> Result<&'a str, PipelineError> {
        for split in self.splits() {
            if let Some(text) = split.labels()?.get(id) {
                return Ok(text);
            }
        }
        Ok(default)
    }

    /// Build a shuffled record stream over every shard of the corpus.
    pub fn record_stream(&self, parallelism: usize) -> Result<RecordStream, PipelineError> {
        Ok(RecordStream::new(self.files()?, parallelism))
    }
}

/// A collection of corpora acting as one dataset.
pub struct MultiSet {
    datasets: Vec<Dataset>,
}

impl MultiSet {
    /// Build a collection from prepared corpora.
    pub fn new(datasets: Vec<Dataset>) -> Self {
        Self { datasets }
    }

    /// Iterate the member corpora.
    pub fn iter(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter()
    }

    /// The merged training split across all corpora.
    pub fn train(&self) -> MultiSplit<'_> {
        self.split(SplitLabel::Train)
    }

    /// The merged validation split across all corpora.
    pub fn valid(&self) -> MultiSplit<'_> {
        self.split(SplitLabel::Valid)
    }

    /// The merged test split across all corpora.
    pub fn test(&self) -> MultiSplit<'_> {
        self.split(SplitLabel::Test)
    }

    fn split(&self, label: SplitLabel) -> MultiSplit<'_> {
        let splits = self
            .datasets
            .iter()
            .map(|dataset| match label {
                SplitLabel::Train => dataset.train(),
                SplitLabel::Valid => dataset.valid(),
                SplitLabel::Test => dataset.test(),
            })
            .collect();
        MultiSplit { label, splits }
    }

    /// Common sample rate across every corpus and split.
    pub fn sample_rate(&self) -> Result<u32, PipelineError> {
        all_equal(
            [self.train(), self.valid(), self.test()]
                .iter()
                .map(|split| split.sample_rate()),
            "sample rate",
            "the collection",
        )
    }

    /// Common sample data type across every corpus and split.
    pub fn dtype(&self) -> Result<DtypeTag, PipelineError> {
        all_equal(
            [self.train(), self.valid(), self.test()]
                .iter()
                .map(|split| split.dtype()),
            "dtype",
            "the collection",
        )
    }

    /// All shard files across every corpus.
    pub fn files(&self) -> Result<Vec<PathBuf>, PipelineError> {
        let mut files = Vec::new();
        for split in [self.train(), self.valid(), self.test()] {
            files.extend(split.files()?);
        }
        Ok(files)
    }

    /// Merged uuid → transcript map across every corpus and split.
    pub fn labels(&self) -> Result<IndexMap<RowId, Transcript>, PipelineError> {
        let mut labels = IndexMap::new();
        for split in [self.train(), self.valid(), self.test()] {
            labels.extend(split.labels()?);
        }
        Ok(labels)
    }

    /// Transcript for `id` in any corpus and split, or `default` when
    /// unknown.
    pub fn lookup<'a>(&'a self, id: &str, default: &'a str) -> Result<&'a str, PipelineError> {
        for dataset in &self.datasets {
            for split in dataset.splits() {
                if let Some(text) = split.labels()?.get(id) {
                    return Ok(text);
                }
            }
        }
        Ok(default)
    }

    /// Build a shuffled record stream over every shard of the collection.
    pub fn record_stream(&self, parallelism: usize) -> Result<RecordStream, PipelineError> {
        Ok(RecordStream::new(self.files()?, parallelism))
    }
}

/// Same-named splits of several corpora merged into one logical split.
pub struct MultiSplit<'a> {
    label: SplitLabel,
    splits: Vec<&'a Split>,
}

impl<'a> MultiSplit<'a> {
    /// Split label shared by the member splits.
    pub fn label(&self) -> SplitLabel {
        self.label
    }

    /// Common sample rate across the member corpora.
    pub fn sample_rate(&self) -> Result<u32, PipelineError> {
        all_equal(
            self.splits.iter().map(|split| split.sample_rate()),
            "sample rate",
            &format!("corpora of the '{}' split", self.label),
        )
    }

    /// Common sample data type across the member corpora.
    pub fn dtype(&self) -> Result<DtypeTag, PipelineError> {
        all_equal(
            self.splits.iter().map(|split| split.dtype()),
            "dtype",
            &format!("corpora of the '{}' split", self.label),
        )
    }

    /// Shard files of every member split, concatenated in corpus order.
    pub fn files(&self) -> Result<Vec<PathBuf>, PipelineError> {
        let mut files = Vec::new();
        for split in &self.splits {
            files.extend(split.files()?);
        }
        Ok(files)
    }

    /// Merged uuid → transcript map; on a key collision the later corpus
    /// wins (uuids are corpus-scoped-unique, so collisions are not
    /// expected, but the merge does not enforce that).
    pub fn labels(&self) -> Result<IndexMap<RowId, Transcript>, PipelineError> {
        let mut labels = IndexMap::new();
        for split in &self.splits {
            labels.extend(split.labels()?.clone());
        }
        Ok(labels)
    }

    /// Transcript for `id`, or `default` when unknown.
    pub fn lookup(&self, id: &str, default: &'a str) -> Result<&'a str, PipelineError> {
        for split in &self.splits {
            if let Some(text) = split.labels()?.get(id) {
                return Ok(text);
            }
        }
        Ok(default)
    }

    /// Build a shuffled record stream over the merged split.
    pub fn record_stream(&self, parallelism: usize) -> Result<RecordStream, PipelineError> {
        Ok(RecordStream::new(self.files()?, parallelism))
    }
}

//! Restartable shuffled record streams over a set of shard files.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::data::AudioRecord;
use crate::errors::PipelineError;
use crate::recordio::RecordReader;

/// A lazy, shuffled, order-non-deterministic sequence over the records of
/// a set of shard files.
///
/// Every call to [`RecordStream::iter`] starts a fresh finite traversal:
/// the file list is reshuffled with a new permutation and records are
/// interleaved from up to `parallelism` files at a time, so no ordering
/// guarantee survives. Example order should not matter for training, and
/// giving it up keeps multi-file reads simple.
pub struct RecordStream {
    files: Vec<PathBuf>,
    parallelism: usize,
    base_seed: u64,
    traversals: AtomicU64,
}

impl RecordStream {
    /// Build a stream over `files`, interleaving up to `parallelism` of
    /// them per traversal.
    pub fn new(files: Vec<PathBuf>, parallelism: usize) -> Self {
        Self {
            files,
            parallelism: parallelism.max(1),
            base_seed: rand::rng().random(),
            traversals: AtomicU64::new(0),
        }
    }

    /// Pin the shuffle seed, making traversal order reproducible.
    /// Traversal `n` still gets its own permutation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    /// Number of shard files behind this stream.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Start one full traversal.
    pub fn iter(&self) -> RecordStreamIter {
        let traversal = self.traversals.fetch_add(1, Ordering::Relaxed);
        let seed = self
            .base_seed
            .wrapping_add(traversal.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        let mut files = self.files.clone();
        files.shuffle(&mut StdRng::seed_from_u64(seed));
        RecordStreamIter {
            pending: files.into(),
            active: Vec::new(),
            cursor: 0,
            parallelism: self.parallelism,
        }
    }
}

/// One finite traversal of a [`RecordStream`].
pub struct RecordStreamIter {
    pending: VecDeque<PathBuf>,
    active: Vec<RecordReader>,
    cursor: usize,
    parallelism: usize,
}

impl Iterator for RecordStreamIter {
    type Item = Result<AudioRecord, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while self.active.len() < self.parallelism {
                let Some(path) = self.pending.pop_front() else { break };
                match RecordReader::open(&path) {
                    Ok(reader) => self.active.push(reader),
                    Err(err) => return Some(Err(err)),
                }
            }
            if self.active.is_empty() {
                return None;
            }

            self.cursor %= self.active.len();
            match self.active[self.cursor].next() {
                Some(item) => {
                    self.cursor += 1;
                    return Some(item);
                }
                None => {
                    // Reader exhausted; drop it and refill from pending.
                    self.active.swap_remove(self.cursor);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recordio::RecordWriter;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn write_shard(path: &PathBuf, uuids: &[&str]) {
        let mut writer = RecordWriter::create(path).unwrap();
        for uuid in uuids {
            writer
                .append(&AudioRecord {
                    uuid: uuid.to_string(),
                    audio: vec![0.25; 4],
                    sentence: None,
                    original: None,
                })
                .unwrap();
        }
        writer.finish().unwrap();
    }

    fn fixture_files(dir: &std::path::Path) -> Vec<PathBuf> {
        let specs: [(&str, &[&str]); 3] = [
            ("train-0000-of-0003.rec", &["a0", "a1", "a2"]),
            ("train-0001-of-0003.rec", &["b0", "b1"]),
            ("train-0002-of-0003.rec", &["c0"]),
        ];
        specs
            .iter()
            .map(|(name, uuids)| {
                let path = dir.join(name);
                write_shard(&path, uuids);
                path
            })
            .collect()
    }

    #[test]
    fn traversal_yields_every_record_exactly_once() {
        let dir = tempdir().unwrap();
        let stream = RecordStream::new(fixture_files(dir.path()), 2).with_seed(11);

        let mut counts: HashMap<String, usize> = HashMap::new();
        for record in stream.iter() {
            *counts.entry(record.unwrap().uuid).or_default() += 1;
        }
        assert_eq!(counts.len(), 6);
        assert!(counts.values().all(|&count| count == 1));
    }

    #[test]
    fn stream_is_restartable() {
        let dir = tempdir().unwrap();
        let stream = RecordStream::new(fixture_files(dir.path()), 3).with_seed(5);

        let first: Vec<String> = stream.iter().map(|r| r.unwrap().uuid).collect();
        let second: Vec<String> = stream.iter().map(|r| r.unwrap().uuid).collect();
        assert_eq!(first.len(), 6);
        assert_eq!(second.len(), 6);

        let mut sorted_first = first.clone();
        let mut sorted_second = second.clone();
        sorted_first.sort();
        sorted_second.sort();
        assert_eq!(sorted_first, sorted_second);
    }

    #[test]
    fn interleaving_mixes_files() {
        let dir = tempdir().unwrap();
        let stream = RecordStream::new(fixture_files(dir.path()), 3).with_seed(2);

        let uuids: Vec<String> = stream.iter().map(|r| r.unwrap().uuid).collect();
        // With three active readers the first three records come from three
        // distinct files.
        let prefixes: std::collections::HashSet<u8> =
            uuids.iter().take(3).map(|uuid| uuid.as_bytes()[0]).collect();
        assert_eq!(prefixes.len(), 3);
    }

    #[test]
    fn sequential_read_preserves_within_file_order() {
        let dir = tempdir().unwrap();
        let stream = RecordStream::new(fixture_files(dir.path()), 1).with_seed(9);

        let uuids: Vec<String> = stream.iter().map(|r| r.unwrap().uuid).collect();
        let a_positions: Vec<usize> = uuids
            .iter()
            .enumerate()
            .filter(|(_, uuid)| uuid.starts_with('a'))
            .map(|(idx, _)| idx)
            .collect();
        // Reading one file at a time keeps each file's records contiguous.
        assert_eq!(a_positions.windows(2).filter(|w| w[1] != w[0] + 1).count(), 0);
    }

    #[test]
    fn empty_stream_terminates_immediately() {
        let stream = RecordStream::new(Vec::new(), 4).with_seed(1);
        assert_eq!(stream.iter().count(), 0);
        assert_eq!(stream.file_count(), 0);
    }

    #[test]
    fn missing_file_surfaces_as_an_error_item() {
        let dir = tempdir().unwrap();
        let stream =
            RecordStream::new(vec![dir.path().join("absent.rec")], 2).with_seed(3);
        let items: Vec<_> = stream.iter().collect();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_err());
    }
}

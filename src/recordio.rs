//! Append-only record container files.
//!
//! A shard is a sequence of length-prefixed (u32 little-endian) bitcode
//! payloads, one [`AudioRecord`] per entry. The container is treated as an
//! opaque format by the rest of the pipeline: writers only append, readers
//! only iterate forward.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use crate::constants::shard::MAX_RECORD_BYTES;
use crate::data::AudioRecord;
use crate::errors::PipelineError;

/// Appends serialized records to one shard file.
pub struct RecordWriter {
    inner: BufWriter<File>,
    written: usize,
}

impl RecordWriter {
    /// Create (truncating) a shard file at `path`.
    pub fn create(path: &Path) -> Result<Self, PipelineError> {
        let file = File::create(path)?;
        Ok(Self {
            inner: BufWriter::new(file),
            written: 0,
        })
    }

    /// Append one record.
    pub fn append(&mut self, record: &AudioRecord) -> Result<(), PipelineError> {
        let payload = bitcode::encode(record);
        let len = u32::try_from(payload.len()).map_err(|_| {
            PipelineError::Record("record payload exceeds the u32 length prefix".to_string())
        })?;
        self.inner.write_all(&len.to_le_bytes())?;
        self.inner.write_all(&payload)?;
        self.written += 1;
        Ok(())
    }

    /// Number of records appended so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and close the shard file.
    pub fn finish(mut self) -> Result<(), PipelineError> {
        self.inner.flush()?;
        Ok(())
    }
}

/// Iterates the records of one shard file in order.
pub struct RecordReader {
    inner: BufReader<File>,
}

impl RecordReader {
    /// Open a shard file for reading.
    pub fn open(path: &Path) -> Result<Self, PipelineError> {
        let file = File::open(path)?;
        Ok(Self {
            inner: BufReader::new(file),
        })
    }

    fn read_next(&mut self) -> Result<Option<AudioRecord>, PipelineError> {
        let mut len_bytes = [0u8; 4];
        match self.inner.read_exact(&mut len_bytes) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(err) => return Err(err.into()),
        }
        let len = u32::from_le_bytes(len_bytes);
        if len > MAX_RECORD_BYTES {
            return Err(PipelineError::Record(format!(
                "record length {len} exceeds the sanity bound"
            )));
        }
        let mut payload = vec![0u8; len as usize];
        self.inner.read_exact(&mut payload)?;
        bitcode::decode(&payload)
            .map(Some)
            .map_err(|err| PipelineError::Record(format!("corrupt record payload: {err}")))
    }
}

impl Iterator for RecordReader {
    type Item = Result<AudioRecord, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn build_record(uuid: &str, samples: usize) -> AudioRecord {
        AudioRecord {
            uuid: uuid.to_string(),
            audio: (0..samples).map(|idx| idx as f32 / 100.0).collect(),
            sentence: Some(format!("sentence for {uuid}")),
            original: None,
        }
    }

    #[test]
    fn records_round_trip_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("train-0000-of-0001.rec");

        let records = vec![build_record("a", 3), build_record("b", 0), build_record("c", 7)];
        let mut writer = RecordWriter::create(&path).unwrap();
        for record in &records {
            writer.append(record).unwrap();
        }
        assert_eq!(writer.written(), 3);
        writer.finish().unwrap();

        let loaded: Vec<AudioRecord> = RecordReader::open(&path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn empty_file_yields_no_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.rec");
        RecordWriter::create(&path).unwrap().finish().unwrap();
        assert_eq!(RecordReader::open(&path).unwrap().count(), 0);
    }

    #[test]
    fn truncated_payload_is_a_record_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("torn.rec");
        // Length prefix promises more bytes than the file holds.
        std::fs::write(&path, 64u32.to_le_bytes()).unwrap();
        let result: Result<Vec<AudioRecord>, PipelineError> =
            RecordReader::open(&path).unwrap().collect();
        assert!(result.is_err());
    }

    #[test]
    fn oversized_length_prefix_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("huge.rec");
        std::fs::write(&path, (MAX_RECORD_BYTES + 1).to_le_bytes()).unwrap();
        let err = RecordReader::open(&path).unwrap().next().unwrap().unwrap_err();
        assert!(matches!(err, PipelineError::Record(msg) if msg.contains("sanity bound")));
    }
}

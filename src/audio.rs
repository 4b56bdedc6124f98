//! WAV decoding for the shard writer.

use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::errors::PipelineError;

/// Decode a WAV file into one flat `f32` sample sequence.
///
/// Integer samples are scaled into `[-1.0, 1.0)` by their bit depth;
/// float samples pass through. Channels are flattened in interleaved
/// order (corpus audio is mono, so this is the plain sample sequence).
pub fn decode_wav(path: &Path) -> Result<Vec<f32>, PipelineError> {
    let mut reader = WavReader::open(path).map_err(|err| PipelineError::Decode {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let spec = reader.spec();

    let decode_err = |err: hound::Error| PipelineError::Decode {
        path: path.to_path_buf(),
        reason: err.to_string(),
    };
    let samples = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|sample| sample.map_err(decode_err))
            .collect::<Result<Vec<f32>, _>>()?,
        SampleFormat::Int => {
            let max = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 / max).map_err(decode_err))
                .collect::<Result<Vec<f32>, _>>()?
        }
    };
    Ok(samples)
}

/// Truncate decoded audio to at most `max_samples`, when a cap is set.
pub fn truncate(mut audio: Vec<f32>, max_samples: Option<usize>) -> Vec<f32> {
    if let Some(cap) = max_samples
        && audio.len() > cap
    {
        audio.truncate(cap);
    }
    audio
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};
    use tempfile::tempdir;

    fn write_test_wav(path: &Path, samples: &[i16]) {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &sample in samples {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn decode_scales_int_samples() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_test_wav(&path, &[0, 16_384, -16_384, i16::MAX]);

        let audio = decode_wav(&path).unwrap();
        assert_eq!(audio.len(), 4);
        assert!((audio[0] - 0.0).abs() < 1e-6);
        assert!((audio[1] - 0.5).abs() < 1e-6);
        assert!((audio[2] + 0.5).abs() < 1e-6);
        assert!(audio[3] < 1.0);
    }

    #[test]
    fn decode_of_non_wav_is_a_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bogus.wav");
        std::fs::write(&path, b"not a wav at all").unwrap();
        let err = decode_wav(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn truncate_applies_cap_only_when_exceeded() {
        let audio = vec![0.0_f32; 10];
        assert_eq!(truncate(audio.clone(), Some(4)).len(), 4);
        assert_eq!(truncate(audio.clone(), Some(20)).len(), 10);
        assert_eq!(truncate(audio, None).len(), 10);
    }
}

use std::fmt;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::data::Row;
use crate::errors::PipelineError;

/// Logical dataset partitions emitted by the offline pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitLabel {
    /// Training split.
    Train,
    /// Validation split.
    Valid,
    /// Test split.
    Test,
}

impl SplitLabel {
    /// Canonical split name used in shard and sidecar file names.
    pub fn as_str(self) -> &'static str {
        match self {
            SplitLabel::Train => "train",
            SplitLabel::Valid => "valid",
            SplitLabel::Test => "test",
        }
    }

    /// Map an authoritative source manifest stem to its split.
    ///
    /// Corpora that ship their own split manifests name the validation
    /// portion `dev`; everything else maps by its own name.
    pub fn from_manifest_name(name: &str) -> Option<Self> {
        match name {
            "train" => Some(SplitLabel::Train),
            "dev" | "valid" => Some(SplitLabel::Valid),
            "test" => Some(SplitLabel::Test),
            _ => None,
        }
    }
}

impl fmt::Display for SplitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability configuration for stratified train/valid/test assignment.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SplitProbs {
    /// Fraction assigned to train.
    pub train: f64,
    /// Fraction assigned to valid.
    pub valid: f64,
    /// Fraction assigned to test.
    pub test: f64,
}

impl Default for SplitProbs {
    fn default() -> Self {
        Self {
            train: 0.8,
            valid: 0.1,
            test: 0.1,
        }
    }
}

impl SplitProbs {
    /// Validate that probabilities sum to `1.0` (within epsilon).
    pub fn normalized(self) -> Result<Self, PipelineError> {
        let sum = self.train + self.valid + self.test;
        if (sum - 1.0).abs() > 1e-9 {
            return Err(PipelineError::Configuration(
                "split probabilities must sum to 1.0".to_string(),
            ));
        }
        Ok(self)
    }
}

/// The full row collection partitioned into the three splits.
///
/// Every input row lands in exactly one split; none are dropped.
#[derive(Clone, Debug, Default)]
pub struct SplitAssignment {
    /// Training rows.
    pub train: Vec<Row>,
    /// Validation rows.
    pub valid: Vec<Row>,
    /// Test rows.
    pub test: Vec<Row>,
}

impl SplitAssignment {
    /// Rows for one split.
    pub fn rows(&self, label: SplitLabel) -> &[Row] {
        match label {
            SplitLabel::Train => &self.train,
            SplitLabel::Valid => &self.valid,
            SplitLabel::Test => &self.test,
        }
    }

    /// Take ownership of one split's rows.
    pub fn into_rows(self, label: SplitLabel) -> Vec<Row> {
        match label {
            SplitLabel::Train => self.train,
            SplitLabel::Valid => self.valid,
            SplitLabel::Test => self.test,
        }
    }

    /// Total row count across all three splits.
    pub fn len(&self) -> usize {
        self.train.len() + self.valid.len() + self.test.len()
    }

    /// True when every split is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Assign each row to a split by an independent categorical draw.
///
/// Draws are i.i.d. per row from `probs` using an `StdRng` seeded with
/// `seed`, so a given (rows, probs, seed) triple always produces the same
/// partition. Rows from the same source archive can land in different
/// splits; no speaker or archive grouping is applied.
pub fn assign(rows: Vec<Row>, probs: SplitProbs, seed: u64) -> Result<SplitAssignment, PipelineError> {
    let probs = probs.normalized()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let train_cut = probs.train;
    let valid_cut = probs.train + probs.valid;

    let mut assignment = SplitAssignment::default();
    for row in rows {
        let draw: f64 = rng.random();
        if draw < train_cut {
            assignment.train.push(row);
        } else if draw < valid_cut {
            assignment.valid.push(row);
        } else {
            assignment.test.push(row);
        }
    }
    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_rows(count: usize) -> Vec<Row> {
        (0..count)
            .map(|idx| Row {
                path: format!("clip_{idx}.wav"),
                size: 1_000 + idx as u64,
                sentence: format!("sentence {idx}"),
                original: format!("Sentence {idx}."),
            })
            .collect()
    }

    #[test]
    fn probs_reject_non_unit_sum() {
        let invalid = SplitProbs {
            train: 0.6,
            valid: 0.3,
            test: 0.3,
        };
        let err = assign(build_rows(4), invalid, 1).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Configuration(ref msg) if msg.contains("sum to 1.0")
        ));
    }

    #[test]
    fn assignment_partitions_without_loss_or_overlap() {
        for count in [0usize, 1, 17, 500] {
            let rows = build_rows(count);
            let assignment = assign(rows.clone(), SplitProbs::default(), 42).unwrap();
            assert_eq!(assignment.len(), count);

            let mut recovered: Vec<&Row> = assignment
                .train
                .iter()
                .chain(&assignment.valid)
                .chain(&assignment.test)
                .collect();
            recovered.sort_by(|a, b| a.path.cmp(&b.path));
            let mut expected: Vec<&Row> = rows.iter().collect();
            expected.sort_by(|a, b| a.path.cmp(&b.path));
            assert_eq!(recovered, expected);
        }
    }

    #[test]
    fn assignment_is_reproducible_for_a_seed() {
        let rows = build_rows(200);
        let first = assign(rows.clone(), SplitProbs::default(), 7).unwrap();
        let second = assign(rows, SplitProbs::default(), 7).unwrap();
        assert_eq!(first.train, second.train);
        assert_eq!(first.valid, second.valid);
        assert_eq!(first.test, second.test);
    }

    #[test]
    fn assignment_tracks_probabilities_roughly() {
        let rows = build_rows(5_000);
        let assignment = assign(rows, SplitProbs::default(), 3).unwrap();
        let train_share = assignment.train.len() as f64 / 5_000.0;
        assert!((train_share - 0.8).abs() < 0.05, "train share {train_share}");
        assert!(!assignment.valid.is_empty());
        assert!(!assignment.test.is_empty());
    }

    #[test]
    fn manifest_names_map_to_splits() {
        assert_eq!(SplitLabel::from_manifest_name("dev"), Some(SplitLabel::Valid));
        assert_eq!(SplitLabel::from_manifest_name("train"), Some(SplitLabel::Train));
        assert_eq!(SplitLabel::from_manifest_name("test"), Some(SplitLabel::Test));
        assert_eq!(SplitLabel::from_manifest_name("extra"), None);
        assert_eq!(SplitLabel::Valid.to_string(), "valid");
    }
}

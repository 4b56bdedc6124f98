//! Intermediate tabular sidecar written between scanning and sharding.
//!
//! One file per (corpus, split): a table-oriented JSON document with an
//! explicit schema block and per-row integer index, so the artifact can
//! be inspected or reloaded without re-scanning the corpus.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::Row;
use crate::errors::PipelineError;

#[derive(Debug, Serialize, Deserialize)]
struct TableDocument {
    schema: TableSchema,
    data: Vec<TableRow>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TableSchema {
    fields: Vec<FieldSpec>,
    #[serde(rename = "primaryKey")]
    primary_key: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FieldSpec {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TableRow {
    index: u64,
    #[serde(flatten)]
    row: Row,
}

fn table_schema() -> TableSchema {
    let field = |name: &str, kind: &str| FieldSpec {
        name: name.to_string(),
        kind: kind.to_string(),
    };
    TableSchema {
        fields: vec![
            field("index", "integer"),
            field("path", "string"),
            field("size", "integer"),
            field("sentence", "string"),
            field("original", "string"),
        ],
        primary_key: vec!["index".to_string()],
    }
}

/// Write `rows` to `path` as a table-oriented JSON document.
pub fn write_table(rows: &[Row], path: &Path) -> Result<(), PipelineError> {
    let document = TableDocument {
        schema: table_schema(),
        data: rows
            .iter()
            .enumerate()
            .map(|(index, row)| TableRow {
                index: index as u64,
                row: row.clone(),
            })
            .collect(),
    };
    let body = serde_json::to_string(&document)
        .map_err(|err| PipelineError::Metadata(format!("failed to encode row table: {err}")))?;
    fs::write(path, body)?;
    Ok(())
}

/// Read a table-oriented JSON document back into rows, preserving order.
pub fn read_table(path: &Path) -> Result<Vec<Row>, PipelineError> {
    let body = fs::read_to_string(path)?;
    let document: TableDocument = serde_json::from_str(&body).map_err(|err| {
        PipelineError::Metadata(format!("corrupt row table {}: {err}", path.display()))
    })?;
    if !document.schema.primary_key.iter().any(|key| key == "index") {
        return Err(PipelineError::Metadata(format!(
            "row table {} is not indexed",
            path.display()
        )));
    }
    let mut data = document.data;
    data.sort_by_key(|entry| entry.index);
    Ok(data.into_iter().map(|entry| entry.row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn build_rows() -> Vec<Row> {
        vec![
            Row {
                path: "a/one.wav".into(),
                size: 120,
                sentence: "one".into(),
                original: "One.".into(),
            },
            Row {
                path: "a/two.wav".into(),
                size: 340,
                sentence: "two".into(),
                original: "Two!".into(),
            },
        ]
    }

    #[test]
    fn table_round_trips_rows_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("train.json");
        let rows = build_rows();
        write_table(&rows, &path).unwrap();
        let loaded = read_table(&path).unwrap();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn table_document_carries_schema_and_index() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("valid.json");
        write_table(&build_rows(), &path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["schema"]["primaryKey"][0], "index");
        assert_eq!(raw["schema"]["fields"][0]["name"], "index");
        assert_eq!(raw["schema"]["fields"][1]["name"], "path");
        assert_eq!(raw["data"][1]["index"], 1);
        assert_eq!(raw["data"][1]["sentence"], "two");
    }

    #[test]
    fn empty_table_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.json");
        write_table(&[], &path).unwrap();
        assert!(read_table(&path).unwrap().is_empty());
    }

    #[test]
    fn corrupt_table_is_a_metadata_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        let err = read_table(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Metadata(msg) if msg.contains("corrupt row table")));
    }
}

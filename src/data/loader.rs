// ============================================================
// Layer 4 — Height Dataset Loader
// ============================================================
// Reads the pre-split height dataset from a single file.
//
// Supported encodings (picked by file extension):
//   *.json      → serde_json
//   anything else (height.pkl) → Python pickle via serde-pickle
//
// Only plain-container pickles are understood: tuples, lists and
// dicts of numbers. A pickled class instance or numpy array (e.g.
// a `Datasets` object) cannot be decoded and is reported like a
// missing file; re-export it with `.tolist()` first.
//
// Supported layouts inside the file:
//   (trainX, trainY, testX, testY)                 4-tuple / list
//   {"trainX": .., "trainY": .., "testX": .., "testY": ..}
//
// Inputs may be bare numbers or one-element rows (shape [N, 1]).
// Labels are flattened the way numpy's reshape(-1) would, and
// float labels are truncated to integer class codes.
//
// Any failure to open or decode the file is reported as
// PipelineError::DatasetNotFound: the caller treats it as fatal.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use crate::domain::error::PipelineError;
use crate::domain::sample::{DatasetSplit, HeightData};
use crate::domain::traits::DatasetSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Pickle,
    Json,
}

impl Encoding {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Encoding::Json,
            _ => Encoding::Pickle,
        }
    }
}

// ─── Raw file shapes ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawInput {
    Scalar(f64),
    Row(Vec<f64>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Int(i64),
    Float(f64),
    Row(Vec<RawLabel>),
}

#[derive(Debug, Deserialize)]
struct KeyedSplits {
    #[serde(rename = "trainX", alias = "train_x")]
    train_x: Vec<RawInput>,
    #[serde(rename = "trainY", alias = "train_y")]
    train_y: Vec<RawLabel>,
    #[serde(rename = "testX", alias = "test_x")]
    test_x:  Vec<RawInput>,
    #[serde(rename = "testY", alias = "test_y")]
    test_y:  Vec<RawLabel>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawHeightFile {
    Keyed(KeyedSplits),
    Ordered(Vec<RawInput>, Vec<RawLabel>, Vec<RawInput>, Vec<RawLabel>),
}

/// What gets written by `write_height_file`: the ordered 4-tuple.
#[derive(Serialize)]
struct OrderedSplits<'a>(&'a [f32], &'a [i32], &'a [f32], &'a [i32]);

fn flatten_inputs(name: &str, raw: Vec<RawInput>) -> Result<Vec<f32>> {
    raw.into_iter()
        .enumerate()
        .map(|(i, value)| match value {
            RawInput::Scalar(x) => Ok(x as f32),
            RawInput::Row(row) if row.len() == 1 => Ok(row[0] as f32),
            RawInput::Row(row) => Err(PipelineError::InvalidDataset(format!(
                "{name} input {i} has {} features, expected 1",
                row.len()
            ))
            .into()),
        })
        .collect()
}

fn flatten_labels(raw: Vec<RawLabel>, out: &mut Vec<i32>) {
    for label in raw {
        match label {
            RawLabel::Int(v)   => out.push(v as i32),
            RawLabel::Float(v) => out.push(v as i32),
            RawLabel::Row(row) => flatten_labels(row, out),
        }
    }
}

fn build_split(name: &str, inputs: Vec<RawInput>, labels: Vec<RawLabel>) -> Result<DatasetSplit> {
    let inputs = flatten_inputs(name, inputs)?;
    let mut flat = Vec::with_capacity(labels.len());
    flatten_labels(labels, &mut flat);
    DatasetSplit::new(name, inputs, flat)
}

impl RawHeightFile {
    fn into_height_data(self) -> Result<HeightData> {
        let (train_x, train_y, test_x, test_y) = match self {
            RawHeightFile::Keyed(k) => (k.train_x, k.train_y, k.test_x, k.test_y),
            RawHeightFile::Ordered(a, b, c, d) => (a, b, c, d),
        };
        Ok(HeightData {
            train: build_split("train", train_x, train_y)?,
            test:  build_split("test", test_x, test_y)?,
        })
    }
}

// ─── HeightFileLoader ─────────────────────────────────────────────────────────
/// Loads the height dataset from one file on disk.
/// Implements the DatasetSource trait from Layer 3.
pub struct HeightFileLoader {
    path: PathBuf,
}

impl HeightFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn not_found(&self, reason: impl ToString) -> anyhow::Error {
        PipelineError::DatasetNotFound {
            path:   self.path.display().to_string(),
            reason: reason.to_string(),
        }
        .into()
    }
}

impl DatasetSource for HeightFileLoader {
    fn load(&self) -> Result<HeightData> {
        let file = File::open(&self.path).map_err(|e| self.not_found(e))?;
        let reader = BufReader::new(file);

        let raw: RawHeightFile = match Encoding::for_path(&self.path) {
            Encoding::Json => serde_json::from_reader(reader).map_err(|e| self.not_found(e))?,
            Encoding::Pickle => serde_pickle::from_reader(reader, serde_pickle::DeOptions::new())
                .map_err(|e| {
                    tracing::warn!(
                        "'{}' is not a plain tuple/list/dict pickle of numbers: {e}",
                        self.path.display()
                    );
                    self.not_found(e)
                })?,
        };

        let data = raw.into_height_data()?;
        tracing::info!(
            "Loaded '{}': {} train / {} test samples",
            self.path.display(),
            data.train.len(),
            data.test.len()
        );
        Ok(data)
    }
}

/// Write a dataset as the ordered (trainX, trainY, testX, testY) tuple,
/// using the same extension rule as the loader.
pub fn write_height_file(path: impl AsRef<Path>, data: &HeightData) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Cannot create dataset file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    let tuple = OrderedSplits(
        data.train.inputs(),
        data.train.labels(),
        data.test.inputs(),
        data.test.labels(),
    );

    match Encoding::for_path(path) {
        Encoding::Json => serde_json::to_writer_pretty(&mut writer, &tuple)?,
        Encoding::Pickle => serde_pickle::to_writer(&mut writer, &tuple, serde_pickle::SerOptions::new())?,
    }

    tracing::debug!("Wrote dataset to '{}'", path.display());
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_data() -> HeightData {
        HeightData {
            train: DatasetSplit::new("train", vec![1.60, 1.82, 1.55], vec![0, 1, 0]).unwrap(),
            test:  DatasetSplit::new("test", vec![1.78], vec![1]).unwrap(),
        }
    }

    fn is_not_found(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<PipelineError>(), Some(PipelineError::DatasetNotFound { .. }))
    }

    #[test]
    fn test_missing_file_is_dataset_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = HeightFileLoader::new(dir.path().join("height.pkl")).load().unwrap_err();
        assert!(is_not_found(&err));
    }

    #[test]
    fn test_pickle_file_loads_with_matching_lengths() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("height.pkl");
        write_height_file(&path, &sample_data()).unwrap();

        let data = HeightFileLoader::new(&path).load().unwrap();
        assert_eq!(data.train.inputs().len(), data.train.labels().len());
        assert_eq!(data.test.inputs().len(), data.test.labels().len());
        assert_eq!(data, sample_data());
    }

    #[test]
    fn test_json_keyed_layout_with_rows() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("height.json");
        fs::write(
            &path,
            r#"{"trainX": [[1.5], [1.9]], "trainY": [[0], [1.0]], "testX": [1.7], "testY": [1]}"#,
        )
        .unwrap();

        let data = HeightFileLoader::new(&path).load().unwrap();
        assert_eq!(data.train.inputs(), &[1.5, 1.9]);
        assert_eq!(data.train.labels(), &[0, 1]);
        assert_eq!(data.test.len(), 1);
    }

    #[test]
    fn test_corrupt_file_is_dataset_not_found() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("height.pkl");
        fs::write(&path, b"definitely not a pickle").unwrap();
        assert!(is_not_found(&HeightFileLoader::new(&path).load().unwrap_err()));
    }

    #[test]
    fn test_pickled_object_is_dataset_not_found() {
        // protocol 2: __main__.Datasets() instance
        let bytes = b"\x80\x02c__main__\nDatasets\nq\x00)\x81q\x01.";
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("height.pkl");
        fs::write(&path, bytes).unwrap();

        let err = HeightFileLoader::new(&path).load().unwrap_err();
        assert!(matches!(err.downcast_ref::<PipelineError>(), Some(PipelineError::DatasetNotFound { .. })));
    }

    #[test]
    fn test_length_mismatch_is_invalid_dataset() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("height.json");
        fs::write(&path, "[[1.5, 1.6], [0], [1.7], [1]]").unwrap();

        let err = HeightFileLoader::new(&path).load().unwrap_err();
        assert!(matches!(err.downcast_ref::<PipelineError>(), Some(PipelineError::InvalidDataset(_))));
    }

    #[test]
    fn test_wide_input_rows_rejected() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("height.json");
        fs::write(&path, "[[[1.5, 2.0]], [0], [1.7], [1]]").unwrap();
        assert!(HeightFileLoader::new(&path).load().is_err());
    }
}

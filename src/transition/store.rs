//! Persisted transition matrix artifact.
//!
//! The matrix is stored as CSV with an empty top-left cell, the state labels
//! as the header row, and one labeled row per state. Access is serialized
//! through an advisory lock on a sibling `.lock` file: writers hold it
//! exclusively, readers shared, so concurrent ranking requests never observe
//! a half-written matrix.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use nalgebra::DMatrix;

use super::matrix::TransitionMatrix;
use crate::error::{Error, Result};
use crate::table::parse_number;

impl TransitionMatrix {
    /// Writes the labeled matrix as CSV.
    pub fn to_csv_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.num_states() + 1);
        header.push(String::new());
        header.extend(self.labels().iter().cloned());
        csv.write_record(&header)?;

        for (i, label) in self.labels().iter().enumerate() {
            let mut record = Vec::with_capacity(self.num_states() + 1);
            record.push(label.clone());
            record.extend(self.values().row(i).iter().map(|p| p.to_string()));
            csv.write_record(&record)?;
        }
        csv.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Reads a labeled matrix written by [`TransitionMatrix::to_csv_writer`].
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let labels: Vec<String> = csv.headers()?.iter().skip(1).map(str::to_string).collect();
        let n = labels.len();

        let mut values = DMatrix::zeros(n, n);
        let mut rows = 0usize;
        for record in csv.records() {
            let record = record?;
            if rows >= n {
                return Err(malformed(format!("more than {n} rows")));
            }
            if record.len() != n + 1 {
                return Err(malformed(format!(
                    "row {rows} has {} cells, expected {}",
                    record.len(),
                    n + 1
                )));
            }
            for (j, cell) in record.iter().skip(1).enumerate() {
                values[(rows, j)] = parse_number(cell)
                    .filter(|p| *p >= 0.0)
                    .ok_or_else(|| malformed(format!("invalid probability {cell:?}")))?;
            }
            rows += 1;
        }
        if rows != n {
            return Err(Error::NonSquareMatrix { rows, cols: n });
        }

        TransitionMatrix::new(labels, values)
    }

    /// Writes the matrix to `path` under an exclusive lock.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let _lock = ArtifactLock::exclusive(path)?;
        let file = crate::table::create_file(path)?;
        self.to_csv_writer(file)?;
        tracing::debug!(
            path = %path.display(),
            states = self.num_states(),
            "Transition matrix written."
        );
        Ok(())
    }

    /// Reads the matrix from `path` under a shared lock.
    pub fn read_csv(path: &Path) -> Result<Self> {
        let _lock = ArtifactLock::shared(path)?;
        let file = File::open(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_reader(file)
    }
}

fn malformed(message: String) -> Error {
    Error::MalformedMatrix { message }
}

/// Advisory lock held for the lifetime of the value.
struct ArtifactLock {
    _file: File,
}

impl ArtifactLock {
    fn exclusive(artifact: &Path) -> Result<Self> {
        let (file, path) = Self::open(artifact)?;
        file.lock_exclusive()
            .map_err(|source| Error::WriteFile { path, source })?;
        Ok(Self { _file: file })
    }

    fn shared(artifact: &Path) -> Result<Self> {
        let (file, path) = Self::open(artifact)?;
        file.lock_shared()
            .map_err(|source| Error::ReadFile { path, source })?;
        Ok(Self { _file: file })
    }

    fn open(artifact: &Path) -> Result<(File, PathBuf)> {
        let path = lock_path(artifact);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| Error::WriteFile {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| Error::WriteFile {
                path: path.clone(),
                source,
            })?;
        Ok((file, path))
    }
}

fn lock_path(artifact: &Path) -> PathBuf {
    let mut name = artifact.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TransitionMatrix {
        let mut m = TransitionMatrix::zeros(vec![
            "vision".into(),
            "image classification".into(),
            "segmentation".into(),
        ]);
        m.set(0, 1, 0.6);
        m.set(0, 2, 0.4);
        m.repair_absorbing();
        m
    }

    #[test]
    fn test_csv_layout() {
        let mut out = Vec::new();
        sample().to_csv_writer(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(",vision,image classification,segmentation")
        );
        assert_eq!(lines.next(), Some("vision,0,0.6,0.4"));
        assert_eq!(lines.next(), Some("image classification,0,1,0"));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models/graph_world.csv");
        let matrix = sample();
        matrix.write_csv(&path).unwrap();

        assert!(path.with_file_name("graph_world.csv.lock").exists());
        assert_eq!(TransitionMatrix::read_csv(&path).unwrap(), matrix);
    }

    #[test]
    fn test_reads_pandas_style_floats() {
        let raw = ",a,b\na,0.0,1.0\nb,0.0,1.0\n";
        let m = TransitionMatrix::from_csv_reader(raw.as_bytes()).unwrap();
        assert_eq!(m.get(0, 1), 1.0);
        assert_eq!(m.labels(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_rejects_non_square_file() {
        let raw = ",a,b\na,0,1\n";
        let err = TransitionMatrix::from_csv_reader(raw.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::NonSquareMatrix { rows: 1, cols: 2 }));
    }

    #[test]
    fn test_rejects_bad_cell() {
        let raw = ",a\na,high\n";
        let err = TransitionMatrix::from_csv_reader(raw.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedMatrix { .. }));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TransitionMatrix::read_csv(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, Error::ReadFile { .. }));
    }
}

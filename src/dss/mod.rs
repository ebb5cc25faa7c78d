//! Seam to the container-file library. The rest of the crate only talks to
//! [`DssBackend`] and [`DssFile`], so a native binding can replace the bundled
//! [`ndjson::NdjsonDss`] backend without touching the blend logic.

pub mod catalog;
pub mod ndjson;

use crate::types::dataset_path::DatasetPath;
use crate::types::record::RegularTimeSeries;
use catalog::Catalog;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DssError {
    #[error("dataset not found: {0}")]
    DatasetNotFound(DatasetPath),

    #[error("expected a single dataset for {path}, found {count}")]
    UnexpectedReturn { path: DatasetPath, count: usize },

    #[error("not a valid dataset path: {0:?}")]
    InvalidPath(String),

    #[error("invalid pattern in part {part} of {path}")]
    InvalidPattern {
        part: char,
        path: DatasetPath,
        #[source]
        source: regex::Error,
    },

    #[error("failed to access {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record on line {line} of {path:?}")]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub trait DssBackend {
    type File: DssFile;

    fn open(&self, path: &Path) -> Result<Self::File, DssError>;

    /// Copies each `(source, destination)` pair out of `src` into `dst`, stored under
    /// the destination path. Records already in `dst` under that path are replaced.
    /// Returns the number of records written.
    fn copy_records(
        &self,
        src: &Path,
        dst: &Path,
        pairs: &[(DatasetPath, DatasetPath)],
    ) -> Result<usize, DssError>;
}

pub trait DssFile {
    fn read_catalog(&self) -> Result<Catalog, DssError>;

    fn read_record(&self, path: &DatasetPath) -> Result<RegularTimeSeries, DssError>;

    /// Reads the only record matching `pattern`.
    fn read_single(&self, pattern: &DatasetPath) -> Result<RegularTimeSeries, DssError> {
        let matches = self.read_catalog()?.resolve_wildcard(pattern)?;
        let mut found = matches.iter();
        match (found.next(), found.next()) {
            (Some(path), None) => self.read_record(path),
            (None, _) => Err(DssError::DatasetNotFound(pattern.clone())),
            (Some(_), Some(_)) => Err(DssError::UnexpectedReturn {
                path: pattern.clone(),
                count: matches.len(),
            }),
        }
    }
}

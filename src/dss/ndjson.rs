use crate::dss::catalog::Catalog;
use crate::dss::{DssBackend, DssError, DssFile};
use crate::types::dataset_path::DatasetPath;
use crate::types::record::RegularTimeSeries;
use log::debug;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Container backend storing one JSON encoded [`RegularTimeSeries`] per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NdjsonDss;

/// An opened container. Records are keyed by path; a later line for the same path
/// replaces an earlier one.
#[derive(Debug)]
pub struct NdjsonFile {
    path: PathBuf,
    records: BTreeMap<DatasetPath, RegularTimeSeries>,
}

impl NdjsonFile {
    fn read(path: &Path) -> Result<Self, DssError> {
        let file = File::open(path).map_err(|source| io_error(path, source))?;
        let mut records = BTreeMap::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| io_error(path, source))?;
            if line.trim().is_empty() {
                continue;
            }
            let record: RegularTimeSeries =
                serde_json::from_str(&line).map_err(|source| DssError::Json {
                    path: path.to_path_buf(),
                    line: index + 1,
                    source,
                })?;
            records.insert(record.path.clone(), record);
        }
        Ok(NdjsonFile {
            path: path.to_path_buf(),
            records,
        })
    }

    fn read_or_empty(path: &Path) -> Result<Self, DssError> {
        match NdjsonFile::read(path) {
            Err(DssError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Ok(NdjsonFile {
                    path: path.to_path_buf(),
                    records: BTreeMap::new(),
                })
            }
            other => other,
        }
    }

    fn insert(&mut self, record: RegularTimeSeries) {
        self.records.insert(record.path.clone(), record);
    }

    fn write(&self) -> Result<(), DssError> {
        let file = File::create(&self.path).map_err(|source| io_error(&self.path, source))?;
        let mut writer = BufWriter::new(file);
        for record in self.records.values() {
            serde_json::to_writer(&mut writer, record).map_err(|source| DssError::Json {
                path: self.path.clone(),
                line: 0,
                source,
            })?;
            writer
                .write_all(b"\n")
                .map_err(|source| io_error(&self.path, source))?;
        }
        writer.flush().map_err(|source| io_error(&self.path, source))
    }
}

impl DssFile for NdjsonFile {
    fn read_catalog(&self) -> Result<Catalog, DssError> {
        Ok(Catalog::new(self.records.keys().cloned().collect()))
    }

    fn read_record(&self, path: &DatasetPath) -> Result<RegularTimeSeries, DssError> {
        self.records
            .get(path)
            .cloned()
            .ok_or_else(|| DssError::DatasetNotFound(path.clone()))
    }
}

impl DssBackend for NdjsonDss {
    type File = NdjsonFile;

    fn open(&self, path: &Path) -> Result<NdjsonFile, DssError> {
        NdjsonFile::read(path)
    }

    fn copy_records(
        &self,
        src: &Path,
        dst: &Path,
        pairs: &[(DatasetPath, DatasetPath)],
    ) -> Result<usize, DssError> {
        let source = NdjsonFile::read(src)?;
        let mut target = NdjsonFile::read_or_empty(dst)?;
        for (old, new) in pairs {
            debug!("{old} -> {new}");
            target.insert(source.read_record(old)?.renamed(new.clone()));
        }
        target.write()?;
        Ok(pairs.len())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> DssError {
    DssError::Io {
        path: path.to_path_buf(),
        source,
    }
}

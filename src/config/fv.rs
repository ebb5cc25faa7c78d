use crate::types::dataset_path::DatasetPath;
use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, Trim};
use std::path::{Path, PathBuf};

pub const FV_EXTENSION: &str = "fv";

/// Reads a two column (B part, C part) mapping file with a header row into path
/// templates.
pub fn read_fv(file: &Path, delimiter: u8) -> Result<Vec<DatasetPath>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::All)
        .from_path(file)
        .with_context(|| format!("Tried to read fv file from {file:?}"))?;

    let columns = reader.headers()?.len();
    if columns != 2 {
        bail!("Expected 2 columns in fv file {file:?}, found {columns}");
    }

    reader
        .records()
        .map(|record| {
            let record = record.with_context(|| format!("Malformed row in {file:?}"))?;
            Ok(DatasetPath::template(&record[0], &record[1]))
        })
        .collect()
}

/// The `*.fv` files directly inside `dir`, sorted by name.
pub fn available_fv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = std::fs::read_dir(dir)
        .with_context(|| format!("Tried to list fv files in {dir:?}"))?
        .map(|entry| Ok(entry?.path()))
        .collect::<Result<Vec<PathBuf>>>()?;
    found.retain(|path| path.extension().is_some_and(|ext| ext == FV_EXTENSION));
    found.sort();
    Ok(found)
}

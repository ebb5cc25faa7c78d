use anyhow::{bail, Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

pub fn create_new_file(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("Failed to create file: {:?}", path))
}

pub fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Failed to resolve {path:?}"))
}

/// Resolves `path` as given, then relative to each of `search_dirs`.
pub fn existing_file(path: &Path, search_dirs: &[PathBuf]) -> Result<PathBuf> {
    let given = absolute(path)?;
    if given.exists() {
        return Ok(given);
    }
    if let Some(found) = search_dirs
        .iter()
        .map(|dir| dir.join(path))
        .find(|candidate| candidate.exists())
    {
        return Ok(found);
    }
    bail!("{} does not exist", path.display())
}

pub fn new_file(path: &Path) -> Result<PathBuf> {
    let resolved = absolute(path)?;
    if resolved.exists() {
        bail!("{} already exists", path.display());
    }
    Ok(resolved)
}

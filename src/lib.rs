pub mod config;
pub mod dss;
pub mod process;
#[cfg(test)]
mod test;
pub mod types;
pub mod util;

use crate::config::fv::read_fv;
use crate::config::studies::StudyConfig;
use crate::dss::DssBackend;
use crate::process::blend::{blend, BlendReport};
use anyhow::Result;
use log::info;
use std::path::Path;

/// Loads the study and fv files and blends every study into `new_dss`.
pub fn run<B: DssBackend>(
    backend: &B,
    studies_file: &Path,
    fv_file: &Path,
    new_dss: &Path,
) -> Result<BlendReport> {
    info!("Reading studies from file: {}", studies_file.display());
    let studies = StudyConfig::read_from_file(studies_file)?;
    info!("{} studies read", studies.len());

    info!("Reading paths from fv file: {}", fv_file.display());
    let templates = read_fv(fv_file, b',')?;
    info!("{} path templates read", templates.len());

    let report = blend(backend, new_dss, &studies.studies, &templates)?;
    info!(
        "Blended {} studies into {}",
        report.studies.len(),
        report.new_dss.display()
    );
    Ok(report)
}

use anyhow::{Context, Result};
use blendss::config::fv::available_fv_files;
use blendss::dss::ndjson::NdjsonDss;
use blendss::util::{existing_file, new_file};
use clap::Parser;
use log::info;
use std::path::PathBuf;

const DATA_DIR_ENV: &str = "BLENDSS_DATA_DIR";

/// Utility for combining multiple DSS files that contain similar data
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Location of the study config file (toml or yaml format).
    #[arg(required_unless_present = "list_fv")]
    studies: Option<PathBuf>,

    /// Location of the new dss file.
    #[arg(long, default_value = "compiled.dss")]
    newdss: PathBuf,

    /// Location of the fv configuration file.
    #[arg(long, default_value = "fv/standard_paths.fv")]
    fv: PathBuf,

    /// List the bundled fv files and exit.
    #[arg(long)]
    list_fv: bool,

    /// Directory searched for files not found as given.
    #[arg(long, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let args = Args::parse();
    info!("{args:?}");

    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => std::env::current_exe()?
            .parent()
            .map(PathBuf::from)
            .context("Executable has no parent directory")?,
    };

    if args.list_fv {
        for fv in available_fv_files(&data_dir.join("fv"))? {
            println!("{}", fv.display());
        }
        return Ok(());
    }

    let search_dirs = [data_dir];
    let studies = args
        .studies
        .context("A study config file is required")
        .and_then(|studies| existing_file(&studies, &search_dirs))?;
    let fv = existing_file(&args.fv, &search_dirs)?;
    let newdss = new_file(&args.newdss)?;
    info!("studies={}", studies.display());
    info!("fv={}", fv.display());
    info!("newdss={}", newdss.display());

    let report = blendss::run(&NdjsonDss, &studies, &fv, &newdss)?;
    for study in &report.studies {
        info!(
            "{}: {} paths found, {} copied",
            study.dss.display(),
            study.paths_found,
            study.paths_copied
        );
    }
    Ok(())
}

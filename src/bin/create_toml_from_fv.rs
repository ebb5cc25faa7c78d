use anyhow::Result;
use blendss::dss::ndjson::NdjsonDss;
use blendss::process::fv_to_toml::{convert, default_destination};
use blendss::util::{existing_file, new_file};
use clap::Parser;
use log::info;
use std::path::PathBuf;

/// CLI to create an empty fv.toml file from an fv file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The fv file to convert.
    src: PathBuf,

    /// If provided, metadata like 'units' will be filled in when creating the toml
    /// file, otherwise it will remain empty.
    #[arg(long)]
    dss: Option<PathBuf>,

    /// The output toml file.
    #[arg(long)]
    dst: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let args = Args::parse();
    info!("{args:?}");

    let src = existing_file(&args.src, &[])?;
    let dss = args
        .dss
        .map(|dss| existing_file(&dss, &[]))
        .transpose()?;
    let dst = new_file(&args.dst.unwrap_or_else(|| default_destination(&src)))?;

    convert(&NdjsonDss, &src, &dst, dss.as_deref())?;
    info!("done");
    Ok(())
}

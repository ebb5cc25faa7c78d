use crate::config::studies::Study;
use crate::types::dataset_path::DatasetPath;
use crate::types::record::RegularTimeSeries;
use crate::util::create_new_file;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempdir::TempDir;

pub const SHASTA_1920: &str = "/CALSIM/S_SHSTA/STORAGE/01JAN1920/1MON/L2020A/";
pub const SHASTA_1930: &str = "/CALSIM/S_SHSTA/STORAGE/01JAN1930/1MON/L2020A/";
pub const OROVILLE_1920: &str = "/CALSIM/S_OROVL/STORAGE/01JAN1920/1MON/L2020A/";
pub const KESWICK_1920: &str = "/CALSIM/C_KSWCK/CHANNEL/01JAN1920/1MON/L2020A/";

#[derive(Debug)]
pub struct PreparedStudies {
    pub studies: Vec<Study>,
    pub new_dss: PathBuf,
    /** This directory will be deleted when the PreparedStudies goes out of scope */
    pub dir: TempDir,
}

/// Writes one container per entry of `contents` and a study for each, with no overrides.
pub fn prepare_studies(contents: &[&[&str]]) -> PreparedStudies {
    let dir = TempDir::new("studies").unwrap();
    let studies = contents
        .iter()
        .enumerate()
        .map(|(index, paths)| {
            Study::new(write_dss(&dir.path().join(format!("study_{index}.dss")), paths))
        })
        .collect();

    PreparedStudies {
        studies,
        new_dss: dir.path().join("compiled.dss"),
        dir,
    }
}

/// A small monthly record whose values are derived from its B part so copies can
/// be told apart.
pub fn record(path: &DatasetPath) -> RegularTimeSeries {
    let seed = path.b.len() as f64;
    RegularTimeSeries {
        path: path.clone(),
        values: vec![seed, seed + 1.0, seed + 2.0],
        dates: vec![
            "1921-10-31".to_string(),
            "1921-11-30".to_string(),
            "1921-12-31".to_string(),
        ],
        units: "TAF".to_string(),
        period_type: "PER-AVER".to_string(),
        interval: path.e.clone(),
    }
}

pub fn write_dss(file: &Path, paths: &[&str]) -> PathBuf {
    let mut dss = create_new_file(file).unwrap();
    for path in paths {
        let path: DatasetPath = path.parse().unwrap();
        serde_json::to_writer(&dss, &record(&path)).unwrap();
        dss.write_all(b"\n").unwrap();
    }
    file.to_path_buf()
}

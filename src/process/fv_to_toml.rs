use crate::config::fv::read_fv;
use crate::dss::{DssBackend, DssError, DssFile};
use crate::types::dataset_path::DatasetPath;
use crate::util::create_new_file;
use anyhow::{Context, Result};
use itertools::Itertools;
use log::{info, warn};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

const RULE_WIDTH: usize = 72;

#[derive(Debug, Serialize)]
struct FvToml {
    paths: Vec<PathEntry>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PathEntry {
    pub name: String,
    pub path: String,
    pub category: String,
    pub units: String,
    pub period_type: String,
    pub interval: String,
    pub detail: String,
}

impl PathEntry {
    fn bare(template: &DatasetPath) -> Self {
        PathEntry {
            name: template.b.clone(),
            path: template.to_string(),
            ..PathEntry::default()
        }
    }
}

pub fn default_destination(src: &Path) -> PathBuf {
    let stem = src
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    src.with_file_name(format!("{stem}-fv.toml"))
}

/// Looks every template up in `dss`. Templates that are missing or ambiguous keep
/// only their name and path.
pub fn read_context(dss: &impl DssFile, templates: &[DatasetPath]) -> Result<Vec<PathEntry>> {
    info!("context for {} paths read", templates.len());
    templates
        .iter()
        .map(|template| match dss.read_single(template) {
            Ok(record) => Ok(PathEntry {
                name: record.path.b.clone(),
                path: record.path.to_string(),
                units: record.units,
                period_type: record.period_type,
                interval: record.interval,
                ..PathEntry::default()
            }),
            Err(DssError::DatasetNotFound(_)) => {
                warn!("couldn't find {template}, defaulting to no additional context for this path");
                Ok(PathEntry::bare(template))
            }
            Err(DssError::UnexpectedReturn { count, .. }) => {
                warn!(
                    "{template} returned {count} datasets, defaulting to no additional context for this path"
                );
                Ok(PathEntry::bare(template))
            }
            Err(err) => Err(err.into()),
        })
        .collect()
}

pub fn convert<B: DssBackend>(
    backend: &B,
    src: &Path,
    dst: &Path,
    dss: Option<&Path>,
) -> Result<Vec<PathEntry>> {
    info!("{} -> {}", src.display(), dst.display());
    info!("reading fv file: {}", src.display());
    let templates = read_fv(src, b'\t')?;

    let entries = match dss {
        Some(dss) => {
            info!("reading additional metadata from {}", dss.display());
            let file = backend
                .open(dss)
                .with_context(|| format!("Failed to open {dss:?}"))?;
            read_context(&file, &templates)?
        }
        None => {
            info!("no dss given, the toml will be empty of most metadata");
            templates.iter().map(PathEntry::bare).collect()
        }
    };
    // One entry per resolved path, or per template when nothing was resolved.
    let entries: Vec<PathEntry> = entries
        .into_iter()
        .unique_by(|entry| entry.path.clone())
        .collect();

    info!("writing toml");
    let mut out = create_new_file(dst)?;
    write!(out, "{}", header(src, dss))?;
    let body = toml::to_string(&FvToml {
        paths: entries.clone(),
    })?;
    out.write_all(body.as_bytes())?;

    Ok(entries)
}

fn header(src: &Path, dss: Option<&Path>) -> String {
    let rule = "#".repeat(RULE_WIDTH);
    let mut lines = vec![
        rule.clone(),
        "# This toml file was automatically created by the blendss utility.".to_string(),
        "# This file contains paths and their metadata from an `fv` file.".to_string(),
        format!("# The original `fv` file was: {}", src.display()),
    ];
    if let Some(dss) = dss {
        lines.push(format!(
            "# Additional metadata was added by reading: {}",
            dss.display()
        ));
    }
    lines.push(rule);
    format!("{}\n\n", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dss::ndjson::NdjsonDss;
    use crate::test::prepare_dss::{write_dss, KESWICK_1920, SHASTA_1920, SHASTA_1930};
    use serde::Deserialize;
    use std::fs;
    use tempdir::TempDir;

    #[derive(Deserialize)]
    struct Written {
        paths: Vec<toml::Table>,
    }

    fn write_fv(dir: &Path) -> PathBuf {
        let src = dir.join("paths.fv");
        fs::write(
            &src,
            "B\tC\nS_SHSTA\tSTORAGE\nC_KSWCK\tCHANNEL\nS_FOLSM\tSTORAGE\n",
        )
        .unwrap();
        src
    }

    #[test]
    fn default_destination_sits_next_to_source() {
        assert_eq!(
            default_destination(Path::new("/data/calsim3.fv")),
            PathBuf::from("/data/calsim3-fv.toml")
        );
    }

    #[test]
    fn converts_without_dss() {
        let dir = TempDir::new("fv_to_toml").unwrap();
        let src = write_fv(dir.path());
        let dst = default_destination(&src);

        let entries = convert(&NdjsonDss, &src, &dst, None).unwrap();

        assert_eq!(entries.len(), 3);
        let content = fs::read_to_string(&dst).unwrap();
        assert!(content.starts_with(&"#".repeat(72)));
        assert!(!content.contains("Additional metadata"));
        let written: Written = toml::from_str(&content).unwrap();
        assert_eq!(written.paths.len(), 3);
        assert_eq!(written.paths[0]["name"].as_str(), Some("S_SHSTA"));
        assert_eq!(
            written.paths[0]["path"].as_str(),
            Some("/.*/S_SHSTA/STORAGE/.*/.*/.*/")
        );
        assert_eq!(written.paths[0]["units"].as_str(), Some(""));
    }

    #[test]
    fn fills_metadata_from_dss() {
        let dir = TempDir::new("fv_to_toml").unwrap();
        let src = write_fv(dir.path());
        let dss = write_dss(
            &dir.path().join("source.dss"),
            &[SHASTA_1920, SHASTA_1930, KESWICK_1920],
        );
        let dst = dir.path().join("out.toml");

        let entries = convert(&NdjsonDss, &src, &dst, Some(&dss)).unwrap();

        assert_eq!(
            entries,
            vec![
                PathEntry::bare(&DatasetPath::template("S_SHSTA", "STORAGE")),
                PathEntry {
                    name: "C_KSWCK".to_string(),
                    path: KESWICK_1920.to_string(),
                    units: "TAF".to_string(),
                    period_type: "PER-AVER".to_string(),
                    interval: "1MON".to_string(),
                    ..PathEntry::default()
                },
                PathEntry::bare(&DatasetPath::template("S_FOLSM", "STORAGE")),
            ]
        );
        assert!(fs::read_to_string(&dst)
            .unwrap()
            .contains("# Additional metadata was added by reading:"));
    }

    #[test]
    fn duplicate_rows_collapse_to_one_entry_per_path() {
        let dir = TempDir::new("fv_to_toml").unwrap();
        let src = dir.path().join("dupes.fv");
        fs::write(
            &src,
            "B\tC\nC_KSWCK\tCHANNEL\nC_KSWCK\tCHANNEL\nC_KSWCK\t.*\n",
        )
        .unwrap();
        let dss = write_dss(&dir.path().join("source.dss"), &[KESWICK_1920]);

        let with_dss =
            convert(&NdjsonDss, &src, &dir.path().join("with.toml"), Some(&dss)).unwrap();
        let without_dss =
            convert(&NdjsonDss, &src, &dir.path().join("without.toml"), None).unwrap();

        assert_eq!(with_dss.len(), 1);
        assert_eq!(with_dss[0].path, KESWICK_1920);
        assert_eq!(
            without_dss
                .iter()
                .map(|entry| entry.path.as_str())
                .collect::<Vec<_>>(),
            vec!["/.*/C_KSWCK/CHANNEL/.*/.*/.*/", "/.*/C_KSWCK/.*/.*/.*/.*/"]
        );
        let written: Written =
            toml::from_str(&fs::read_to_string(dir.path().join("with.toml")).unwrap()).unwrap();
        assert_eq!(written.paths.len(), 1);
    }

    #[test]
    fn name_comes_from_the_resolved_path() {
        let dir = TempDir::new("fv_to_toml").unwrap();
        let src = dir.path().join("regex.fv");
        fs::write(&src, "B\tC\nC_KSW.*\tCHANNEL\n").unwrap();
        let dss = write_dss(&dir.path().join("source.dss"), &[KESWICK_1920]);

        let entries = convert(&NdjsonDss, &src, &dir.path().join("out.toml"), Some(&dss)).unwrap();

        assert_eq!(entries[0].name, "C_KSWCK");
    }

    #[test]
    fn empty_fv_writes_an_empty_listing() {
        let dir = TempDir::new("fv_to_toml").unwrap();
        let src = dir.path().join("empty.fv");
        fs::write(&src, "B\tC\n").unwrap();
        let dst = dir.path().join("out.toml");

        let entries = convert(&NdjsonDss, &src, &dst, None).unwrap();

        assert!(entries.is_empty());
        let written: toml::Table = toml::from_str(&fs::read_to_string(&dst).unwrap()).unwrap();
        assert!(written.get("paths").map_or(true, |paths| paths
            .as_array()
            .is_some_and(|paths| paths.is_empty())));
    }
}

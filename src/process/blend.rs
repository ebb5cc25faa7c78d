use crate::config::studies::Study;
use crate::dss::catalog::Catalog;
use crate::dss::{DssBackend, DssFile};
use crate::types::dataset_path::DatasetPath;
use crate::util::absolute;
use anyhow::{bail, Context, Result};
use itertools::Itertools;
use log::{debug, error, info, warn};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudySummary {
    pub dss: PathBuf,
    pub paths_found: usize,
    pub paths_copied: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlendReport {
    pub new_dss: PathBuf,
    pub studies: Vec<StudySummary>,
    /// New paths written by more than one study; the last study wins.
    pub collisions: Vec<DatasetPath>,
}

/// Overwrites A, B, C and F with the study's values where it sets them. D and E
/// always come from the source path.
pub fn replace_parts(path: &DatasetPath, study: &Study) -> DatasetPath {
    let pick = |replacement: &Option<String>, original: &String| match replacement {
        Some(value) if !value.is_empty() => value.clone(),
        _ => original.clone(),
    };
    DatasetPath {
        a: pick(&study.a, &path.a),
        b: pick(&study.b, &path.b),
        c: pick(&study.c, &path.c),
        d: path.d.clone(),
        e: path.e.clone(),
        f: pick(&study.f, &path.f),
    }
}

pub fn resolve_wildcards(
    catalog: &Catalog,
    templates: &[DatasetPath],
) -> Result<BTreeSet<DatasetPath>> {
    let mut resolved = BTreeSet::new();
    for template in templates {
        if !template.has_wildcard() {
            debug!("{template} has no wildcard, matching it literally");
        }
        resolved.extend(catalog.resolve_wildcard(template)?);
    }
    Ok(resolved)
}

pub fn generate_new_paths(
    paths: &BTreeSet<DatasetPath>,
    study: &Study,
) -> Vec<(DatasetPath, DatasetPath)> {
    paths
        .iter()
        .map(|path| (path.clone(), replace_parts(path, study)))
        .collect()
}

/// Copies every record matched by `templates` out of each study into `new_dss`,
/// renamed per study.
pub fn blend<B: DssBackend>(
    backend: &B,
    new_dss: &Path,
    studies: &[Study],
    templates: &[DatasetPath],
) -> Result<BlendReport> {
    if studies.is_empty() {
        bail!("At least one study is required to blend");
    }
    let new_dss = absolute(new_dss)?;

    let mut summaries = Vec::with_capacity(studies.len());
    let mut all_new_paths = Vec::new();

    for study in studies {
        info!("finding data in {}", study.dss.display());
        let catalog = backend
            .open(&study.dss)
            .and_then(|dss| dss.read_catalog())
            .with_context(|| format!("Failed to read the catalog of {study}"))?;

        if catalog.is_empty() {
            warn!("{} has no records", study.dss.display());
        } else {
            debug!("catalog holds {} paths", catalog.len());
        }

        let no_wildcard = resolve_wildcards(&catalog, templates)?;
        info!("{} paths found", no_wildcard.len());

        let pairs = generate_new_paths(&no_wildcard, study);
        let unique_new_paths: BTreeSet<&DatasetPath> = pairs.iter().map(|(_, new)| new).collect();
        info!("{} paths generated", unique_new_paths.len());

        if unique_new_paths.len() != no_wildcard.len() {
            error!("old/new paths size mis-match");
            bail!(
                "The number of unique paths was reduced after replacing A-F parts for {study}, \
                 there is no longer a 1 to 1 relationship between old paths and new paths \
                 that does not cause data to be overwritten in the resulting dss."
            );
        }

        info!("copying data for {study}");
        let copied = backend
            .copy_records(&study.dss, &new_dss, &pairs)
            .with_context(|| format!("Failed to copy data for {study} into {new_dss:?}"))?;

        all_new_paths.extend(pairs.into_iter().map(|(_, new)| new));
        summaries.push(StudySummary {
            dss: study.dss.clone(),
            paths_found: no_wildcard.len(),
            paths_copied: copied,
        });
    }

    let collisions = find_collisions(all_new_paths);
    if !collisions.is_empty() {
        warn!("name collisions occurred, data was not transferred to new dss");
        for path in &collisions {
            warn!("{path} had a name collision and was overwritten.");
        }
    }

    Ok(BlendReport {
        new_dss,
        studies: summaries,
        collisions,
    })
}

fn find_collisions(paths: Vec<DatasetPath>) -> Vec<DatasetPath> {
    paths
        .into_iter()
        .counts()
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(path, _)| path)
        .sorted()
        .collect()
}

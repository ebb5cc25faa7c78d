use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// One source container plus the parts to overwrite on every path copied from it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Study {
    pub dss: PathBuf,
    #[serde(default)]
    pub a: Option<String>,
    #[serde(default)]
    pub b: Option<String>,
    #[serde(default)]
    pub c: Option<String>,
    #[serde(default)]
    pub f: Option<String>,
}

impl Study {
    pub fn new(dss: impl Into<PathBuf>) -> Self {
        Study {
            dss: dss.into(),
            a: None,
            b: None,
            c: None,
            f: None,
        }
    }
}

impl fmt::Display for Study {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Study(dss={})", self.dss.display())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StudyConfig {
    pub studies: Vec<Study>,
}

impl StudyConfig {
    /// Reads the `study` list from a TOML (`[[study]]`) or YAML (`study:`) file.
    pub fn read_from_file(file: &Path) -> Result<StudyConfig> {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Tried to read study config from {file:?}"))?;

        let studies = match file.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => {
                let items = match serde_yaml::from_str::<serde_yaml::Value>(&content)? {
                    serde_yaml::Value::Null => Vec::new(),
                    serde_yaml::Value::Mapping(mut document) => match document.remove("study") {
                        None => Vec::new(),
                        Some(serde_yaml::Value::Sequence(items)) => items,
                        Some(_) => bail!("`study` in {file:?} must be a list"),
                    },
                    _ => bail!("{file:?} must contain a mapping at the top level"),
                };
                parse_studies(items, file, |item| Ok(serde_yaml::from_value::<Study>(item)?))?
            }
            _ => {
                let items = match toml::from_str::<toml::Table>(&content)?.remove("study") {
                    None => Vec::new(),
                    Some(toml::Value::Array(items)) => items,
                    Some(_) => bail!("`study` in {file:?} must be an array of tables"),
                };
                parse_studies(items, file, |item| Ok(item.try_into::<Study>()?))?
            }
        };
        Ok(StudyConfig { studies })
    }

    pub fn len(&self) -> usize {
        self.studies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.studies.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Study> {
        self.studies.iter()
    }
}

impl<'a> IntoIterator for &'a StudyConfig {
    type Item = &'a Study;
    type IntoIter = std::slice::Iter<'a, Study>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn parse_studies<V>(
    items: Vec<V>,
    file: &Path,
    parse: impl Fn(V) -> Result<Study>,
) -> Result<Vec<Study>> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            parse(item).with_context(|| format!("could not parse study {i} in {file:?}"))
        })
        .collect()
}

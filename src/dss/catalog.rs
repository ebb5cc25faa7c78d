use crate::dss::DssError;
use crate::types::dataset_path::{is_any_part, DatasetPath};
use regex::Regex;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub paths: Vec<DatasetPath>,
}

impl Catalog {
    pub fn new(paths: Vec<DatasetPath>) -> Self {
        Catalog { paths }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// All catalog paths matched part by part by `pattern`.
    pub fn resolve_wildcard(&self, pattern: &DatasetPath) -> Result<BTreeSet<DatasetPath>, DssError> {
        let matcher = PathMatcher::new(pattern)?;
        Ok(self
            .paths
            .iter()
            .filter(|path| matcher.is_match(path))
            .cloned()
            .collect())
    }
}

struct PathMatcher {
    parts: Vec<Option<Regex>>,
}

impl PathMatcher {
    fn new(pattern: &DatasetPath) -> Result<Self, DssError> {
        let parts = pattern
            .parts()
            .into_iter()
            .map(|(part, value)| {
                if is_any_part(value) {
                    return Ok(None);
                }
                Regex::new(&format!("^(?:{value})$"))
                    .map(Some)
                    .map_err(|source| DssError::InvalidPattern {
                        part,
                        path: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, DssError>>()?;
        Ok(PathMatcher { parts })
    }

    fn is_match(&self, path: &DatasetPath) -> bool {
        self.parts
            .iter()
            .zip(path.parts())
            .all(|(matcher, (_, value))| matcher.as_ref().map_or(true, |re| re.is_match(value)))
    }
}

use crate::dss::DssError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const ANY_PART: &str = ".*";

/// A six-part `/A/B/C/D/E/F/` record identifier. Parts may be regular expressions
/// when the path is used as a template against a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetPath {
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
    pub e: String,
    pub f: String,
}

impl DatasetPath {
    pub fn new(a: &str, b: &str, c: &str, d: &str, e: &str, f: &str) -> Self {
        DatasetPath {
            a: a.to_string(),
            b: b.to_string(),
            c: c.to_string(),
            d: d.to_string(),
            e: e.to_string(),
            f: f.to_string(),
        }
    }

    /// Template that pins B and C and leaves every other part open.
    pub fn template(b: &str, c: &str) -> Self {
        DatasetPath::new(ANY_PART, b, c, ANY_PART, ANY_PART, ANY_PART)
    }

    pub fn parts(&self) -> [(char, &str); 6] {
        [
            ('A', &self.a),
            ('B', &self.b),
            ('C', &self.c),
            ('D', &self.d),
            ('E', &self.e),
            ('F', &self.f),
        ]
    }

    pub fn has_wildcard(&self) -> bool {
        self.parts()
            .iter()
            .any(|(_, part)| is_any_part(part) || part.chars().any(is_regex_meta))
    }
}

pub fn is_any_part(part: &str) -> bool {
    part == "*" || part == ANY_PART
}

fn is_regex_meta(c: char) -> bool {
    matches!(
        c,
        '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^' | '$' | '\\'
    )
}

impl fmt::Display for DatasetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/{}/{}/{}/{}/{}/{}/",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

impl FromStr for DatasetPath {
    type Err = DssError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DssError::InvalidPath(s.to_string());
        let inner = s
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
            .ok_or_else(invalid)?;
        let parts: Vec<&str> = inner.split('/').collect();
        let [a, b, c, d, e, f] = parts.as_slice() else {
            return Err(invalid());
        };
        Ok(DatasetPath::new(a, b, c, d, e, f))
    }
}

impl Serialize for DatasetPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DatasetPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

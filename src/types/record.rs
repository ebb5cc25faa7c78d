use crate::types::dataset_path::DatasetPath;
use serde::{Deserialize, Serialize};

/// One regular time-series record as stored in a container file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularTimeSeries {
    pub path: DatasetPath,
    pub values: Vec<f64>,
    pub dates: Vec<String>,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub period_type: String,
    #[serde(default)]
    pub interval: String,
}

impl RegularTimeSeries {
    pub fn renamed(mut self, path: DatasetPath) -> Self {
        self.path = path;
        self
    }
}

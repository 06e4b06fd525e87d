use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::DatasetError;
use crate::global_cast::Matrix4d;
use crate::sync::AssociationStats;

/// 归一化后的轨迹，camera-to-world，行优先
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TrajectorySave {
    pub dataset: String,
    pub frame_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<AssociationStats>,
    pub poses: Vec<[[f64; 4]; 4]>,
}

impl From<&Dataset> for TrajectorySave {
    fn from(dataset: &Dataset) -> Self {
        Self {
            dataset: dataset.name.to_string(),
            frame_count: dataset.len(),
            stats: dataset.stats().copied(),
            poses: dataset
                .poses()
                .iter()
                .map(|pose| Matrix4d(*pose).into())
                .collect(),
        }
    }
}

impl TrajectorySave {
    pub fn write_to_json(&self, path: impl AsRef<Path>) -> Result<(), DatasetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn read_from_json(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

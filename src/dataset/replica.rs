use std::path::{Path, PathBuf};

use super::{catalog, DatasetTrait, FrameCatalog};
use crate::error::DatasetError;
use crate::io;
use crate::pose::{PoseAnchor, RawPose};

/// Replica: results/frame*.jpg, results/depth*.png, traj.txt 每行一个 4x4 矩阵
#[derive(Debug, Clone)]
pub struct ReplicaDataset {
    pub input_folder: PathBuf,
}

impl ReplicaDataset {
    const RESULTS_PATH: &'static str = "results";
    const TRAJ_FILE: &'static str = "traj.txt";

    pub fn new(input_folder: &Path) -> Self {
        Self {
            input_folder: input_folder.to_path_buf(),
        }
    }

    pub fn read_poses(path: &Path, n_img: usize) -> Result<Vec<RawPose>, DatasetError> {
        let rows = io::read_float_rows(path, 0)?;
        if rows.len() < n_img {
            return Err(DatasetError::malformed_pose(
                path.display().to_string(),
                format!("{} poses for {} frames", rows.len(), n_img),
            ));
        }
        rows.iter()
            .take(n_img)
            .map(|row| match row.len() {
                16 => RawPose::from_values(row, &path.display().to_string()),
                n => Err(DatasetError::malformed_pose(
                    path.display().to_string(),
                    format!("expected 16 values, got {}", n),
                )),
            })
            .collect()
    }
}

impl DatasetTrait for ReplicaDataset {
    fn list_frames(&self) -> Result<FrameCatalog, DatasetError> {
        let results = self.input_folder.join(Self::RESULTS_PATH);
        let color_paths = catalog::list_files(&results, "frame", "jpg")?;
        let depth_paths = catalog::list_files(&results, "depth", "png")?;
        let raw_poses = Self::read_poses(&self.input_folder.join(Self::TRAJ_FILE), color_paths.len())?;
        Ok(FrameCatalog {
            color_paths,
            depth_paths,
            mask_paths: None,
            raw_poses,
            stats: None,
        })
    }

    fn pose_anchor(&self) -> PoseAnchor {
        PoseAnchor::World
    }
}

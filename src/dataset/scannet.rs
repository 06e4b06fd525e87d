use std::path::{Path, PathBuf};

use super::{catalog, DatasetTrait, FrameCatalog};
use crate::error::DatasetError;
use crate::io;
use crate::pose::{PoseAnchor, RawPose};

/// ScanNet: frames/color/<n>.jpg, frames/depth/<n>.png, frames/pose/<n>.txt
#[derive(Debug, Clone)]
pub struct ScanNetDataset {
    pub input_folder: PathBuf,
}

impl ScanNetDataset {
    const FRAMES_PATH: &'static str = "frames";

    pub fn new(input_folder: &Path) -> Self {
        Self {
            input_folder: input_folder.join(Self::FRAMES_PATH),
        }
    }

    /// 每个文件是一个 4x4 矩阵，按行存储
    pub fn read_pose(path: &Path) -> Result<RawPose, DatasetError> {
        let values: Vec<f64> = io::read_float_rows(path, 0)?.concat();
        if values.len() != 16 {
            return Err(DatasetError::malformed_pose(
                path.display().to_string(),
                format!("expected 16 values, got {}", values.len()),
            ));
        }
        RawPose::from_values(&values, &path.display().to_string())
    }
}

impl DatasetTrait for ScanNetDataset {
    fn list_frames(&self) -> Result<FrameCatalog, DatasetError> {
        let color_paths = catalog::list_files(&self.input_folder.join("color"), "", "jpg")?;
        let depth_paths = catalog::list_files(&self.input_folder.join("depth"), "", "png")?;
        let raw_poses = catalog::list_files(&self.input_folder.join("pose"), "", "txt")?
            .iter()
            .map(|path| Self::read_pose(path))
            .collect::<Result<Vec<_>, _>>()?;
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

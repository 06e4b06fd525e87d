//! 数据集处理
//!
//! Replica    https://github.com/facebookresearch/Replica-Dataset
//! ScanNet    http://www.scan-net.org/
//! TUM RGB-D  https://cvg.cit.tum.de/data/datasets/rgbd-dataset
//!
//! 构建时一次性完成文件列表、时间关联和位姿归一化；读取帧时才解码和预处理图像，不做缓存。

mod catalog;
mod replica;
mod scannet;
mod tum_rgbd;

pub use catalog::{list_files, sort_paths};
pub use replica::ReplicaDataset;
pub use scannet::ScanNetDataset;
pub use tum_rgbd::TumRgbdDataset;

use std::path::{Path, PathBuf};

use nalgebra::Matrix4;

use crate::camera::CameraTrait;
use crate::config::DatasetConfig;
use crate::error::DatasetError;
use crate::global_types::Frame;
use crate::io;
use crate::pose::{PoseAnchor, PoseNormalizer, RawPose};
use crate::preprocess::{FramePreprocessor, RawFrame};
use crate::sync::AssociationStats;

/// 数据集列出的帧：路径和对应的原始位姿
#[derive(Debug, Clone, Default)]
pub struct FrameCatalog {
    pub color_paths: Vec<PathBuf>,
    pub depth_paths: Vec<PathBuf>,
    /// None 表示该数据集没有掩码
    pub mask_paths: Option<Vec<PathBuf>>,
    pub raw_poses: Vec<RawPose>,
    /// 只有需要时间关联的数据集才有
    pub stats: Option<AssociationStats>,
}

pub trait DatasetTrait {
    /// 列出帧的路径和原始位姿
    fn list_frames(&self) -> Result<FrameCatalog, DatasetError>;
    fn pose_anchor(&self) -> PoseAnchor;

    /// 归一化位姿
    fn load_poses(&self, raw_poses: &[RawPose]) -> Result<Vec<Matrix4<f64>>, DatasetError> {
        PoseNormalizer::normalize_all(self.pose_anchor(), raw_poses)
    }
}

#[derive(Debug, Clone)]
pub enum DatasetKind {
    Replica(ReplicaDataset),
    ScanNet(ScanNetDataset),
    TumRgbd(TumRgbdDataset),
}

impl DatasetKind {
    pub fn from_name(name: &str, input_folder: &Path) -> Result<Self, DatasetError> {
        match name.to_ascii_lowercase().as_str() {
            "replica" => Ok(Self::Replica(ReplicaDataset::new(input_folder))),
            "scannet" => Ok(Self::ScanNet(ScanNetDataset::new(input_folder))),
            "tumrgbd" => Ok(Self::TumRgbd(TumRgbdDataset::new(input_folder))),
            other => Err(DatasetError::InvalidConfig(format!(
                "unknown dataset {:?}",
                other
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Replica(_) => "replica",
            Self::ScanNet(_) => "scannet",
            Self::TumRgbd(_) => "tumrgbd",
        }
    }
}

impl DatasetTrait for DatasetKind {
    fn list_frames(&self) -> Result<FrameCatalog, DatasetError> {
        match self {
            Self::Replica(d) => d.list_frames(),
            Self::ScanNet(d) => d.list_frames(),
            Self::TumRgbd(d) => d.list_frames(),
        }
    }

    fn pose_anchor(&self) -> PoseAnchor {
        match self {
            Self::Replica(d) => d.pose_anchor(),
            Self::ScanNet(d) => d.pose_anchor(),
            Self::TumRgbd(d) => d.pose_anchor(),
        }
    }
}

/// 可随机访问的帧序列
///
/// 只保存不可变的路径表和位姿表，`get` 可以在多个线程中同时调用。
#[derive(Debug)]
pub struct Dataset {
    pub name: &'static str,
    color_paths: Vec<PathBuf>,
    depth_paths: Vec<PathBuf>,
    mask_paths: Option<Vec<PathBuf>>,
    poses: Vec<Matrix4<f64>>,
    stats: Option<AssociationStats>,
    preprocessor: FramePreprocessor,
}

impl Dataset {
    pub fn new(config: &DatasetConfig) -> Result<Self, DatasetError> {
        let kind = DatasetKind::from_name(&config.dataset, &config.data.input_folder)?;
        let preprocessor = FramePreprocessor::from_config(&config.cam)?;
        Self::from_kind(&kind, preprocessor)
    }

    pub fn from_kind(
        kind: &DatasetKind,
        preprocessor: FramePreprocessor,
    ) -> Result<Self, DatasetError> {
        let catalog = kind.list_frames()?;
        let mut poses = kind.load_poses(&catalog.raw_poses)?;
        let n_img = catalog.color_paths.len();
        let masks_ok = catalog
            .mask_paths
            .as_ref()
            .map_or(true, |masks| masks.len() == n_img);
        if catalog.depth_paths.len() != n_img || poses.len() < n_img || !masks_ok {
            return Err(DatasetError::StreamLengthMismatch {
                color: n_img,
                depth: catalog.depth_paths.len(),
                poses: poses.len(),
            });
        }
        poses.truncate(n_img);

        log::info!(
            "dataset {}: {} frames, {:?} camera, {}",
            kind.name(),
            n_img,
            preprocessor.camera.get_camera_type(),
            if catalog.mask_paths.is_some() {
                "masked"
            } else {
                "unmasked"
            }
        );
        Ok(Self {
            name: kind.name(),
            color_paths: catalog.color_paths,
            depth_paths: catalog.depth_paths,
            mask_paths: catalog.mask_paths,
            poses,
            stats: catalog.stats,
            preprocessor,
        })
    }

    pub fn len(&self) -> usize {
        self.color_paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.color_paths.is_empty()
    }

    pub fn poses(&self) -> &[Matrix4<f64>] {
        &self.poses
    }

    /// 关联与子采样的统计；不需要关联的数据集为 None
    pub fn stats(&self) -> Option<&AssociationStats> {
        self.stats.as_ref()
    }

    /// 解码并预处理第 `index` 帧
    pub fn get(&self, index: usize) -> Result<Frame, DatasetError> {
        if index >= self.len() {
            return Err(DatasetError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        let color = io::read_color(&self.color_paths[index])?;
        let depth = io::read_depth(&self.depth_paths[index])?;
        let mask = match &self.mask_paths {
            Some(mask_paths) => Some(io::read_mask(&mask_paths[index])?),
            None => None,
        };
        log::debug!(
            "frame {}: {:?} {:?}",
            index,
            self.color_paths[index],
            self.depth_paths[index]
        );
        let processed = self.preprocessor.process(RawFrame { color, depth, mask })?;
        Ok(Frame {
            index,
            color: processed.color,
            depth: processed.depth,
            pose: self.poses[index],
            mask: processed.mask,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<Frame, DatasetError>> + '_ {
        (0..self.len()).map(move |index| self.get(index))
    }
}

use std::path::{Path, PathBuf};

use super::{DatasetTrait, FrameCatalog};
use crate::config::{MAX_DT, TUM_FRAME_RATE};
use crate::error::DatasetError;
use crate::global_types::StreamRecord;
use crate::io;
use crate::pose::{PoseAnchor, RawPose};
use crate::sync::{associate_frames, subsample_by_rate, AssociationStats};

/// TUM RGB-D: rgb.txt、depth.txt、mask.txt 索引文件与 groundtruth.txt 位姿
///
/// 各流时间戳不同步，需要关联和子采样。掩码和彩色图共用下标。
#[derive(Debug, Clone)]
pub struct TumRgbdDataset {
    pub input_folder: PathBuf,
    pub frame_rate: f64,
}

impl TumRgbdDataset {
    const IMAGE_LIST: &'static str = "rgb.txt";
    const DEPTH_LIST: &'static str = "depth.txt";
    const MASK_LIST: &'static str = "mask.txt";
    const POSE_LISTS: [&'static str; 2] = ["groundtruth.txt", "pose.txt"];

    pub fn new(input_folder: &Path) -> Self {
        Self {
            input_folder: input_folder.to_path_buf(),
            frame_rate: TUM_FRAME_RATE,
        }
    }

    fn pose_list(&self) -> Result<PathBuf, DatasetError> {
        Self::POSE_LISTS
            .iter()
            .map(|name| self.input_folder.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| DatasetError::MissingStreamFile(self.input_folder.join(Self::POSE_LISTS[0])))
    }

    /// 位姿文件：跳过首行，每行为时间戳加 7 个数 (t, q) 或 16 个数
    pub fn read_poses(path: &Path) -> Result<(Vec<f64>, Vec<RawPose>), DatasetError> {
        let origin = path.display().to_string();
        let mut timestamps = Vec::new();
        let mut raws = Vec::new();
        for row in io::read_float_rows(path, 1)? {
            let Some((&timestamp, pvec)) = row.split_first() else {
                continue;
            };
            timestamps.push(timestamp);
            raws.push(RawPose::from_values(pvec, &origin)?);
        }
        Ok((timestamps, raws))
    }
}

impl DatasetTrait for TumRgbdDataset {
    fn list_frames(&self) -> Result<FrameCatalog, DatasetError> {
        let base = &self.input_folder;
        let image_data = io::read_stream_list(&base.join(Self::IMAGE_LIST), base)?;
        let depth_data = io::read_stream_list(&base.join(Self::DEPTH_LIST), base)?;
        let mask_list = base.join(Self::MASK_LIST);
        let mask_data = if mask_list.is_file() {
            Some(io::read_stream_list(&mask_list, base)?)
        } else {
            log::info!("no {} in {:?}, frames are unmasked", Self::MASK_LIST, base);
            None
        };
        let (tstamp_pose, pose_vecs) = Self::read_poses(&self.pose_list()?)?;

        let tstamp_image = StreamRecord::timestamps(&image_data);
        let tstamp_depth = StreamRecord::timestamps(&depth_data);
        let associations = associate_frames(&tstamp_image, &tstamp_depth, Some(&tstamp_pose), MAX_DT);
        let indices = subsample_by_rate(&associations, &tstamp_image, self.frame_rate);

        let mut catalog = FrameCatalog {
            mask_paths: mask_data.as_ref().map(|_| Vec::with_capacity(indices.len())),
            ..Default::default()
        };
        for ix in indices {
            let association = associations[ix];
            let Some(k) = association.pose else {
                continue;
            };
            catalog.color_paths.push(image_data[association.image].path.clone());
            catalog.depth_paths.push(depth_data[association.depth].path.clone());
            catalog.raw_poses.push(pose_vecs[k].clone());
            if let (Some(mask_paths), Some(mask_data)) = (catalog.mask_paths.as_mut(), &mask_data) {
                // 掩码与彩色图绑定
                let record = mask_data.get(association.image).ok_or_else(|| {
                    DatasetError::MalformedStreamRecord {
                        path: mask_list.clone(),
                        line: mask_data.len(),
                        reason: format!("no mask for image {}", association.image),
                    }
                })?;
                mask_paths.push(record.path.clone());
            }
        }

        let stats = AssociationStats {
            anchors: image_data.len(),
            associated: associations.len(),
            retained: catalog.color_paths.len(),
        };
        if stats.dropped_unmatched() > 0 {
            log::warn!(
                "{} of {} images have no depth/pose within {}s",
                stats.dropped_unmatched(),
                stats.anchors,
                MAX_DT
            );
        }
        log::debug!("association stats: {:?}", stats);
        catalog.stats = Some(stats);
        Ok(catalog)
    }

    fn pose_anchor(&self) -> PoseAnchor {
        PoseAnchor::FirstFrame
    }
}

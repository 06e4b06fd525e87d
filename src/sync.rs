//! 时间同步
//!
//! 以彩色图像流为锚，按最近时间戳关联深度流和位姿流，然后按目标帧率子采样。

use serde::{Deserialize, Serialize};

use crate::global_types::{Association, Timestamp};
use crate::utility::Utility;

/// 关联与子采样的统计，用于检查丢帧
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationStats {
    /// 锚流（彩色图像）的条目数
    pub anchors: usize,
    /// 容差内找到匹配的条目数
    pub associated: usize,
    /// 子采样后保留的帧数
    pub retained: usize,
}

impl AssociationStats {
    /// 因超出容差被丢弃的锚帧数
    pub fn dropped_unmatched(&self) -> usize {
        self.anchors - self.associated
    }

    /// 因帧率限制被丢弃的帧数
    pub fn dropped_by_rate(&self) -> usize {
        self.associated - self.retained
    }
}

/// 关联图像、深度和位姿
///
/// 对每个图像下标 `i`，取 `j = argmin |tstamp_depth - t|`，有位姿流时取
/// `k = argmin |tstamp_pose - t|`。所有时间差都小于 `max_dt` 才输出，否则跳过 `i`。
pub fn associate_frames(
    tstamp_image: &[Timestamp],
    tstamp_depth: &[Timestamp],
    tstamp_pose: Option<&[Timestamp]>,
    max_dt: f64,
) -> Vec<Association> {
    let mut associations = Vec::new();
    for (i, &t) in tstamp_image.iter().enumerate() {
        let Some(j) = Utility::nearest_index(tstamp_depth, t) else {
            continue;
        };
        if (tstamp_depth[j] - t).abs() >= max_dt {
            continue;
        }
        let pose = match tstamp_pose {
            None => None,
            Some(tstamp_pose) => match Utility::nearest_index(tstamp_pose, t) {
                Some(k) if (tstamp_pose[k] - t).abs() < max_dt => Some(k),
                _ => continue,
            },
        };
        associations.push(Association {
            image: i,
            depth: j,
            pose,
        });
    }
    associations
}

/// 按帧率子采样，返回保留的关联下标
///
/// 总是保留第一个关联；之后的候选只有在其图像时间戳比上一次保留的时间戳至少大 `1 / frame_rate`
/// 时才保留。`frame_rate <= 0` 表示不限制帧率。
pub fn subsample_by_rate(
    associations: &[Association],
    tstamp_image: &[Timestamp],
    frame_rate: f64,
) -> Vec<usize> {
    if associations.is_empty() {
        return Vec::new();
    }
    let interval = 1.0 / frame_rate;
    let mut indices = vec![0];
    for i in 1..associations.len() {
        let last = associations[indices[indices.len() - 1]];
        let t0 = tstamp_image[last.image];
        let t1 = tstamp_image[associations[i].image];
        if frame_rate <= 0.0 || t1 - t0 >= interval {
            indices.push(i);
        }
    }
    indices
}

use std::path::PathBuf;

use thiserror::Error;

/// 数据集构建与帧读取的错误
#[derive(Debug, Error)]
pub enum DatasetError {
    /// 必需的索引文件或位姿文件不存在
    #[error("missing stream file: {}", .0.display())]
    MissingStreamFile(PathBuf),

    /// 位姿记录长度错误，或第一帧位姿不可逆
    #[error("malformed pose record ({origin}): {reason}")]
    MalformedPoseRecord { origin: String, reason: String },

    #[error("malformed stream record in {} at line {line}: {reason}", .path.display())]
    MalformedStreamRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("stream length mismatch: {color} color, {depth} depth, {poses} poses")]
    StreamLengthMismatch {
        color: usize,
        depth: usize,
        poses: usize,
    },

    /// 图像解码失败
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("frame index {index} out of range for {len} frames")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DatasetError {
    pub(crate) fn malformed_pose(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPoseRecord {
            origin: origin.into(),
            reason: reason.into(),
        }
    }
}

//! 位姿归一化
//!
//! 将原始位姿（平移 + 四元数，或 4x4 矩阵）转换为 camera-to-world 的 4x4 刚体变换，
//! 并统一坐标系约定：X 从左到右，Y 从下到上，Z 与观察方向相反。
//! 多数数据集的约定是 Y 从上到下、Z 沿观察方向，因此需要对 Y、Z 基向量取反，
//! 即右乘绕 X 轴 180 度的旋转。

use nalgebra::{Matrix4, Translation3};

use crate::error::DatasetError;
use crate::global_cast::Matrix4d;
use crate::utility::Utility;

/// 原始位姿记录
#[derive(Debug, Clone, PartialEq)]
pub enum RawPose {
    /// tx ty tz qx qy qz qw
    Quaternion([f64; 7]),
    /// camera-to-world 矩阵
    Matrix(Matrix4<f64>),
}

impl RawPose {
    /// 7 个数按平移 + 四元数解析，16 个数按行优先矩阵解析
    pub fn from_values(values: &[f64], origin: &str) -> Result<Self, DatasetError> {
        match values.len() {
            7 => {
                let mut pvec = [0.0; 7];
                pvec.copy_from_slice(values);
                Ok(RawPose::Quaternion(pvec))
            }
            16 => Matrix4d::try_from(values)
                .map(|m| RawPose::Matrix(m.0))
                .map_err(|n| DatasetError::malformed_pose(origin, format!("{} values", n))),
            n => Err(DatasetError::malformed_pose(
                origin,
                format!("expected 7 or 16 values, got {}", n),
            )),
        }
    }

    pub fn to_matrix(&self) -> Result<Matrix4<f64>, DatasetError> {
        match self {
            RawPose::Quaternion(pvec) => pose_matrix_from_quaternion(pvec),
            RawPose::Matrix(m) => Ok(*m),
        }
    }
}

/// (t, q) 转换为 4x4 位姿矩阵，四元数标量在后
pub fn pose_matrix_from_quaternion(pvec: &[f64; 7]) -> Result<Matrix4<f64>, DatasetError> {
    let rotation = Utility::quat_from_xyzw(&[pvec[3], pvec[4], pvec[5], pvec[6]])
        .ok_or_else(|| DatasetError::malformed_pose("quaternion", "zero-norm quaternion"))?;
    let translation = Translation3::new(pvec[0], pvec[1], pvec[2]);
    Ok(nalgebra::Isometry3::from_parts(translation, rotation).to_homogeneous())
}

/// 对旋转块的第 1、2 列（Y、Z）取反，两次调用恢复原矩阵
#[inline]
pub fn flip_yz(pose: &mut Matrix4<f64>) {
    for row in 0..3 {
        pose[(row, 1)] = -pose[(row, 1)];
        pose[(row, 2)] = -pose[(row, 2)];
    }
}

/// 位姿的参考系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoseAnchor {
    /// 保持数据集的世界坐标系
    #[default]
    World,
    /// 以第一帧为参考，第一帧为单位矩阵
    FirstFrame,
}

#[derive(Debug, Default)]
pub struct PoseNormalizer {
    anchor: PoseAnchor,
    /// 第一帧位姿的逆
    inv_pose: Option<Matrix4<f64>>,
}

impl PoseNormalizer {
    pub fn new(anchor: PoseAnchor) -> Self {
        Self {
            anchor,
            inv_pose: None,
        }
    }

    /// 归一化一帧位姿；[PoseAnchor::FirstFrame] 时第一次调用确定参考帧
    ///
    /// 先相对第一帧 `inv(P0) * Pi`，再翻转 Y、Z。参考帧本身输出单位矩阵，不做翻转。
    pub fn normalize(&mut self, raw: &RawPose) -> Result<Matrix4<f64>, DatasetError> {
        let mut c2w = raw.to_matrix()?;
        if self.anchor == PoseAnchor::FirstFrame {
            match self.inv_pose {
                Some(inv_pose) => c2w = inv_pose * c2w,
                None => {
                    let inv_pose = c2w.try_inverse().ok_or_else(|| {
                        DatasetError::malformed_pose("first frame", "pose is not invertible")
                    })?;
                    self.inv_pose = Some(inv_pose);
                    return Ok(Matrix4::identity());
                }
            }
        }
        flip_yz(&mut c2w);
        Ok(c2w)
    }

    pub fn normalize_all(
        anchor: PoseAnchor,
        raws: &[RawPose],
    ) -> Result<Vec<Matrix4<f64>>, DatasetError> {
        let mut normalizer = Self::new(anchor);
        raws.iter().map(|raw| normalizer.normalize(raw)).collect()
    }
}

//! 帧预处理
//!
//! 解码后的彩色图、深度图和掩码 -> 去畸变、归一化、掩码、缩放、裁边后的 (color, depth, mask)。
//! 深度图的分辨率为准，处理后三者的高和宽相同，无效或被掩码的深度为 0。

mod crop;
mod resize;
mod undistort;

pub use crop::{crop_edge_color, crop_edge_map, set_edge_pixels_to_zero};
pub use resize::{resize_color, resize_color_align_corners, resize_nearest};
pub use undistort::undistort_image;

use ndarray::{Array2, Array3};

use crate::camera::{CameraTrait, CameraType, PinholeCamera};
use crate::config::{CameraConfig, MASK_THRESHOLD};
use crate::error::DatasetError;

/// 解码后的原始数据
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// (H, W, 3)，RGB，8 位
    pub color: Array3<u8>,
    /// (H, W)，原始深度单位
    pub depth: Array2<f32>,
    /// (H, W)，灰度掩码；None 表示全部保留
    pub mask: Option<Array2<u8>>,
}

#[derive(Debug, Clone)]
pub struct ProcessedFrame {
    pub color: Array3<f32>,
    pub depth: Array2<f32>,
    pub mask: Array2<u8>,
}

/// 灰度值小于 [MASK_THRESHOLD] 的像素为 1，否则为 0
pub fn threshold_mask(mask: &Array2<u8>) -> Array2<u8> {
    mask.mapv(|v| u8::from(v < MASK_THRESHOLD))
}

#[derive(Debug, Clone)]
pub struct FramePreprocessor {
    pub camera: PinholeCamera,
    pub png_depth_scale: f32,
    /// [height, width]
    pub crop_size: Option<[usize; 2]>,
    pub crop_edge: usize,
}

impl FramePreprocessor {
    pub fn from_config(cam: &CameraConfig) -> Result<Self, DatasetError> {
        Ok(Self {
            camera: PinholeCamera::from_config(cam)?,
            png_depth_scale: cam.png_depth_scale as f32,
            crop_size: cam.crop_size,
            crop_edge: cam.crop_edge,
        })
    }

    pub fn process(&self, raw: RawFrame) -> Result<ProcessedFrame, DatasetError> {
        let RawFrame { color, depth, mask } = raw;
        let (rows, cols) = depth.dim();
        let (color_rows, color_cols, channels) = color.dim();
        if rows == 0 || cols == 0 || color_rows == 0 || color_cols == 0 || channels != 3 {
            return Err(DatasetError::ShapeMismatch(format!(
                "color {:?} and depth {:?} cannot form a frame",
                color.dim(),
                depth.dim()
            )));
        }

        // 只对彩色图去畸变，深度已经是度量值
        let mut color = color.mapv(f32::from);
        if self.camera.get_camera_type() == CameraType::PinholeFull {
            color = undistort_image(&color, &self.camera)?;
        }
        color.mapv_inplace(|v| v / 255.0);

        let mut mask = match mask {
            Some(mask) => threshold_mask(&mask),
            None => Array2::ones((rows, cols)),
        };
        if mask.dim() != (rows, cols) {
            mask = resize_nearest(&mask, rows, cols)?;
        }

        let mut depth = depth;
        let scale = self.png_depth_scale;
        depth.zip_mut_with(&mask, |d, &m| {
            *d = if m == 0 || !d.is_finite() {
                0.0
            } else {
                *d / scale
            };
        });

        if (color_rows, color_cols) != (rows, cols) {
            color = resize_color(&color, rows, cols)?;
        }

        if let Some([crop_rows, crop_cols]) = self.crop_size {
            color = resize_color_align_corners(&color, crop_rows, crop_cols)?;
            depth = resize_nearest(&depth, crop_rows, crop_cols)?;
            mask = resize_nearest(&mask, crop_rows, crop_cols)?;
        }

        let edge = self.crop_edge;
        if edge > 0 {
            color = crop_edge_color(&color, edge)?;
            depth = crop_edge_map(&depth, edge)?;
            mask = crop_edge_map(&mask, edge)?;
        }

        let (color_rows, color_cols, _) = color.dim();
        if (color_rows, color_cols) != depth.dim() || depth.dim() != mask.dim() {
            return Err(DatasetError::ShapeMismatch(format!(
                "color {:?}, depth {:?}, mask {:?}",
                color.dim(),
                depth.dim(),
                mask.dim()
            )));
        }

        Ok(ProcessedFrame { color, depth, mask })
    }
}

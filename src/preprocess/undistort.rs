use image::imageops;
use nalgebra::Point2;
use ndarray::Array3;

use crate::camera::CameraTrait;
use crate::error::DatasetError;
use crate::global_cast::{layout_error, rgb32f_from_array};

/// 图像范围内的采样坐标；反投影再投影的舍入误差不超过 1e-6，收回到边界上
fn snap(x: f64, max: f64) -> Option<f32> {
    const EPS: f64 = 1e-6;
    (-EPS..=max + EPS)
        .contains(&x)
        .then(|| x.clamp(0.0, max) as f32)
}

/// 去畸变，新内参与原内参相同
///
/// 对输出图像的每个像素，先反投影到归一化平面，再经畸变模型投影回原图，
/// 在原图上双线性采样。映射到图像外的像素为 0。
pub fn undistort_image<Camera: CameraTrait>(
    src: &Array3<f32>,
    camera: &Camera,
) -> Result<Array3<f32>, DatasetError> {
    let (rows, cols, _) = src.dim();
    let img = rgb32f_from_array(src)?;
    let max_x = cols.saturating_sub(1) as f64;
    let max_y = rows.saturating_sub(1) as f64;

    let mut data = Vec::with_capacity(rows * cols * 3);
    for v in 0..rows {
        for u in 0..cols {
            let p3d = camera.lift_projective(&Point2::new(u as f64, v as f64));
            let distorted = camera.project_distorted(&p3d);
            let pixel = match (snap(distorted.x, max_x), snap(distorted.y, max_y)) {
                (Some(x), Some(y)) => {
                    imageops::interpolate_bilinear(&img, x, y).map_or([0.0; 3], |p| p.0)
                }
                _ => [0.0; 3],
            };
            data.extend_from_slice(&pixel);
        }
    }
    Array3::from_shape_vec((rows, cols, 3), data).map_err(layout_error)
}

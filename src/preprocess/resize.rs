use image::imageops::{self, FilterType};
use image::Primitive;
use ndarray::{Array1, Array2, Array3};

use crate::error::DatasetError;
use crate::global_cast::{array_from_rgb32f, layout_error, luma_from_array, rgb32f_from_array};

fn outside(x: f32, y: f32) -> DatasetError {
    DatasetError::ShapeMismatch(format!("sample ({}, {}) outside the source image", x, y))
}

/// Resize a normalized color image with a triangle filter.
///
/// The filter is bilinear with pixel-center alignment when upsampling and
/// smooths when downsampling.
///
/// # Arguments
///
/// * `color` - The input image with shape (height, width, 3), values in [0, 1].
/// * `height` - The output height.
/// * `width` - The output width.
pub fn resize_color(
    color: &Array3<f32>,
    height: usize,
    width: usize,
) -> Result<Array3<f32>, DatasetError> {
    let (rows, cols, _) = color.dim();
    if (rows, cols) == (height, width) {
        return Ok(color.clone());
    }
    let img = rgb32f_from_array(color)?;
    // imageops 把浮点像素截断到 [0, 1]，颜色此时已经归一化
    array_from_rgb32f(imageops::resize(
        &img,
        width as u32,
        height as u32,
        FilterType::Triangle,
    ))
}

/// Resize a color image with bilinear interpolation, aligning the corner samples
/// of input and output.
///
/// # Arguments
///
/// * `color` - The input image with shape (height, width, 3).
/// * `height` - The output height.
/// * `width` - The output width.
pub fn resize_color_align_corners(
    color: &Array3<f32>,
    height: usize,
    width: usize,
) -> Result<Array3<f32>, DatasetError> {
    let img = rgb32f_from_array(color)?;
    let (src_width, src_height) = img.dimensions();
    let xs = corner_aligned(src_width, width);
    let ys = corner_aligned(src_height, height);

    let mut data = Vec::with_capacity(height * width * 3);
    for &y in ys.iter() {
        for &x in xs.iter() {
            let pixel = imageops::interpolate_bilinear(&img, x, y).ok_or_else(|| outside(x, y))?;
            data.extend_from_slice(&pixel.0);
        }
    }
    Array3::from_shape_vec((height, width, 3), data).map_err(layout_error)
}

/// Resize a single-channel map with nearest neighbor sampling.
///
/// Values are copied, never blended, so it is safe for categorical masks and depth maps.
/// `imageops::resize` would clamp float depth to [0, 1], so every output pixel is
/// looked up with `interpolate_nearest` instead.
pub fn resize_nearest<T: Primitive>(
    map: &Array2<T>,
    height: usize,
    width: usize,
) -> Result<Array2<T>, DatasetError> {
    let (rows, cols) = map.dim();
    if (rows, cols) == (height, width) {
        return Ok(map.clone());
    }
    let img = luma_from_array(map)?;
    let xs = center_aligned(cols, width);
    let ys = center_aligned(rows, height);

    let mut data = Vec::with_capacity(height * width);
    for &y in ys.iter() {
        for &x in xs.iter() {
            let pixel = imageops::interpolate_nearest(&img, x, y).ok_or_else(|| outside(x, y))?;
            data.push(pixel.0[0]);
        }
    }
    Array2::from_shape_vec((height, width), data).map_err(layout_error)
}

/// 角点对齐的采样坐标 `i * (src - 1) / (dst - 1)`
fn corner_aligned(src_len: u32, dst_len: usize) -> Array1<f32> {
    let last = src_len.saturating_sub(1) as f32;
    Array1::linspace(0.0, last, dst_len).mapv(|x| x.min(last))
}

/// 像素中心对齐的采样坐标 `(i + 0.5) * src / dst - 0.5`
fn center_aligned(src_len: usize, dst_len: usize) -> Array1<f32> {
    let last = src_len.saturating_sub(1) as f32;
    let ratio = src_len as f32 / dst_len as f32;
    Array1::from_shape_fn(dst_len, |i| ((i as f32 + 0.5) * ratio - 0.5).clamp(0.0, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn nearest_downsample_picks_samples() {
        let src = array![[0u8, 1, 2, 3], [4, 5, 6, 7], [8, 9, 10, 11], [12, 13, 14, 15]];
        let dst = resize_nearest(&src, 2, 2).unwrap();
        // 采样坐标 0.5、2.5 向上取整
        assert_eq!(dst, array![[5u8, 7], [13, 15]]);
    }

    #[test]
    fn nearest_keeps_metric_depth() {
        let src = array![[0.0f32, 10.0], [20.0, 30.0]];
        let dst = resize_nearest(&src, 4, 4).unwrap();
        assert_eq!(dst.dim(), (4, 4));
        for v in dst.iter() {
            assert!([0.0, 10.0, 20.0, 30.0].contains(v));
        }
        assert_eq!(dst[[0, 0]], 0.0);
        assert_eq!(dst[[3, 3]], 30.0);
    }

    #[test]
    fn bilinear_align_corners_keeps_corners() {
        let src = Array3::from_shape_vec(
            (2, 2, 3),
            vec![0.0f32, 0.0, 0.0, 0.2, 0.2, 0.2, 0.4, 0.4, 0.4, 0.6, 0.6, 0.6],
        )
        .unwrap();
        let dst = resize_color_align_corners(&src, 3, 3).unwrap();
        assert_eq!(dst.dim(), (3, 3, 3));
        assert_relative_eq!(dst[[0, 0, 0]], 0.0);
        assert_relative_eq!(dst[[0, 2, 1]], 0.2);
        assert_relative_eq!(dst[[2, 0, 2]], 0.4);
        assert_relative_eq!(dst[[2, 2, 0]], 0.6);
        assert_relative_eq!(dst[[1, 1, 0]], 0.3, epsilon = 1e-6);
    }

    #[test]
    fn triangle_upsample_is_bilinear() {
        let src = Array3::from_shape_vec((1, 2, 3), vec![0.0f32, 0.0, 0.0, 0.8, 0.8, 0.8]).unwrap();
        let dst = resize_color(&src, 1, 4).unwrap();
        assert_eq!(dst.dim(), (1, 4, 3));
        // 输出像素中心 -0.25、0.25、0.75、1.25
        assert_relative_eq!(dst[[0, 0, 0]], 0.0, epsilon = 1e-6);
        assert_relative_eq!(dst[[0, 1, 0]], 0.2, epsilon = 1e-6);
        assert_relative_eq!(dst[[0, 2, 0]], 0.6, epsilon = 1e-6);
        assert_relative_eq!(dst[[0, 3, 0]], 0.8, epsilon = 1e-6);
    }

    #[test]
    fn constant_image_stays_constant() {
        let src = Array3::from_elem((5, 7, 3), 0.25f32);
        for dst in [
            resize_color(&src, 3, 11).unwrap(),
            resize_color_align_corners(&src, 3, 11).unwrap(),
        ] {
            assert_eq!(dst.dim(), (3, 11, 3));
            for v in dst.iter() {
                assert_relative_eq!(*v, 0.25, epsilon = 1e-6);
            }
        }
    }
}

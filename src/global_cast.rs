//! 全局类型转换
//!
//! 用于将解码后的图像和文本数值转换为 [ndarray] 与 [nalgebra] 类型，
//! 以及把 [ndarray] 数组交回 [image] 做重采样

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Primitive, Rgb32FImage, RgbImage};
use nalgebra::Matrix4;
use ndarray::{Array2, Array3, ShapeError};

use crate::error::DatasetError;

pub(crate) fn layout_error(e: ShapeError) -> DatasetError {
    DatasetError::ShapeMismatch(format!("image buffer layout: {}", e))
}

/// 彩色图像 (H, W, 3)，RGB 通道顺序，原始 8 位数值
#[derive(Debug, Clone, Default)]
pub struct ColorArray(pub Array3<u8>);

/// 将 [RgbImage] 转换为 [ColorArray]
impl TryFrom<RgbImage> for ColorArray {
    type Error = DatasetError;

    fn try_from(img: RgbImage) -> Result<Self, Self::Error> {
        let (width, height) = img.dimensions();
        // RgbImage 行优先存储，与 (H, W, 3) 一致
        Array3::from_shape_vec((height as usize, width as usize, 3), img.into_raw())
            .map(ColorArray)
            .map_err(layout_error)
    }
}

/// 灰度掩码 (H, W)
#[derive(Debug, Clone, Default)]
pub struct MaskArray(pub Array2<u8>);

impl TryFrom<GrayImage> for MaskArray {
    type Error = DatasetError;

    fn try_from(img: GrayImage) -> Result<Self, Self::Error> {
        let (width, height) = img.dimensions();
        Array2::from_shape_vec((height as usize, width as usize), img.into_raw())
            .map(MaskArray)
            .map_err(layout_error)
    }
}

/// 深度图 (H, W)，原始单位，未除以尺度
#[derive(Debug, Clone, Default)]
pub struct DepthArray(pub Array2<f32>);

/// 保留原始数值：8 位与 16 位按整数读取，浮点图像取第一个通道
impl TryFrom<DynamicImage> for DepthArray {
    type Error = DatasetError;

    fn try_from(img: DynamicImage) -> Result<Self, Self::Error> {
        let (width, height) = (img.width() as usize, img.height() as usize);
        let data: Vec<f32> = match img {
            DynamicImage::ImageLuma8(buf) => buf.into_raw().into_iter().map(f32::from).collect(),
            DynamicImage::ImageLuma16(buf) => buf.into_raw().into_iter().map(f32::from).collect(),
            DynamicImage::ImageRgb32F(buf) => buf.into_raw().into_iter().step_by(3).collect(),
            DynamicImage::ImageRgba32F(buf) => buf.into_raw().into_iter().step_by(4).collect(),
            other => other
                .into_luma16()
                .into_raw()
                .into_iter()
                .map(f32::from)
                .collect(),
        };
        Array2::from_shape_vec((height, width), data)
            .map(DepthArray)
            .map_err(layout_error)
    }
}

/// (H, W, 3) 浮点彩色图转换为 [Rgb32FImage]
pub fn rgb32f_from_array(color: &Array3<f32>) -> Result<Rgb32FImage, DatasetError> {
    let (rows, cols, channels) = color.dim();
    if channels != 3 {
        return Err(DatasetError::ShapeMismatch(format!(
            "expected 3 color channels, got {}",
            channels
        )));
    }
    // iter() 按逻辑顺序遍历，与内存布局无关
    ImageBuffer::from_raw(cols as u32, rows as u32, color.iter().copied().collect()).ok_or_else(
        || DatasetError::ShapeMismatch(format!("color {:?} does not fit an RGB buffer", color.dim())),
    )
}

pub fn array_from_rgb32f(img: Rgb32FImage) -> Result<Array3<f32>, DatasetError> {
    let (width, height) = img.dimensions();
    Array3::from_shape_vec((height as usize, width as usize, 3), img.into_raw()).map_err(layout_error)
}

/// 单通道数组转换为 [Luma] 图像，掩码和深度共用
pub fn luma_from_array<T: Primitive>(
    map: &Array2<T>,
) -> Result<ImageBuffer<Luma<T>, Vec<T>>, DatasetError> {
    let (rows, cols) = map.dim();
    ImageBuffer::from_raw(cols as u32, rows as u32, map.iter().copied().collect()).ok_or_else(
        || DatasetError::ShapeMismatch(format!("map {:?} does not fit a Luma buffer", map.dim())),
    )
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix4d(pub Matrix4<f64>);

/// 行优先的 16 个数转换为 [Matrix4]
impl TryFrom<&[f64]> for Matrix4d {
    type Error = usize;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        if values.len() != 16 {
            return Err(values.len());
        }
        Ok(Matrix4d(Matrix4::from_row_slice(values)))
    }
}

/// [Matrix4] 转换为行优先的二维数组，用于序列化
impl From<Matrix4d> for [[f64; 4]; 4] {
    fn from(matrix: Matrix4d) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = matrix.0[(i, j)];
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_array() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgb([10, 20, 30]));
        let ColorArray(array) = img.try_into().unwrap();
        assert_eq!(array.dim(), (2, 3, 3));
        assert_eq!(array[[1, 2, 0]], 10);
        assert_eq!(array[[1, 2, 1]], 20);
        assert_eq!(array[[1, 2, 2]], 30);
        assert_eq!(array[[0, 0, 0]], 0);
    }

    #[test]
    fn test_depth_keeps_raw_values() {
        let mut img = image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::new(2, 2);
        img.put_pixel(1, 0, image::Luma([5000]));
        let DepthArray(depth) = DynamicImage::ImageLuma16(img).try_into().unwrap();
        assert_eq!(depth.dim(), (2, 2));
        assert_eq!(depth[[0, 1]], 5000.0);

        let gray = GrayImage::from_pixel(2, 1, image::Luma([7]));
        let DepthArray(depth) = DynamicImage::ImageLuma8(gray).try_into().unwrap();
        assert_eq!(depth[[0, 1]], 7.0);
    }

    #[test]
    fn test_float_color_round_trip_keeps_layout() {
        let color = Array3::from_shape_fn((2, 3, 3), |(v, u, c)| (v * 9 + u * 3 + c) as f32);
        let img = rgb32f_from_array(&color).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1).0, [15.0, 16.0, 17.0]);
        assert_eq!(array_from_rgb32f(img).unwrap(), color);

        // 非标准布局（转置视图）也按逻辑顺序转换
        let map = ndarray::array![[1.0f32, 2.0], [3.0, 4.0]].reversed_axes();
        let luma = luma_from_array(&map).unwrap();
        assert_eq!(luma.get_pixel(1, 0).0, [3.0]);

        assert!(matches!(
            rgb32f_from_array(&Array3::zeros((2, 2, 1))),
            Err(DatasetError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_matrix_from_rows() {
        let values: Vec<f64> = (0..16).map(|v| v as f64).collect();
        let matrix = Matrix4d::try_from(values.as_slice()).unwrap();
        assert_eq!(matrix.0[(0, 3)], 3.0);
        assert_eq!(matrix.0[(3, 0)], 12.0);
        let rows: [[f64; 4]; 4] = matrix.into();
        assert_eq!(rows[1], [4.0, 5.0, 6.0, 7.0]);

        assert_eq!(Matrix4d::try_from(&values[..7]), Err(7));
    }
}

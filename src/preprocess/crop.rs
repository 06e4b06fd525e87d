use ndarray::{s, Array2, Array3};

use crate::error::DatasetError;

fn check_edge(rows: usize, cols: usize, edge: usize) -> Result<(), DatasetError> {
    if 2 * edge >= rows || 2 * edge >= cols {
        return Err(DatasetError::ShapeMismatch(format!(
            "edge crop {} leaves nothing of a {}x{} frame",
            edge, rows, cols
        )));
    }
    Ok(())
}

/// 四边各裁掉 `edge` 个像素
pub fn crop_edge_color(src: &Array3<f32>, edge: usize) -> Result<Array3<f32>, DatasetError> {
    let (rows, cols, _) = src.dim();
    check_edge(rows, cols, edge)?;
    Ok(src
        .slice(s![edge..rows - edge, edge..cols - edge, ..])
        .to_owned())
}

pub fn crop_edge_map<T: Clone>(src: &Array2<T>, edge: usize) -> Result<Array2<T>, DatasetError> {
    let (rows, cols) = src.dim();
    check_edge(rows, cols, edge)?;
    Ok(src.slice(s![edge..rows - edge, edge..cols - edge]).to_owned())
}

/// 四边 `edge` 宽的边框置 0，尺寸不变
pub fn set_edge_pixels_to_zero(depth: &mut Array2<f32>, edge: usize) {
    if edge == 0 {
        return;
    }
    let (rows, cols) = depth.dim();
    let edge_rows = edge.min(rows);
    let edge_cols = edge.min(cols);
    depth.slice_mut(s![..edge_rows, ..]).fill(0.0);
    depth.slice_mut(s![rows - edge_rows.., ..]).fill(0.0);
    depth.slice_mut(s![.., ..edge_cols]).fill(0.0);
    depth.slice_mut(s![.., cols - edge_cols..]).fill(0.0);
}

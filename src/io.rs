//! 读取
//!
//! 图像解码（彩色、深度、掩码）以及空格分隔的索引文件、位姿文件解析。

use std::path::{Path, PathBuf};

use ndarray::{Array2, Array3};

use crate::error::DatasetError;
use crate::global_cast::{ColorArray, DepthArray, MaskArray};
use crate::global_types::StreamRecord;

fn open_image(path: &Path) -> Result<image::DynamicImage, DatasetError> {
    image::open(path).map_err(|source| DatasetError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// 彩色图，RGB 顺序
pub fn read_color(path: &Path) -> Result<Array3<u8>, DatasetError> {
    let ColorArray(color) = open_image(path)?.into_rgb8().try_into()?;
    Ok(color)
}

/// 深度图，保持原始数值；EXR 取第一个通道
pub fn read_depth(path: &Path) -> Result<Array2<f32>, DatasetError> {
    let DepthArray(depth) = open_image(path)?.try_into()?;
    Ok(depth)
}

/// 掩码按灰度读取
pub fn read_mask(path: &Path) -> Result<Array2<u8>, DatasetError> {
    let MaskArray(mask) = open_image(path)?.into_luma8().try_into()?;
    Ok(mask)
}

/// 读取空格分隔的文本，跳过前 `skip_rows` 行以及 `#` 开头的注释行。
/// 返回每一行的字段和对应的行号（从 1 开始）。
pub fn read_rows(path: &Path, skip_rows: usize) -> Result<Vec<(usize, Vec<String>)>, DatasetError> {
    if !path.is_file() {
        return Err(DatasetError::MissingStreamFile(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    // 表头按物理行跳过，注释行也计入
    let start = match skip_rows {
        0 => 0,
        n => content
            .match_indices('\n')
            .nth(n - 1)
            .map_or(content.len(), |(i, _)| i + 1),
    };
    let body = content[start..].as_bytes();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b' ')
        .comment(Some(b'#'))
        .quoting(false)
        .flexible(true)
        .from_reader(body);
    let mut record = csv::StringRecord::new();
    let mut rows = Vec::new();
    while reader.read_record(&mut record)? {
        // 记录自身的位置可能停在前面的注释行上，用读完后的位置推算行号
        let end = reader.position();
        let terminated = body
            .get(..end.byte() as usize)
            .map_or(false, |read| read.ends_with(b"\n"));
        let line = skip_rows + end.line() as usize - usize::from(terminated);
        // 连续空格会产生空字段
        let fields: Vec<String> = record
            .iter()
            .filter(|field| !field.is_empty())
            .map(str::to_string)
            .collect();
        if !fields.is_empty() {
            rows.push((line, fields));
        }
    }
    Ok(rows)
}

/// 每行解析为浮点数
pub fn read_float_rows(path: &Path, skip_rows: usize) -> Result<Vec<Vec<f64>>, DatasetError> {
    read_rows(path, skip_rows)?
        .into_iter()
        .map(|(line, fields)| {
            fields
                .iter()
                .map(|field| {
                    field
                        .parse::<f64>()
                        .map_err(|e| DatasetError::MalformedStreamRecord {
                            path: path.to_path_buf(),
                            line,
                            reason: format!("{:?}: {}", field, e),
                        })
                })
                .collect()
        })
        .collect()
}

/// `<timestamp> <relative-path>` 格式的索引文件，路径相对于 `base`
pub fn read_stream_list(path: &Path, base: &Path) -> Result<Vec<StreamRecord>, DatasetError> {
    read_rows(path, 0)?
        .into_iter()
        .map(|(line, fields)| {
            let malformed = |reason: String| DatasetError::MalformedStreamRecord {
                path: path.to_path_buf(),
                line,
                reason,
            };
            if fields.len() < 2 {
                return Err(malformed(format!("expected 2 fields, got {}", fields.len())));
            }
            let timestamp = fields[0]
                .parse::<f64>()
                .map_err(|e| malformed(format!("{:?}: {}", fields[0], e)))?;
            Ok(StreamRecord {
                timestamp,
                path: base.join(PathBuf::from(&fields[1])),
            })
        })
        .collect()
}

use std::path::PathBuf;

/// 时间戳，单位秒
pub type Timestamp = f64;

/// 索引文件中的一行：时间戳和相对路径
#[derive(Debug, Clone, PartialEq)]
pub struct StreamRecord {
    pub timestamp: Timestamp,
    pub path: PathBuf,
}

impl StreamRecord {
    pub fn timestamps(records: &[StreamRecord]) -> Vec<Timestamp> {
        records.iter().map(|r| r.timestamp).collect()
    }
}

/// 同一物理时刻的各流下标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Association {
    pub image: usize,
    pub depth: usize,
    pub pose: Option<usize>,
}

/// 对外输出的一帧
#[derive(Debug, Clone)]
pub struct Frame {
    pub index: usize,
    /// (H, W, 3)，RGB，取值 [0, 1]
    pub color: ndarray::Array3<f32>,
    /// (H, W)，米；无效或被掩码的像素为 0
    pub depth: ndarray::Array2<f32>,
    /// camera-to-world
    pub pose: nalgebra::Matrix4<f64>,
    /// (H, W)，1 保留，0 丢弃
    pub mask: ndarray::Array2<u8>,
}

impl Frame {
    pub fn height(&self) -> usize {
        self.depth.nrows()
    }

    pub fn width(&self) -> usize {
        self.depth.ncols()
    }
}

#[test]
fn test_stream_timestamps() {
    let records = vec![
        StreamRecord {
            timestamp: 1.5,
            path: PathBuf::from("rgb/1.5.png"),
        },
        StreamRecord {
            timestamp: 1.6,
            path: PathBuf::from("rgb/1.6.png"),
        },
    ];
    assert_eq!(StreamRecord::timestamps(&records), vec![1.5, 1.6]);
}

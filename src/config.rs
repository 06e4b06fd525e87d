//! 配置
//!
//! 数据集与相机的配置记录，以及流水线使用的常量。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// 时间戳关联的容差窗口（秒）
pub const MAX_DT: f64 = 0.08;
/// TUM RGB-D 子采样的目标帧率
pub const TUM_FRAME_RATE: f64 = 32.0;
/// 掩码阈值：小于该值的像素保留
pub const MASK_THRESHOLD: u8 = 128;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct CameraConfig {
    // size
    pub H: usize,
    pub W: usize,
    // intrinsic
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
    /// k1 k2 p1 p2 [k3]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distortion: Option<Vec<f64>>,
    /// [height, width]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_size: Option<[usize; 2]>,
    #[serde(default)]
    pub crop_edge: usize,
    /// raw depth units per metre
    pub png_depth_scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    pub input_folder: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// replica / scannet / tumrgbd
    pub dataset: String,
    pub cam: CameraConfig,
    pub data: DataConfig,
}

impl DatasetConfig {
    pub fn read_from_json(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DatasetError::MissingStreamFile(path.to_path_buf()));
        }
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.cam.validate()?;
        Ok(config)
    }

    pub fn write_to_json(&self, path: impl AsRef<Path>) -> Result<(), DatasetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.png_depth_scale <= 0.0 || !self.png_depth_scale.is_finite() {
            return Err(DatasetError::InvalidConfig(format!(
                "png_depth_scale must be positive, got {}",
                self.png_depth_scale
            )));
        }
        if self.fx == 0.0 || self.fy == 0.0 {
            return Err(DatasetError::InvalidConfig(
                "focal lengths must be non-zero".to_string(),
            ));
        }
        if let Some(distortion) = &self.distortion {
            if !(distortion.len() == 4 || distortion.len() == 5) {
                return Err(DatasetError::InvalidConfig(format!(
                    "distortion expects 4 or 5 coefficients, got {}",
                    distortion.len()
                )));
            }
        }
        if let Some([h, w]) = self.crop_size {
            if h == 0 || w == 0 {
                return Err(DatasetError::InvalidConfig(format!(
                    "crop_size must be non-empty, got [{}, {}]",
                    h, w
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn tum_config(input_folder: &Path) -> DatasetConfig {
        DatasetConfig {
            dataset: "tumrgbd".to_string(),
            cam: CameraConfig {
                H: 4,
                W: 6,
                fx: 5.0,
                fy: 5.0,
                cx: 3.0,
                cy: 2.0,
                distortion: None,
                crop_size: None,
                crop_edge: 0,
                png_depth_scale: 5000.0,
            },
            data: DataConfig {
                input_folder: input_folder.to_path_buf(),
            },
        }
    }

    #[test]
    fn write_then_read_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tum.json");
        let mut config = tum_config(dir.path());
        config.cam.distortion = Some(vec![0.1, -0.05, 0.0, 0.0, 0.01]);
        config.cam.crop_size = Some([2, 4]);
        config.write_to_json(&path).unwrap();

        let read = DatasetConfig::read_from_json(&path).unwrap();
        assert_eq!(read, config);
    }

    #[test]
    fn optional_fields_default() {
        let json = r#"{
            "dataset": "replica",
            "cam": {"H": 680, "W": 1200, "fx": 600.0, "fy": 600.0,
                    "cx": 599.5, "cy": 339.5, "png_depth_scale": 6553.5},
            "data": {"input_folder": "Datasets/Replica/room0"}
        }"#;
        let config: DatasetConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.cam.crop_edge, 0);
        assert!(config.cam.distortion.is_none());
        assert!(config.cam.crop_size.is_none());
        config.cam.validate().unwrap();
    }

    #[test]
    fn rejects_bad_distortion_length() {
        let mut config = tum_config(Path::new("."));
        config.cam.distortion = Some(vec![0.1, 0.2, 0.3]);
        assert!(matches!(
            config.cam.validate(),
            Err(DatasetError::InvalidConfig(_))
        ));
    }

    #[test]
    fn missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DatasetConfig::read_from_json(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, DatasetError::MissingStreamFile(_)));
    }
}

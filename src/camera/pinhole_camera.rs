use nalgebra::{Point2, Vector3};

use super::{CameraTrait, CameraType};
use crate::config::CameraConfig;
use crate::error::DatasetError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinholeParameters {
    // size
    pub image_width: usize,
    pub image_height: usize,
    // intrinsic
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
    // distortion
    pub k1: f64,
    pub k2: f64,
    pub p1: f64,
    pub p2: f64,
    pub k3: f64,
}

impl PinholeParameters {
    pub fn from_config(cam: &CameraConfig) -> Result<Self, DatasetError> {
        cam.validate()?;
        let mut parameters = Self {
            image_width: cam.W,
            image_height: cam.H,
            fx: cam.fx,
            fy: cam.fy,
            cx: cam.cx,
            cy: cam.cy,
            ..Default::default()
        };
        if let Some(d) = &cam.distortion {
            // OpenCV 顺序: k1 k2 p1 p2 [k3]
            parameters.k1 = d[0];
            parameters.k2 = d[1];
            parameters.p1 = d[2];
            parameters.p2 = d[3];
            parameters.k3 = d.get(4).copied().unwrap_or(0.0);
        }
        Ok(parameters)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PinholeCamera {
    pub parameters: PinholeParameters,
    pub has_distortion: bool,
}

impl PinholeCamera {
    pub fn new(parameters: PinholeParameters) -> Self {
        let has_distortion = [
            parameters.k1,
            parameters.k2,
            parameters.p1,
            parameters.p2,
            parameters.k3,
        ]
        .iter()
        .any(|k| *k != 0.0);
        Self {
            parameters,
            has_distortion,
        }
    }

    pub fn from_config(cam: &CameraConfig) -> Result<Self, DatasetError> {
        let mut camera = Self::new(PinholeParameters::from_config(cam)?);
        // 配置了畸变向量时始终执行去畸变
        camera.has_distortion |= cam.distortion.is_some();
        Ok(camera)
    }

    /// 归一化平面上的畸变模型
    fn distortion(&self, x: f64, y: f64) -> (f64, f64) {
        let PinholeParameters {
            k1, k2, p1, p2, k3, ..
        } = self.parameters;
        let r2 = x * x + y * y;
        let radial = 1.0 + k1 * r2 + k2 * r2 * r2 + k3 * r2 * r2 * r2;
        let xd = x * radial + 2.0 * p1 * x * y + p2 * (r2 + 2.0 * x * x);
        let yd = y * radial + p1 * (r2 + 2.0 * y * y) + 2.0 * p2 * x * y;
        (xd, yd)
    }
}

impl CameraTrait for PinholeCamera {
    fn lift_projective(&self, p: &Point2<f64>) -> Vector3<f64> {
        let x = (p.x - self.parameters.cx) / self.parameters.fx;
        let y = (p.y - self.parameters.cy) / self.parameters.fy;
        Vector3::new(x, y, 1.0)
    }

    fn project_distorted(&self, p3d: &Vector3<f64>) -> Point2<f64> {
        let (x, y) = (p3d.x / p3d.z, p3d.y / p3d.z);
        let (xd, yd) = if self.has_distortion {
            self.distortion(x, y)
        } else {
            (x, y)
        };
        Point2::new(
            self.parameters.fx * xd + self.parameters.cx,
            self.parameters.fy * yd + self.parameters.cy,
        )
    }

    fn get_camera_type(&self) -> CameraType {
        if self.has_distortion {
            CameraType::PinholeFull
        } else {
            CameraType::Pinhole
        }
    }
}

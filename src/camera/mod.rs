mod pinhole_camera;
pub use pinhole_camera::{PinholeCamera, PinholeParameters};

use nalgebra::{Point2, Vector3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraType {
    /// - 最简单的相机模型，不考虑镜头畸变。
    Pinhole,
    /// - Pinhole 模型的扩展，包括径向畸变和切向畸变。
    PinholeFull,
}

/// 相机的trait
pub trait CameraTrait {
    /// 像素坐标反投影到归一化平面（z = 1），不考虑畸变
    fn lift_projective(&self, p: &Point2<f64>) -> Vector3<f64>;
    /// 归一化平面上的点投影到像素坐标，包含畸变
    fn project_distorted(&self, p3d: &Vector3<f64>) -> Point2<f64>;
    fn get_camera_type(&self) -> CameraType;
}

use crate::global_types::Timestamp;

pub struct Utility {}

impl Utility {
    /// argmin |list - t|，相等时取最小下标；空列表返回 None
    #[inline]
    pub fn nearest_index(list: &[Timestamp], t: Timestamp) -> Option<usize> {
        let mut min_idx = None;
        let mut min_delta = f64::INFINITY;
        for (idx, ts) in list.iter().enumerate() {
            let delta = (ts - t).abs();
            if delta < min_delta {
                min_delta = delta;
                min_idx = Some(idx);
            }
        }
        min_idx
    }

    /// 标量在后的四元数 (x, y, z, w)
    #[inline]
    pub fn quat_from_xyzw(q: &[f64; 4]) -> Option<nalgebra::UnitQuaternion<f64>> {
        let q = nalgebra::Quaternion::new(q[3], q[0], q[1], q[2]);
        if q.norm() <= f64::EPSILON || !q.norm().is_finite() {
            return None;
        }
        Some(nalgebra::UnitQuaternion::from_quaternion(q))
    }
}

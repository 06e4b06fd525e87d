//! RGB-D 数据集读取
//!
//! 将异步采样的彩色图、深度图、掩码和相机位姿整理为按帧下标访问的
//! (color, depth, pose, mask) 序列。
//!
//! nalgebra
//! https://docs.rs/nalgebra/latest/nalgebra/
//!
//! ndarray
//! https://docs.rs/ndarray/latest/ndarray/all.html

pub mod camera;
pub mod config;
pub mod dataset;
pub mod error;
pub mod global_cast;
pub mod global_types;
pub mod io;
pub mod pose;
pub mod preprocess;
pub mod save;
pub mod sync;
pub mod utility;

pub use config::DatasetConfig;
pub use dataset::Dataset;
pub use error::DatasetError;
pub use global_types::Frame;

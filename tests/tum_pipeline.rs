use std::path::Path;

use approx::assert_relative_eq;
use nalgebra::{Matrix4, UnitQuaternion, Vector3};

use rgbd_dataset::config::{CameraConfig, DataConfig};
use rgbd_dataset::save::TrajectorySave;
use rgbd_dataset::{Dataset, DatasetConfig, DatasetError};

const IMAGE_TS: [f64; 5] = [0.0, 0.1, 0.2, 0.3, 1.0];
const DEPTH_TS: [f64; 4] = [0.01, 0.09, 0.25, 0.31];
const POSE_TS: [f64; 4] = [0.0, 0.1, 0.2, 0.3];

fn config(input_folder: &Path) -> DatasetConfig {
    DatasetConfig {
        dataset: "tumrgbd".to_string(),
        cam: CameraConfig {
            H: 8,
            W: 10,
            fx: 10.0,
            fy: 10.0,
            cx: 5.0,
            cy: 4.0,
            distortion: None,
            crop_size: None,
            crop_edge: 1,
            png_depth_scale: 5000.0,
        },
        data: DataConfig {
            input_folder: input_folder.to_path_buf(),
        },
    }
}

fn write_list(dir: &Path, name: &str, folder: &str, timestamps: &[f64], ext: &str) {
    let mut content = format!("# {}\n# timestamp filename\n", name);
    for t in timestamps {
        content.push_str(&format!("{:.6} {}/{:.6}.{}\n", t, folder, t, ext));
    }
    std::fs::write(dir.join(name), content).unwrap();
}

fn write_tum(dir: &Path, with_masks: bool) {
    for folder in ["rgb", "depth", "mask"] {
        std::fs::create_dir_all(dir.join(folder)).unwrap();
    }
    write_list(dir, "rgb.txt", "rgb", &IMAGE_TS, "png");
    write_list(dir, "depth.txt", "depth", &DEPTH_TS, "png");
    for t in IMAGE_TS {
        image::RgbImage::from_pixel(10, 8, image::Rgb([255, 128, 0]))
            .save(dir.join(format!("rgb/{:.6}.png", t)))
            .unwrap();
    }
    for t in DEPTH_TS {
        image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_pixel(8, 4, image::Luma([10000]))
            .save(dir.join(format!("depth/{:.6}.png", t)))
            .unwrap();
    }
    if with_masks {
        write_list(dir, "mask.txt", "mask", &IMAGE_TS, "png");
        for t in IMAGE_TS {
            // 左半边丢弃
            let mask = image::GrayImage::from_fn(10, 8, |x, _| {
                if x < 5 {
                    image::Luma([255])
                } else {
                    image::Luma([0])
                }
            });
            mask.save(dir.join(format!("mask/{:.6}.png", t))).unwrap();
        }
    }

    let mut poses = String::from("# ground truth trajectory\n");
    for (i, t) in POSE_TS.iter().enumerate() {
        let q = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.1 * i as f64);
        poses.push_str(&format!(
            "{:.6} {} 0 1 {} {} {} {}\n",
            t, i as f64 * 0.5, q.i, q.j, q.k, q.w
        ));
    }
    std::fs::write(dir.join("groundtruth.txt"), poses).unwrap();
}

#[test]
fn tum_dataset_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_tum(dir.path(), true);
    let dataset = Dataset::new(&config(dir.path())).unwrap();

    // 1.0 没有深度匹配
    assert_eq!(dataset.len(), 4);
    let stats = dataset.stats().unwrap();
    assert_eq!(stats.anchors, 5);
    assert_eq!(stats.associated, 4);
    assert_eq!(stats.retained, 4);
    assert_eq!(stats.dropped_unmatched(), 1);

    assert_eq!(dataset.poses()[0], Matrix4::identity());
    assert_relative_eq!(dataset.poses()[1][(0, 3)], 0.5, epsilon = 1e-9);
    // 相对位姿绕 Z 轴 0.1，翻转只作用在 Y、Z 列上
    assert_relative_eq!(dataset.poses()[1][(0, 0)], 0.1f64.cos(), epsilon = 1e-9);
    assert_relative_eq!(dataset.poses()[1][(1, 1)], -0.1f64.cos(), epsilon = 1e-9);
    assert_relative_eq!(dataset.poses()[1][(2, 3)], 0.0, epsilon = 1e-9);

    let frame = dataset.get(0).unwrap();
    // 深度分辨率 4x8，裁边 1
    assert_eq!(frame.depth.dim(), (2, 6));
    assert_eq!(frame.color.dim(), (2, 6, 3));
    assert_eq!(frame.mask.dim(), (2, 6));
    assert_eq!(frame.pose, Matrix4::identity());
    // 裁边后第 0..3 列来自原图左半边
    for v in 0..2 {
        for u in 0..6 {
            if u < 3 {
                assert_eq!(frame.mask[[v, u]], 0);
                assert_eq!(frame.depth[[v, u]], 0.0);
            } else {
                assert_eq!(frame.mask[[v, u]], 1);
                assert_relative_eq!(frame.depth[[v, u]], 2.0);
            }
        }
    }
    assert_relative_eq!(frame.color[[0, 0, 0]], 1.0, epsilon = 1e-6);
    assert_relative_eq!(frame.color[[0, 0, 2]], 0.0);

    let out = dir.path().join("trajectory.json");
    TrajectorySave::from(&dataset).write_to_json(&out).unwrap();
    let saved = TrajectorySave::read_from_json(&out).unwrap();
    assert_eq!(saved.dataset, "tumrgbd");
    assert_eq!(saved.frame_count, 4);
    assert_eq!(saved.stats.as_ref(), Some(stats));
    assert_eq!(saved.poses[0][1][1], 1.0);
}

#[test]
fn tum_without_masks_keeps_all_depth() {
    let dir = tempfile::tempdir().unwrap();
    write_tum(dir.path(), false);
    let dataset = Dataset::new(&config(dir.path())).unwrap();
    let frame = dataset.get(3).unwrap();
    assert!(frame.mask.iter().all(|m| *m == 1));
    for d in frame.depth.iter() {
        assert_relative_eq!(*d, 2.0);
    }
}

#[test]
fn missing_pose_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_tum(dir.path(), true);
    std::fs::remove_file(dir.path().join("groundtruth.txt")).unwrap();
    assert!(matches!(
        Dataset::new(&config(dir.path())),
        Err(DatasetError::MissingStreamFile(_))
    ));
}

#[test]
fn short_pose_record_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_tum(dir.path(), true);
    std::fs::write(
        dir.path().join("groundtruth.txt"),
        "# header\n0.0 1 2 3 0 0\n",
    )
    .unwrap();
    assert!(matches!(
        Dataset::new(&config(dir.path())),
        Err(DatasetError::MalformedPoseRecord { .. })
    ));
}

#[test]
fn missing_image_fails_access_only() {
    let dir = tempfile::tempdir().unwrap();
    write_tum(dir.path(), true);
    std::fs::remove_file(dir.path().join("rgb/0.100000.png")).unwrap();
    let dataset = Dataset::new(&config(dir.path())).unwrap();
    assert!(matches!(dataset.get(1), Err(DatasetError::Decode { .. })));
    assert!(dataset.get(2).is_ok());
}

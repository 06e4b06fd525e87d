//! 文件列表
//!
//! 按前缀和扩展名列出目录中的文件并排序：文件名全为整数时按数值排序，否则按字典序。

use std::path::{Path, PathBuf};

use crate::error::DatasetError;

fn numeric_stem(path: &Path) -> Option<u64> {
    path.file_stem()?.to_str()?.parse::<u64>().ok()
}

pub fn sort_paths(paths: &mut [PathBuf]) {
    if !paths.is_empty() && paths.iter().all(|p| numeric_stem(p).is_some()) {
        paths.sort_by_key(|p| numeric_stem(p));
    } else {
        paths.sort();
    }
}

/// 列出 `dir` 下以 `prefix` 开头、扩展名为 `extension` 的文件
pub fn list_files(dir: &Path, prefix: &str, extension: &str) -> Result<Vec<PathBuf>, DatasetError> {
    if !dir.is_dir() {
        return Err(DatasetError::MissingStreamFile(dir.to_path_buf()));
    }
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            let name_ok = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix));
            let ext_ok = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == extension);
            name_ok && ext_ok
        })
        .collect();
    sort_paths(&mut paths);
    Ok(paths)
}

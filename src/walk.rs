//! Filtered traversal of one datapack root's file tree.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collect every file under `dir`, in sorted traversal order.
///
/// Paths returned are `(absolute, root-relative)` pairs. The `include`
/// predicate gates each entry by its `root`-relative path before descent, so
/// an excluded directory is never entered and an excluded file is never
/// reported (and therefore never read). Entries that fail to stat are
/// skipped. A missing `dir` yields no files.
pub fn walk_files<F>(root: &Path, dir: &Path, include: F) -> Vec<(PathBuf, PathBuf)>
where
    F: Fn(&Path) -> bool,
{
    if !dir.is_dir() {
        return Vec::new();
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| match e.path().strip_prefix(root) {
            Ok(rel) => rel.as_os_str().is_empty() || include(rel),
            Err(_) => false,
        })
    {
        let Ok(entry) = entry else { continue };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(root) {
            files.push((entry.path().to_path_buf(), rel.to_path_buf()));
        }
    }
    files
}

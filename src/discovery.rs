//! Discovery Module
//!
//! Recursively scans a project for navigation sources.

use log::warn;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

pub const DEFAULT_FILE_NAMES: [&str; 2] = ["navigation.jsonnet", "navigation.json"];

/// Directories never holding navigation sources worth compiling.
const SKIPPED_DIRECTORIES: [&str; 4] = ["node_modules", "android", "ios", "target"];

fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRECTORIES.contains(&name.as_ref())
}

/// Find every file under `root` whose name is one of `file_names`, sorted.
pub fn find_navigation_files(root: &Path, file_names: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry))
    {
        match entry {
            Ok(entry) => {
                let matches = entry
                    .file_name()
                    .to_str()
                    .map_or(false, |name| file_names.iter().any(|f| f == name));
                if entry.file_type().is_file() && matches {
                    files.push(entry.into_path());
                }
            }
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
            }
        }
    }

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn defaults() -> Vec<String> {
        DEFAULT_FILE_NAMES.iter().map(|s| s.to_string()).collect()
    }

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    #[test]
    fn test_finds_sources_and_skips_vendor_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "src/navigation.jsonnet");
        touch(root, "packages/auth/navigation.json");
        touch(root, "node_modules/lib/navigation.jsonnet");
        touch(root, "ios/Pods/navigation.json");
        touch(root, ".git/navigation.json");
        touch(root, "src/other.jsonnet");

        let found: Vec<PathBuf> = find_navigation_files(root, &defaults())
            .into_iter()
            .map(|path| path.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            found,
            vec![
                PathBuf::from("packages/auth/navigation.json"),
                PathBuf::from("src/navigation.jsonnet"),
            ]
        );
    }

    #[test]
    fn test_hidden_root_is_still_scanned() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join(".workspace");
        touch(&root, "navigation.json");
        assert_eq!(find_navigation_files(&root, &defaults()).len(), 1);
    }
}

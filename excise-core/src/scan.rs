//! Parallel, deterministic target-file discovery with directory pruning.
//!
//! Performance characteristics:
//! - Early subtree skipping via `WalkDir::filter_entry` (O(1) per excluded dir)
//! - Parallel entry processing via Rayon's `par_bridge`
//! - Minimal work per entry (suffix check only)
//!
//! Results are sorted so batch output is stable across runs regardless of
//! traversal or thread interleaving.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories to exclude by default (standard Rust project conventions).
const EXCLUDED_DIRS: &[&str] = &["target", ".git", "node_modules", ".cargo"];

/// Default filename suffix used to select rewrite targets.
pub const DEFAULT_SUFFIX: &str = "_config_widget.rs";

/// Checks if a directory entry should be pruned (excluded from traversal).
#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Gathers all files under `root` whose name ends with `suffix`.
///
/// Automatically excludes `target/`, `.git/`, `node_modules/`, and `.cargo/`,
/// pruning each subtree before iteration reaches it. The returned list is
/// sorted lexicographically.
pub fn gather_target_files(root: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    gather_target_files_with_excludes(root, suffix, &[])
}

/// Like [`gather_target_files`] but with extra directory names to prune.
pub fn gather_target_files_with_excludes(
    root: &Path,
    suffix: &str,
    excludes: &[&str],
) -> Result<Vec<PathBuf>> {
    let all_excludes: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(excludes.iter().copied())
        .collect();

    let mut files = WalkDir::new(root)
        .into_iter()
        // filter_entry prunes whole subtrees before iteration reaches them
        .filter_entry(|e| !is_excluded_dir(e, &all_excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                let matches = path.is_file()
                    && path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.ends_with(suffix));
                matches.then(|| Ok(path.to_path_buf()))
            }
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .context(format!(
            "Failed to gather {suffix} files from {}",
            root.display()
        ))?;

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_test_tree() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "excise_scan_test_{}_{id}",
            std::process::id()
        ));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }

        let src = dir.join("src").join("ui");
        let target = dir.join("target").join("debug");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&target).unwrap();

        fs::write(src.join("clock_config_widget.rs"), "").unwrap();
        fs::write(src.join("gauge_config_widget.rs"), "").unwrap();
        fs::write(src.join("mod.rs"), "").unwrap();
        fs::write(src.join("helpers.rs"), "").unwrap();
        fs::write(target.join("stale_config_widget.rs"), "").unwrap();

        dir
    }

    #[test]
    fn test_gathers_only_suffix_matches() {
        let dir = create_test_tree();
        let files = gather_target_files(&dir, DEFAULT_SUFFIX).unwrap();

        let names: Vec<String> = files
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            ["clock_config_widget.rs", "gauge_config_widget.rs"]
        );

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_excludes_target_dir() {
        let dir = create_test_tree();
        let files = gather_target_files(&dir, DEFAULT_SUFFIX).unwrap();
        assert!(files.iter().all(|p| !p.components().any(|c| c.as_os_str() == "target")));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_custom_excludes() {
        let dir = create_test_tree();
        let files = gather_target_files_with_excludes(&dir, DEFAULT_SUFFIX, &["ui"]).unwrap();
        assert!(files.is_empty());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_results_are_sorted() {
        let dir = create_test_tree();
        let files = gather_target_files(&dir, ".rs").unwrap();
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
        fs::remove_dir_all(&dir).ok();
    }
}

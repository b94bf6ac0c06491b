//! File rewrite driver.
//!
//! Wraps the pure transform pipeline in I/O: read a file, transform it,
//! write back only when the content actually changed. Batches fan out over
//! rayon with per-file fault isolation - one unreadable file becomes a
//! `FileOutcome::Failed` entry, never a batch abort.
//!
//! All I/O goes through the [`FileSystem`] trait so tests can run the full
//! driver against an in-memory map.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::engine::transform;
use crate::error::{ExciseError, ExciseResult, IoResultExt};
use crate::pattern::PatternSet;

/// Minimal filesystem surface the driver needs. `Sync` because batches are
/// processed in parallel.
pub trait FileSystem: Sync {
    fn read(&self, path: &Path) -> ExciseResult<String>;
    fn write(&self, path: &Path, content: &str) -> ExciseResult<()>;
    fn exists(&self, path: &Path) -> bool;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read(&self, path: &Path) -> ExciseResult<String> {
        fs::read_to_string(path).with_path(path)
    }

    fn write(&self, path: &Path, content: &str) -> ExciseResult<()> {
        fs::write(path, content).map_err(|e| ExciseError::write(path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// In-memory filesystem for tests and dry experiments.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), content.into());
        }
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        self.files.lock().ok()?.get(path).cloned()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read(&self, path: &Path) -> ExciseResult<String> {
        self.files
            .lock()
            .map_err(|_| ExciseError::internal("file map lock poisoned"))?
            .get(path)
            .cloned()
            .ok_or_else(|| ExciseError::not_found(path))
    }

    fn write(&self, path: &Path, content: &str) -> ExciseResult<()> {
        self.files
            .lock()
            .map_err(|_| ExciseError::internal("file map lock poisoned"))?
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files
            .lock()
            .map(|files| files.contains_key(path))
            .unwrap_or(false)
    }
}

/// What happened to one file that was read and transformed.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub modified: bool,
    pub changes: Vec<String>,
}

/// Per-file batch outcome. Failures are data, not control flow.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    Processed { report: FileReport },
    NotFound { path: PathBuf },
    Failed { path: PathBuf, error: String },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Processed { report } => &report.path,
            FileOutcome::NotFound { path } | FileOutcome::Failed { path, .. } => path,
        }
    }

    pub fn is_modified(&self) -> bool {
        matches!(self, FileOutcome::Processed { report } if report.modified)
    }
}

/// Transform one file and write it back if it changed.
///
/// With `dry_run` the write is skipped but the report still says what would
/// have changed.
pub fn rewrite_file(
    fs: &dyn FileSystem,
    path: &Path,
    patterns: &PatternSet,
    dry_run: bool,
) -> ExciseResult<FileReport> {
    let original = fs.read(path)?;
    let outcome = transform(&original, patterns);
    let modified = outcome.content != original;

    if modified && !dry_run {
        fs.write(path, &outcome.content)?;
        info!(path = %path.display(), changes = outcome.changes.len(), "rewrote file");
    } else if modified {
        info!(path = %path.display(), changes = outcome.changes.len(), "dry run, skipping write");
    } else {
        debug!(path = %path.display(), "no changes");
    }

    Ok(FileReport {
        path: path.to_path_buf(),
        modified,
        changes: outcome.changes,
    })
}

/// Process a batch of files in parallel, preserving input order in the
/// output.
pub fn process_files(
    fs: &dyn FileSystem,
    paths: &[PathBuf],
    patterns: &PatternSet,
    dry_run: bool,
) -> Vec<FileOutcome> {
    paths
        .par_iter()
        .map(|path| {
            if !fs.exists(path) {
                warn!(path = %path.display(), "file not found");
                return FileOutcome::NotFound { path: path.clone() };
            }
            match rewrite_file(fs, path, patterns, dry_run) {
                Ok(report) => FileOutcome::Processed { report },
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to process file");
                    FileOutcome::Failed {
                        path: path.clone(),
                        error: e.to_string(),
                    }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::ConstructSpec;

    fn patterns() -> PatternSet {
        ConstructSpec::new("preview", "DrawingArea")
            .to_patterns()
            .unwrap()
    }

    #[test]
    fn test_rewrite_writes_modified_content() {
        let fs = MemoryFileSystem::new();
        fs.insert("/w.rs", "    let preview = DrawingArea::new();\n    other();\n");

        let report = rewrite_file(&fs, Path::new("/w.rs"), &patterns(), false).unwrap();
        assert!(report.modified);
        assert_eq!(fs.get(Path::new("/w.rs")).unwrap(), "    other();\n");
    }

    #[test]
    fn test_dry_run_leaves_file_untouched() {
        let fs = MemoryFileSystem::new();
        let input = "    let preview = DrawingArea::new();\n    other();\n";
        fs.insert("/w.rs", input);

        let report = rewrite_file(&fs, Path::new("/w.rs"), &patterns(), true).unwrap();
        assert!(report.modified);
        assert!(!report.changes.is_empty());
        assert_eq!(fs.get(Path::new("/w.rs")).unwrap(), input);
    }

    #[test]
    fn test_unmodified_file_not_rewritten() {
        let fs = MemoryFileSystem::new();
        fs.insert("/clean.rs", "fn main() {}\n");

        let report = rewrite_file(&fs, Path::new("/clean.rs"), &patterns(), false).unwrap();
        assert!(!report.modified);
        assert!(report.changes.is_empty());
    }

    #[test]
    fn test_missing_file_is_not_found_outcome() {
        let fs = MemoryFileSystem::new();
        fs.insert("/a.rs", "fn main() {}\n");
        let paths = vec![PathBuf::from("/a.rs"), PathBuf::from("/gone.rs")];

        let outcomes = process_files(&fs, &paths, &patterns(), false);
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0], FileOutcome::Processed { .. }));
        assert!(matches!(outcomes[1], FileOutcome::NotFound { .. }));
    }

    /// Readable store whose writes always fail, like a read-only mount.
    struct FailingWrites(MemoryFileSystem);

    impl FileSystem for FailingWrites {
        fn read(&self, path: &Path) -> ExciseResult<String> {
            self.0.read(path)
        }

        fn write(&self, path: &Path, _content: &str) -> ExciseResult<()> {
            Err(ExciseError::write(
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }

        fn exists(&self, path: &Path) -> bool {
            self.0.exists(path)
        }
    }

    #[test]
    fn test_write_failure_is_isolated_to_one_file() {
        let fs = FailingWrites(MemoryFileSystem::new());
        fs.0.insert("/w.rs", "    let preview = DrawingArea::new();\n");
        fs.0.insert("/clean.rs", "fn main() {}\n");

        let paths = vec![PathBuf::from("/w.rs"), PathBuf::from("/clean.rs")];
        let outcomes = process_files(&fs, &paths, &patterns(), false);

        assert!(matches!(outcomes[0], FileOutcome::Failed { .. }));
        assert!(matches!(outcomes[1], FileOutcome::Processed { .. }));
        // The failed write must not leave a partial file behind.
        assert_eq!(
            fs.0.get(Path::new("/w.rs")).unwrap(),
            "    let preview = DrawingArea::new();\n"
        );
    }

    #[test]
    fn test_batch_preserves_input_order() {
        let fs = MemoryFileSystem::new();
        for i in 0..8 {
            fs.insert(format!("/f{i}.rs"), "fn main() {}\n");
        }
        let paths: Vec<PathBuf> = (0..8).map(|i| PathBuf::from(format!("/f{i}.rs"))).collect();

        let outcomes = process_files(&fs, &paths, &patterns(), false);
        let got: Vec<&Path> = outcomes.iter().map(|o| o.path()).collect();
        let want: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
        assert_eq!(got, want);
    }
}

//! Builder pattern API for batch rewrites.
//!
//! Provides a fluent interface for configuring and running a removal batch:
//!
//! ```rust,ignore
//! use excise_core::prelude::*;
//!
//! let spec = ConstructSpec::new("preview", "DrawingArea");
//! let result = Excise::new("/path/to/crate", spec)
//!     .suffix("_config_widget.rs")
//!     .dry_run(true)
//!     .run()?;
//!
//! println!("Modified: {}", result.modified_count());
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::driver::{process_files, FileOutcome, OsFileSystem};
use crate::pattern::ConstructSpec;
use crate::scan::{gather_target_files_with_excludes, DEFAULT_SUFFIX};

/// Builder for configuring a batch rewrite.
#[derive(Debug, Clone)]
pub struct Excise {
    /// Root path scanned for target files
    root: PathBuf,

    /// The construct to remove
    spec: ConstructSpec,

    /// Filename suffix that selects rewrite targets
    suffix: String,

    /// Explicit file list; skips scanning when non-empty
    files: Vec<PathBuf>,

    /// Custom excluded directories
    excluded_dirs: Vec<String>,

    /// Lookback window override
    lookback_window: Option<usize>,

    /// Blank-run threshold override
    max_blank_run: Option<usize>,

    /// Dry-run mode (don't modify files)
    dry_run: bool,
}

impl Excise {
    /// Create a batch builder for the given root and construct.
    pub fn new(root: impl Into<PathBuf>, spec: ConstructSpec) -> Self {
        Self {
            root: root.into(),
            spec,
            suffix: DEFAULT_SUFFIX.to_string(),
            files: Vec::new(),
            excluded_dirs: Vec::new(),
            lookback_window: None,
            max_blank_run: None,
            dry_run: false,
        }
    }

    /// Set the filename suffix used when scanning for targets.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Rewrite exactly these files instead of scanning the root.
    pub fn files(mut self, files: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.files.extend(files.into_iter().map(Into::into));
        self
    }

    /// Add directories to exclude from scanning.
    pub fn exclude_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excluded_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Override how many preceding lines the lookback pruner inspects.
    pub fn lookback_window(mut self, window: usize) -> Self {
        self.lookback_window = Some(window);
        self
    }

    /// Override the longest run of blank lines kept after rewriting.
    pub fn max_blank_run(mut self, max_run: usize) -> Self {
        self.max_blank_run = Some(max_run);
        self
    }

    /// Enable dry-run mode (no file modifications).
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Compile the patterns and rewrite the batch.
    pub fn run(&self) -> Result<BatchResult> {
        let mut builder = self.spec.to_builder();
        if let Some(window) = self.lookback_window {
            builder = builder.lookback_window(window);
        }
        if let Some(max_run) = self.max_blank_run {
            builder = builder.max_blank_run(max_run);
        }
        let patterns = builder
            .build()
            .context("Failed to compile removal patterns")?;

        let paths = if self.files.is_empty() {
            let excludes: Vec<&str> = self.excluded_dirs.iter().map(String::as_str).collect();
            gather_target_files_with_excludes(&self.root, &self.suffix, &excludes)
                .context("Failed to gather target files")?
        } else {
            self.files.clone()
        };

        let outcomes = process_files(&OsFileSystem, &paths, &patterns, self.dry_run);
        Ok(BatchResult { outcomes })
    }
}

/// Result of running a batch rewrite.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Per-file outcomes, in input order.
    pub outcomes: Vec<FileOutcome>,
}

impl BatchResult {
    /// Number of files whose content changed.
    pub fn modified_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_modified()).count()
    }

    /// Whether any file failed to process (not-found outcomes excluded).
    pub fn has_failures(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o, FileOutcome::Failed { .. }))
    }
}

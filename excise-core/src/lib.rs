//! excise-core: structural source-pruning library for widget code.
//!
//! This library removes a single named construct - a struct field, its
//! constructor bindings, setup calls, callback registration block, and the
//! imports that only it used - from Rust source files, line by line, without
//! parsing the language.
//!
//! # Features
//!
//! - **Line classification**: Regex pattern table with fixed priority order
//! - **Block extent tracking**: Dual delimiter-depth counters follow a
//!   multi-line callback registration to its closing line
//! - **Lookback pruning**: Setup-only bindings immediately preceding a
//!   removed block go with it
//! - **Reference rewriting**: Call-site arguments and struct-literal entries
//!   mentioning the construct are stripped in place
//! - **Unused-import pruning**: Watched symbols lose their imports once no
//!   use remains outside an import statement
//! - **Blank-line normalization**: Deletion scars are collapsed
//! - **Parallel batches**: Files are processed concurrently with per-file
//!   fault isolation
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use excise_core::prelude::*;
//!
//! let spec = ConstructSpec::new("preview", "DrawingArea");
//! let result = Excise::new("/path/to/crate", spec).run()?;
//!
//! println!("Modified {} files", result.modified_count());
//! ```
//!
//! # Module Organization
//!
//! - [`pattern`]: The removal rule table and its builder
//! - [`classify`]: Per-line classification
//! - [`block`]: Multi-line block extent tracking
//! - [`rewrite`]: In-place reference rewriting
//! - [`imports`]: Import-list surgery and unused-import pruning
//! - [`normalize`]: Blank-line collapse
//! - [`engine`]: The per-file transform pipeline
//! - [`driver`]: File I/O, batching, fault isolation
//! - [`scan`]: Parallel target-file discovery
//! - [`builder`]: Fluent builder API for configuration
//! - [`error`]: Typed error handling

pub mod block;
pub mod builder;
pub mod classify;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod imports;
pub mod logging;
pub mod normalize;
pub mod pattern;
pub mod prelude;
pub mod report;
pub mod rewrite;
pub mod scan;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{ExciseError, ExciseResult, IoResultExt};

// Pattern table
pub use pattern::{
    ConstructSpec, PatternKind, PatternSet, PatternSetBuilder, RemovalPattern,
    DEFAULT_LOOKBACK_WINDOW, DEFAULT_MAX_BLANK_RUN,
};

// Classification and block tracking
pub use block::{delimiter_balance, BlockTracker};
pub use classify::{classify, LineVerdict};

// Rewriting
pub use rewrite::ReferenceRewriter;

// Import handling
pub use imports::{
    count_usage, is_empty_import, prune_unused_imports, strip_symbol_from_import, SymbolUsage,
};

// Normalization
pub use normalize::collapse_blank_runs;

// Transform pipeline
pub use engine::{transform, Transform};

// File rewriting
pub use driver::{
    process_files, rewrite_file, FileOutcome, FileReport, FileSystem, MemoryFileSystem,
    OsFileSystem,
};

// File scanning
pub use scan::{gather_target_files, gather_target_files_with_excludes, DEFAULT_SUFFIX};

// Configuration
pub use config::{load_config, EngineConfig, ExciseConfig};

// Builder API
pub use builder::{BatchResult, Excise};

// Logging
pub use logging::init_structured_logging;

// Reporting
pub use report::{modified_count, print_json, print_plain};

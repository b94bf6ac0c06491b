//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use excise_core::prelude::*;
//! ```

// Core types
pub use crate::error::{ExciseError, ExciseResult};
pub use crate::pattern::{ConstructSpec, PatternSet, PatternSetBuilder};

// Transform pipeline
pub use crate::engine::{transform, Transform};

// File rewriting
pub use crate::driver::{process_files, rewrite_file, FileOutcome, FileReport};

// File scanning
pub use crate::scan::{gather_target_files, gather_target_files_with_excludes};

// Configuration
pub use crate::config::{load_config, ExciseConfig};

// Builder API
pub use crate::builder::{BatchResult, Excise};

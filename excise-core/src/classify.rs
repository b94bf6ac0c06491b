//! Line classification - one line in, one verdict out.
//!
//! Patterns are tested in the fixed priority order the [`PatternSet`] was
//! built with: import-list surgery, whole-import-line drops, block openers,
//! single-line removals. First match wins; no match keeps the line.
//!
//! Classification is pure except for import surgery, whose text edit is
//! confined to the matched line and therefore needs no extent tracking.

use crate::imports::{is_empty_import, strip_symbol_from_import};
use crate::pattern::{PatternKind, PatternSet};

/// Per-line classification result. Exists only during one file's pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineVerdict {
    /// Line is untouched by this pass.
    Keep,
    /// Delete the whole line.
    Remove { note: Option<String> },
    /// Replace the line with an edited version (import surgery).
    Edit { line: String, note: Option<String> },
    /// Line opens a multi-line construct; the block tracker takes over.
    BlockOpen { note: Option<String> },
}

/// Classify one line against the pattern set.
pub fn classify(line: &str, patterns: &PatternSet) -> LineVerdict {
    for pattern in patterns.patterns() {
        if !pattern.regex.is_match(line) {
            continue;
        }
        match pattern.kind {
            PatternKind::ImportSurgery => {
                let Some(symbol) = pattern.symbol.as_deref() else {
                    continue;
                };
                let edited = strip_symbol_from_import(line, symbol);
                if is_empty_import(&edited) {
                    return LineVerdict::Remove {
                        note: pattern.note.clone(),
                    };
                }
                return LineVerdict::Edit {
                    line: edited,
                    note: pattern.note.clone(),
                };
            }
            PatternKind::ImportLine | PatternKind::Line => {
                return LineVerdict::Remove {
                    note: pattern.note.clone(),
                };
            }
            PatternKind::BlockOpener => {
                return LineVerdict::BlockOpen {
                    note: pattern.note.clone(),
                };
            }
            // Lookback rules live in a separate list; defensive skip if one
            // is ever routed here.
            PatternKind::Lookback => continue,
        }
    }
    LineVerdict::Keep
}

//! Import-list surgery and unused-import pruning.
//!
//! Two jobs share the list-surgery logic here:
//!
//! 1. The classifier strips configured symbols from import lines as it walks
//!    a file (confined to one line, no extent tracking needed).
//! 2. After all deletions, the pruner scans the whole rewritten content and
//!    removes imports of watched symbols that no longer have any use outside
//!    an import statement.
//!
//! "Unused" is decided by whole-file occurrence counting, not reference
//! analysis: no symbol table, no scope awareness, and occurrences inside
//! comments count. A deliberate approximation, documented rather than
//! upgraded.

use std::sync::OnceLock;

use regex::Regex;

/// Occurrence counts for one tracked symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolUsage {
    /// Word-boundary occurrences anywhere in the content.
    pub total: usize,
    /// Occurrences that lie within an import statement.
    pub in_imports: usize,
}

impl SymbolUsage {
    /// True when the symbol exists and appears only inside imports.
    ///
    /// A symbol that was never present is not "import only" - absence must
    /// not trigger removal.
    pub fn import_only(&self) -> bool {
        self.total > 0 && self.total == self.in_imports
    }
}

/// Word-boundary and import-statement matchers for one symbol.
fn usage_patterns(symbol: &str) -> Option<(Regex, Regex)> {
    let escaped = regex::escape(symbol);
    Some((
        Regex::new(&format!(r"\b{escaped}\b")).ok()?,
        // [^;] spans newlines, so multi-line use statements are covered.
        Regex::new(&format!(r"use\s+[^;]*\b{escaped}\b")).ok()?,
    ))
}

/// Count total and import-only occurrences of `symbol` in `content`.
pub fn count_usage(content: &str, symbol: &str) -> Option<SymbolUsage> {
    let (word, import) = usage_patterns(symbol)?;
    Some(SymbolUsage {
        total: word.find_iter(content).count(),
        in_imports: import.find_iter(content).count(),
    })
}

/// Tidy patterns applied after a symbol is cut from an import list.
fn brace_tidy() -> &'static [Regex; 3] {
    static TIDY: OnceLock<[Regex; 3]> = OnceLock::new();
    TIDY.get_or_init(|| {
        [
            Regex::new(r"\{\s*,").expect("hardcoded pattern is valid"),
            Regex::new(r",\s*\}").expect("hardcoded pattern is valid"),
            Regex::new(r"\{\s*\}").expect("hardcoded pattern is valid"),
        ]
    })
}

/// Remove `symbol` from an import line's comma-separated list, collapsing
/// empty groups.
///
/// The caller is responsible for dropping the line entirely when
/// [`is_empty_import`] reports the list became empty.
pub fn strip_symbol_from_import(line: &str, symbol: &str) -> String {
    let escaped = regex::escape(symbol);
    let removals = [
        format!(r",\s*{escaped}\b"),
        format!(r"\b{escaped}\s*,\s*"),
        format!(r"\b{escaped}\b"),
    ];

    let mut result = line.to_string();
    for pattern in &removals {
        let Ok(re) = Regex::new(pattern) else {
            return line.to_string();
        };
        if re.is_match(&result) {
            result = re.replace_all(&result, "").into_owned();
        }
    }

    let tidy = brace_tidy();
    result = tidy[0].replace_all(&result, "{").into_owned();
    result = tidy[1].replace_all(&result, "}").into_owned();
    result = tidy[2].replace_all(&result, "").into_owned();
    result
}

/// Whether surgery left an import statement with no symbols
/// (`use x::;` or `use x::{};`).
pub fn is_empty_import(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.ends_with("::;") || trimmed.ends_with("::{};")
}

/// Remove imports of watched symbols whose every occurrence lies within an
/// import statement.
///
/// Whole-file pass: usage can be arbitrarily far from the import line, so
/// this must run after the line-removal and rewrite passes have settled the
/// content. Surgery is applied line-wise with the same logic the classifier
/// uses; lines emptied by it (including sole-symbol `use path::sym;` lines)
/// are dropped.
pub fn prune_unused_imports(
    content: &str,
    symbols: &[String],
    changes: &mut Vec<String>,
) -> String {
    let mut result = content.to_string();

    for symbol in symbols {
        let Some(usage) = count_usage(&result, symbol) else {
            continue;
        };
        if !usage.import_only() {
            continue;
        }

        let Some((word, _)) = usage_patterns(symbol) else {
            continue;
        };

        let had_trailing_newline = result.ends_with('\n');
        let mut kept: Vec<String> = Vec::new();
        let mut touched = false;

        for line in result.lines() {
            if !word.is_match(line) {
                kept.push(line.to_string());
                continue;
            }
            let stripped = strip_symbol_from_import(line, symbol);
            if is_empty_import(&stripped)
                || (stripped.trim().is_empty() && !line.trim().is_empty())
            {
                touched = true;
                continue;
            }
            if stripped != line {
                touched = true;
            }
            kept.push(stripped);
        }

        if touched {
            changes.push(format!("Removed unused {symbol} import"));
            result = kept.join("\n");
            if had_trailing_newline && !result.ends_with('\n') {
                result.push('\n');
            }
        }
    }

    result
}

//! Removal pattern table - one shared, immutable rule set per construct.
//!
//! A [`RemovalPattern`] is a tagged rule: a compiled regex plus a kind that
//! tells the classifier how to act on a match (import-list surgery, whole
//! line removal, block opener, lookback-candidate binding). The full set for
//! one construct lives in a [`PatternSet`], built either directly through
//! [`PatternSetBuilder`] or from a declarative [`ConstructSpec`].
//!
//! Performance characteristics:
//! - Compile once, use many: patterns are built before the batch starts
//! - Shared read-only across files, parallel-safe

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ExciseError, ExciseResult};
use crate::rewrite::ReferenceRewriter;

/// Default number of preceding lines inspected for setup-only bindings.
pub const DEFAULT_LOOKBACK_WINDOW: usize = 3;

/// Default maximum run of consecutive blank lines kept by the normalizer.
pub const DEFAULT_MAX_BLANK_RUN: usize = 1;

/// How the classifier acts when a pattern matches a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// The line is an import statement; strip one symbol from its list,
    /// deleting the whole line if the list becomes empty.
    ImportSurgery,
    /// The line is an import statement to delete outright.
    ImportLine,
    /// Delete the whole line.
    Line,
    /// The line opens a multi-line construct; hand over to the block tracker.
    BlockOpener,
    /// Candidate for the lookback pruner (never matched by the classifier).
    Lookback,
}

/// A tagged removal rule.
#[derive(Debug, Clone)]
pub struct RemovalPattern {
    pub kind: PatternKind,
    pub regex: Regex,
    /// Symbol to strip from the import list (`ImportSurgery` only).
    pub symbol: Option<String>,
    /// Human-readable change description; `None` removes silently.
    pub note: Option<String>,
}

/// The immutable rule set driving one construct's removal.
///
/// Classifier patterns are stored in priority order: import surgery first,
/// then whole-import-line drops, then block openers, then single-line
/// removals. First match wins.
#[derive(Debug)]
pub struct PatternSet {
    patterns: Vec<RemovalPattern>,
    lookback: Vec<RemovalPattern>,
    watch_symbols: Vec<String>,
    rewriter: ReferenceRewriter,
    lookback_window: usize,
    max_blank_run: usize,
}

impl PatternSet {
    /// Start building a pattern set for the given construct identifier.
    pub fn builder(identifier: impl Into<String>) -> PatternSetBuilder {
        PatternSetBuilder::new(identifier)
    }

    /// Classifier patterns, in priority order.
    pub fn patterns(&self) -> &[RemovalPattern] {
        &self.patterns
    }

    /// Lookback-candidate patterns.
    pub fn lookback_patterns(&self) -> &[RemovalPattern] {
        &self.lookback
    }

    /// Symbols checked by the unused-import pruner.
    pub fn watch_symbols(&self) -> &[String] {
        &self.watch_symbols
    }

    /// The reference rewriter for this construct.
    pub fn rewriter(&self) -> &ReferenceRewriter {
        &self.rewriter
    }

    /// Number of preceding lines the lookback pruner inspects.
    pub fn lookback_window(&self) -> usize {
        self.lookback_window
    }

    /// Maximum run of consecutive blank lines the normalizer keeps.
    pub fn max_blank_run(&self) -> usize {
        self.max_blank_run
    }
}

/// Fluent builder for a [`PatternSet`].
#[derive(Debug)]
pub struct PatternSetBuilder {
    identifier: String,
    type_name: Option<String>,
    patterns: Vec<RemovalPattern>,
    lookback: Vec<RemovalPattern>,
    watch_symbols: Vec<String>,
    lookback_window: usize,
    max_blank_run: usize,
    error: Option<String>,
}

impl PatternSetBuilder {
    fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            type_name: None,
            patterns: Vec::new(),
            lookback: Vec::new(),
            watch_symbols: Vec::new(),
            lookback_window: DEFAULT_LOOKBACK_WINDOW,
            max_blank_run: DEFAULT_MAX_BLANK_RUN,
            error: None,
        }
    }

    fn compile(&mut self, pattern: &str) -> Option<Regex> {
        match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                if self.error.is_none() {
                    self.error = Some(format!("{pattern}: {e}"));
                }
                None
            }
        }
    }

    fn push(
        &mut self,
        kind: PatternKind,
        pattern: &str,
        symbol: Option<String>,
        note: Option<String>,
    ) {
        if let Some(regex) = self.compile(pattern) {
            let rule = RemovalPattern {
                kind,
                regex,
                symbol,
                note,
            };
            if kind == PatternKind::Lookback {
                self.lookback.push(rule);
            } else {
                self.patterns.push(rule);
            }
        }
    }

    /// Type name of the construct, used by the reference rewriter to strip
    /// typed parameters.
    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Strip `symbol` from any import line that mentions it, deleting the
    /// line when the list becomes empty.
    pub fn import_surgery(mut self, symbol: &str, note: impl Into<String>) -> Self {
        let escaped = regex::escape(symbol);
        let pattern = format!(r"^\s*(?:pub\s+)?use\s+[^;]*\b{escaped}\b");
        self.push(
            PatternKind::ImportSurgery,
            &pattern,
            Some(symbol.to_string()),
            Some(note.into()),
        );
        self
    }

    /// Delete the import of a full path outright.
    pub fn drop_import(mut self, path: &str, note: impl Into<String>) -> Self {
        let escaped = regex::escape(path);
        let pattern = format!(r"^\s*use\s+{escaped};\s*$");
        self.push(PatternKind::ImportLine, &pattern, None, Some(note.into()));
        self
    }

    /// Delete any line matching `pattern`, recording `note` in the report.
    pub fn remove_line(mut self, pattern: &str, note: impl Into<String>) -> Self {
        self.push(PatternKind::Line, pattern, None, Some(note.into()));
        self
    }

    /// Delete any line matching `pattern` without a report entry.
    pub fn remove_line_silent(mut self, pattern: &str) -> Self {
        self.push(PatternKind::Line, pattern, None, None);
        self
    }

    /// Treat lines matching `pattern` as multi-line block openers.
    pub fn block_opener(mut self, pattern: &str, note: impl Into<String>) -> Self {
        self.push(PatternKind::BlockOpener, pattern, None, Some(note.into()));
        self
    }

    /// Register a setup-only binding shape for the lookback pruner.
    pub fn lookback_binding(mut self, pattern: &str, note: impl Into<String>) -> Self {
        self.push(PatternKind::Lookback, pattern, None, Some(note.into()));
        self
    }

    /// Add a symbol for the unused-import pruner to watch.
    pub fn watch_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.watch_symbols.push(symbol.into());
        self
    }

    /// Add several watched symbols at once.
    pub fn watch_symbols(mut self, symbols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.watch_symbols
            .extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Override the lookback window size.
    pub fn lookback_window(mut self, window: usize) -> Self {
        self.lookback_window = window;
        self
    }

    /// Override the blank-run threshold used by the normalizer.
    pub fn max_blank_run(mut self, max_run: usize) -> Self {
        self.max_blank_run = max_run;
        self
    }

    /// Finish the set, compiling the reference rewriter.
    pub fn build(self) -> ExciseResult<PatternSet> {
        if let Some(message) = self.error {
            return Err(ExciseError::pattern(message));
        }

        let rewriter = ReferenceRewriter::new(&self.identifier, self.type_name.as_deref())
            .ok_or_else(|| {
                ExciseError::pattern(format!(
                    "failed to compile rewrite rules for `{}`",
                    self.identifier
                ))
            })?;

        Ok(PatternSet {
            patterns: self.patterns,
            lookback: self.lookback,
            watch_symbols: self.watch_symbols,
            rewriter,
            lookback_window: self.lookback_window,
            max_blank_run: self.max_blank_run,
        })
    }
}

/// Declarative description of a construct to remove.
///
/// Compiles to the default pattern table: struct field, constructor binding,
/// `set_*` setup calls, container registration, redraw calls, clone bindings,
/// constructor-list entries, and the multi-line callback registration block.
/// Loadable from `excise.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructSpec {
    /// Primary identifier of the construct (e.g. a local/field name).
    pub name: String,

    /// Type the construct is declared with.
    #[serde(alias = "type")]
    pub type_name: String,

    /// Method whose `move |...|` closure registration forms the multi-line
    /// block (e.g. `set_draw_func`).
    #[serde(default = "default_callback_method")]
    pub callback_method: String,

    /// Local bindings that exist solely to be captured by the block,
    /// matched by the lookback pruner (e.g. `config_clone`).
    #[serde(default)]
    pub lookback_bindings: Vec<String>,

    /// Symbols whose imports are removed once no use remains outside an
    /// import statement.
    #[serde(default)]
    pub watch_symbols: Vec<String>,

    /// Full import paths deleted on sight (helpers only the construct used).
    #[serde(default)]
    pub drop_imports: Vec<String>,

    /// Symbols stripped from import lists on sight, without occurrence
    /// counting. Unsound when the symbol is used elsewhere; prefer
    /// `watch_symbols` unless the import is known to belong to the construct.
    #[serde(default)]
    pub strip_imports: Vec<String>,
}

fn default_callback_method() -> String {
    "set_draw_func".to_string()
}

impl ConstructSpec {
    /// A spec with the default callback method and no extras.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            callback_method: default_callback_method(),
            lookback_bindings: Vec::new(),
            watch_symbols: Vec::new(),
            drop_imports: Vec::new(),
            strip_imports: Vec::new(),
        }
    }

    /// Set the callback method that opens the multi-line block.
    pub fn callback_method(mut self, method: impl Into<String>) -> Self {
        self.callback_method = method.into();
        self
    }

    /// A builder preloaded with the default table for this construct.
    pub fn to_builder(&self) -> PatternSetBuilder {
        let n = regex::escape(&self.name);
        let t = regex::escape(&self.type_name);
        let cb = regex::escape(&self.callback_method);

        let mut builder = PatternSet::builder(&self.name).type_name(&self.type_name);

        for symbol in &self.strip_imports {
            builder = builder.import_surgery(symbol, format!("Removed {symbol} import"));
        }
        for path in &self.drop_imports {
            let last = path.rsplit("::").next().unwrap_or(path);
            builder = builder.drop_import(path, format!("Removed {last} import"));
        }

        // The opener must outrank the generic `set_*` rule below, which would
        // otherwise swallow the registration line and orphan the block body.
        builder = builder
            .block_opener(
                &format!(r"\b{n}\.{cb}\(move \|"),
                format!("Removed {} block", self.callback_method),
            )
            .remove_line(
                &format!(r"^\s*{n}:\s*{t}\s*,\s*$"),
                format!("Removed {} field from struct", self.name),
            )
            .remove_line(
                &format!(r"^\s*{n}(?::\s*{n})?,?\s*$"),
                format!("Removed {} from constructor", self.name),
            )
            .remove_line(
                &format!(r"^\s*let {n} = {t}::new\(\);\s*$"),
                format!("Removed {} creation", self.name),
            )
            .remove_line_silent(&format!(r"^\s*{n}\.set_\w+\("))
            .remove_line(
                &format!(r"^\s*\w+\.append\(&{n}\);\s*$"),
                format!("Removed {} append", self.name),
            )
            .remove_line(
                &format!(r"^\s*(?:{n}|{n}_\w+|self\.{n})\.queue_draw\(\);\s*$"),
                format!("Removed {}.queue_draw()", self.name),
            )
            .remove_line(
                &format!(r"^\s*let {n}_\w+ = (?:{n}|self\.{n})\.clone\(\);\s*$"),
                format!("Removed {} clone binding", self.name),
            );

        for binding in &self.lookback_bindings {
            let b = regex::escape(binding);
            builder = builder.lookback_binding(
                &format!(r"^\s*let {b} = \w+(?:\.\w+)*\.clone\(\);\s*$"),
                format!("Removed {binding} binding"),
            );
        }

        builder.watch_symbols(self.watch_symbols.iter().cloned())
    }

    /// Compile the default pattern table for this construct.
    pub fn to_patterns(&self) -> ExciseResult<PatternSet> {
        self.to_builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ConstructSpec {
        let mut spec = ConstructSpec::new("preview", "DrawingArea");
        spec.lookback_bindings = vec!["config_clone".into(), "theme_clone".into()];
        spec.watch_symbols = vec!["render_bar".into()];
        spec
    }

    #[test]
    fn test_spec_compiles() {
        let patterns = spec().to_patterns().unwrap();
        assert!(!patterns.patterns().is_empty());
        assert_eq!(patterns.lookback_patterns().len(), 2);
        assert_eq!(patterns.watch_symbols(), ["render_bar".to_string()]);
        assert_eq!(patterns.lookback_window(), DEFAULT_LOOKBACK_WINDOW);
    }

    #[test]
    fn test_default_table_matches_construct_lines() {
        let patterns = spec().to_patterns().unwrap();
        let matches = |line: &str| {
            patterns
                .patterns()
                .iter()
                .any(|p| p.regex.is_match(line))
        };

        assert!(matches("    preview: DrawingArea,"));
        assert!(matches("    let preview = DrawingArea::new();"));
        assert!(matches("    preview.set_content_height(80);"));
        assert!(matches("    style_page.append(&preview);"));
        assert!(matches("    preview_clone.queue_draw();"));
        assert!(matches("    let preview_clone = preview.clone();"));
        assert!(matches("    preview.set_draw_func(move |_, ctx, w, h| {"));
        assert!(matches("            preview,"));
    }

    #[test]
    fn test_default_table_leaves_unrelated_lines() {
        let patterns = spec().to_patterns().unwrap();
        let matches = |line: &str| {
            patterns
                .patterns()
                .iter()
                .any(|p| p.regex.is_match(line))
        };

        assert!(!matches("    let label = Label::new();"));
        assert!(!matches("    grid.append(&label);"));
        assert!(!matches("    live_preview.set_visible(true);"));
        assert!(!matches("    let config_clone = config.clone();"));
    }

    #[test]
    fn test_invalid_custom_pattern_surfaces_error() {
        let result = PatternSet::builder("x").remove_line("(unclosed", "bad").build();
        assert!(matches!(result, Err(ExciseError::Pattern { .. })));
    }

    #[test]
    fn test_builder_overrides() {
        let patterns = PatternSet::builder("x")
            .lookback_window(5)
            .max_blank_run(2)
            .build()
            .unwrap();
        assert_eq!(patterns.lookback_window(), 5);
        assert_eq!(patterns.max_blank_run(), 2);
    }
}

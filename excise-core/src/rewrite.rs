//! Reference rewriting - line-local edits on surviving lines.
//!
//! After whole-line removal, references to the construct can linger inside
//! parameter lists, call arguments, and struct literals. This pass narrows
//! those lines instead of deleting them: it strips the dangling reference and
//! repairs the separator punctuation around it.
//!
//! Performance: all patterns are compiled once per construct and shared
//! read-only across every file in the batch.

use regex::Regex;

/// A single separator-aware substitution.
struct RewriteRule {
    regex: Regex,
    replacement: &'static str,
}

/// Strips dangling references to a removed construct from a line.
///
/// Handles, in order:
/// - `name: &Type` parameters in function signatures
/// - `&name` arguments at call sites
/// - `name.clone()` arguments at call sites
/// - `&self.name` trailing arguments
/// - `name: name.clone()` struct literal fields
/// - bare `name` entries in argument lists and struct literals
///
/// Replacement never leaves a doubled or trailing separator. The rewriter
/// does not delete lines; the caller drops a line that it reduces to pure
/// whitespace.
pub struct ReferenceRewriter {
    rules: Vec<RewriteRule>,
}

impl ReferenceRewriter {
    /// Build the rule table for a construct identifier and its optional type
    /// name. Returns `None` if a pattern fails to compile (cannot happen for
    /// escaped identifiers, but callers stay panic-free).
    pub fn new(identifier: &str, type_name: Option<&str>) -> Option<Self> {
        let n = regex::escape(identifier);
        let mut rules = Vec::new();

        let mut rule = |pattern: String, replacement: &'static str| -> Option<()> {
            rules.push(RewriteRule {
                regex: Regex::new(&pattern).ok()?,
                replacement,
            });
            Some(())
        };

        // Parameters: `name: &Type` in either list position.
        if let Some(t) = type_name {
            let t = regex::escape(t);
            rule(format!(r",\s*{n}:\s*&{t}\b"), "")?;
            rule(format!(r"\b{n}:\s*&{t},\s*"), "")?;
        }

        // Call-site arguments: `&name`, `name.clone()`, `&self.name`.
        rule(format!(r",\s*&{n}\s*([,)])"), "$1")?;
        rule(format!(r"&{n},\s*"), "")?;
        rule(format!(r",\s*\b{n}\.clone\(\)\s*([,)])"), "$1")?;
        rule(format!(r"\b{n}\.clone\(\),\s*"), "")?;
        rule(format!(r",\s*&self\.{n}\b"), "")?;
        rule(format!(r"&self\.{n},\s*"), "")?;

        // Struct literal fields: `name: name.clone()`.
        rule(format!(r",\s*\b{n}:\s*{n}\.clone\(\)"), "")?;
        rule(format!(r"\b{n}:\s*{n}\.clone\(\),\s*"), "")?;

        // Bare list entries: `, name` in the middle or end of a list,
        // `name, ` when it leads one.
        rule(format!(r",\s*\b{n}\b"), "")?;
        rule(format!(r"\b{n},\s*"), "")?;

        Some(Self { rules })
    }

    /// Apply all rules to one line.
    ///
    /// Returns `Some(narrowed)` when at least one rule matched, `None` when
    /// the line is untouched.
    pub fn rewrite(&self, line: &str) -> Option<String> {
        let mut current = line.to_string();
        let mut matched = false;

        for rule in &self.rules {
            if rule.regex.is_match(&current) {
                matched = true;
                current = rule
                    .regex
                    .replace_all(&current, rule.replacement)
                    .into_owned();
            }
        }

        if matched {
            Some(current)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for ReferenceRewriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceRewriter")
            .field("rules", &self.rules.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter() -> ReferenceRewriter {
        ReferenceRewriter::new("preview", Some("DrawingArea")).unwrap()
    }

    #[test]
    fn test_strip_typed_parameter_middle() {
        let rw = rewriter();
        let out = rw
            .rewrite("fn build(label: &Label, preview: &DrawingArea, config: &Config) {")
            .unwrap();
        assert_eq!(out, "fn build(label: &Label, config: &Config) {");
    }

    #[test]
    fn test_strip_typed_parameter_trailing() {
        let rw = rewriter();
        let out = rw
            .rewrite("fn build(label: &Label, preview: &DrawingArea) {")
            .unwrap();
        assert_eq!(out, "fn build(label: &Label) {");
    }

    #[test]
    fn test_strip_ref_argument() {
        let rw = rewriter();
        let out = rw
            .rewrite("    build_controls(&label, &preview, config);")
            .unwrap();
        assert_eq!(out, "    build_controls(&label, config);");
    }

    #[test]
    fn test_strip_trailing_ref_argument() {
        let rw = rewriter();
        let out = rw.rewrite("    attach(&grid, &preview);").unwrap();
        assert_eq!(out, "    attach(&grid);");
    }

    #[test]
    fn test_strip_clone_argument() {
        let rw = rewriter();
        let out = rw
            .rewrite("    Handler::new(spin, preview.clone(), config);")
            .unwrap();
        assert_eq!(out, "    Handler::new(spin, config);");
    }

    #[test]
    fn test_strip_self_field_argument() {
        let rw = rewriter();
        let out = rw.rewrite("        redraw(&self.grid, &self.preview)").unwrap();
        assert_eq!(out, "        redraw(&self.grid)");
    }

    #[test]
    fn test_strip_bare_struct_literal_entry() {
        let rw = rewriter();
        let out = rw.rewrite("        Self { label, preview }").unwrap();
        assert_eq!(out, "        Self { label }");
    }

    #[test]
    fn test_strip_leading_bare_entry() {
        let rw = rewriter();
        let out = rw.rewrite("        Self { preview, label }").unwrap();
        assert_eq!(out, "        Self { label }");
    }

    #[test]
    fn test_no_doubled_separator() {
        let rw = rewriter();
        let out = rw.rewrite("    f(a, &preview, b, &preview, c);").unwrap();
        assert!(!out.contains(",,"));
        assert_eq!(out, "    f(a, b, c);");
    }

    #[test]
    fn test_untouched_line_returns_none() {
        let rw = rewriter();
        assert!(rw.rewrite("    let total = items.len();").is_none());
    }

    #[test]
    fn test_similar_identifier_not_stripped() {
        let rw = rewriter();
        assert!(rw.rewrite("    f(&label, &live_preview_panel);").is_none());
    }
}

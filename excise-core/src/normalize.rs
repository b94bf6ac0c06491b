//! Formatting normalization - blank-line collapse.
//!
//! Deletions are the primary source of new blank-line runs, so this pass
//! runs last. It is idempotent: collapsing an already-collapsed file changes
//! nothing.

/// Collapse any run of consecutive blank lines longer than `max_run` down to
/// exactly `max_run` lines (default 1 via the pattern set).
///
/// A line is blank when it contains only whitespace; the first `max_run`
/// lines of a run are kept verbatim, whitespace included. Pre-existing runs
/// within the threshold are untouched.
pub fn collapse_blank_runs(content: &str, max_run: usize) -> String {
    let had_trailing_newline = content.ends_with('\n');
    let mut kept: Vec<&str> = Vec::new();
    let mut run = 0usize;

    for line in content.lines() {
        if line.trim().is_empty() {
            run += 1;
            if run > max_run {
                continue;
            }
        } else {
            run = 0;
        }
        kept.push(line);
    }

    let mut result = kept.join("\n");
    if had_trailing_newline && !result.is_empty() {
        result.push('\n');
    }
    result
}

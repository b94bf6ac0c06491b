//! The per-file transform pipeline.
//!
//! Pure function of one file's content plus the shared immutable pattern
//! set - no I/O, no shared state, parallel-safe. Stages, in order:
//!
//! 1. Line pass: classification, block extent tracking, lookback pruning
//! 2. Reference rewriting on the surviving lines
//! 3. Unused-import pruning over the whole rewritten content
//! 4. Blank-line normalization
//!
//! Stage order matters: import pruning must see the content after all
//! deletions, and normalization must run last because deletions create the
//! blank-line runs it collapses.

use crate::block::BlockTracker;
use crate::classify::{classify, LineVerdict};
use crate::imports::prune_unused_imports;
use crate::normalize::collapse_blank_runs;
use crate::pattern::PatternSet;

/// Result of transforming one file's content.
#[derive(Debug, Clone)]
pub struct Transform {
    /// The rewritten content. Compare against the input to decide whether
    /// anything changed.
    pub content: String,
    /// Ordered, deduplicated change descriptions.
    pub changes: Vec<String>,
}

/// Bookkeeping for an open multi-line block, so an unterminated block at end
/// of input can be rolled back instead of deleting the rest of the file.
struct OpenBlock {
    /// Line indices marked for removal on behalf of this block, including
    /// the opener and any lookback-pruned bindings.
    marks: Vec<usize>,
    /// Length of the change list before this block contributed to it.
    changes_floor: usize,
}

/// Run the full pipeline over one file's content.
pub fn transform(content: &str, patterns: &PatternSet) -> Transform {
    let lines: Vec<&str> = content.lines().collect();
    let had_trailing_newline = content.ends_with('\n');

    let mut keep = vec![true; lines.len()];
    let mut edited: Vec<Option<String>> = vec![None; lines.len()];
    let mut changes: Vec<String> = Vec::new();
    let mut tracker = BlockTracker::new();
    let mut open_block: Option<OpenBlock> = None;

    // Stage 1: line pass.
    for (i, line) in lines.iter().enumerate() {
        if tracker.is_active() {
            keep[i] = false;
            if let Some(block) = open_block.as_mut() {
                block.marks.push(i);
            }
            if tracker.feed(line) {
                open_block = None;
            }
            continue;
        }

        match classify(line, patterns) {
            LineVerdict::Keep => {}
            LineVerdict::Remove { note } => {
                keep[i] = false;
                push_note(&mut changes, note);
            }
            LineVerdict::Edit { line, note } => {
                edited[i] = Some(line);
                push_note(&mut changes, note);
            }
            LineVerdict::BlockOpen { note } => {
                let changes_floor = changes.len();
                let mut marks = vec![i];
                keep[i] = false;
                prune_lookback(i, &lines, &mut keep, &mut marks, &mut changes, patterns);
                push_note(&mut changes, note);

                if !tracker.open(i, line) {
                    open_block = Some(OpenBlock {
                        marks,
                        changes_floor,
                    });
                }
            }
        }
    }

    // Unterminated block at end of input: a formatting anomaly. Fail soft by
    // restoring everything the block claimed; removals recorded before the
    // anomaly stand.
    if tracker.is_active() {
        if let Some(block) = open_block.take() {
            for index in block.marks {
                keep[index] = true;
            }
            changes.truncate(block.changes_floor);
        }
        tracker.reset();
    }

    // Stage 2: reference rewriting on survivors. Lines narrowed down to pure
    // whitespace are dropped.
    let rewriter = patterns.rewriter();
    let mut surviving: Vec<String> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if !keep[i] {
            continue;
        }
        let current = match edited[i].take() {
            Some(edit) => edit,
            None => (*line).to_string(),
        };
        match rewriter.rewrite(&current) {
            Some(narrowed) => {
                if narrowed.trim().is_empty() && !current.trim().is_empty() {
                    continue;
                }
                surviving.push(narrowed);
            }
            None => surviving.push(current),
        }
    }

    let mut result = surviving.join("\n");
    if had_trailing_newline && !result.is_empty() {
        result.push('\n');
    }

    // Stage 3: unused-import pruning over the settled content.
    result = prune_unused_imports(&result, patterns.watch_symbols(), &mut changes);

    // Stage 4: blank-line normalization.
    result = collapse_blank_runs(&result, patterns.max_blank_run());

    // The line pass rejoins with '\n', so a file with CRLF endings would
    // come back rewritten even when nothing matched. When the pipeline
    // changed nothing, return the input verbatim; endings only change on a
    // real edit.
    let mut untouched = lines.join("\n");
    if had_trailing_newline && !untouched.is_empty() {
        untouched.push('\n');
    }
    if result == untouched {
        return Transform {
            content: content.to_string(),
            changes: dedup_preserving_order(changes),
        };
    }

    Transform {
        content: result,
        changes: dedup_preserving_order(changes),
    }
}

/// Scan up to the lookback window of immediately preceding, already-kept
/// lines for setup-only bindings feeding the block that is about to be
/// removed.
///
/// Blank lines are skipped but still consume window; the scan stops at the
/// first non-blank line that matches no lookback pattern, so it never skips
/// over unrelated statements.
fn prune_lookback(
    open_index: usize,
    lines: &[&str],
    keep: &mut [bool],
    marks: &mut Vec<usize>,
    changes: &mut Vec<String>,
    patterns: &PatternSet,
) {
    let floor = open_index.saturating_sub(patterns.lookback_window());
    let mut j = open_index;
    while j > floor {
        j -= 1;
        let line = lines[j];
        if line.trim().is_empty() {
            continue;
        }
        let Some(rule) = patterns
            .lookback_patterns()
            .iter()
            .find(|p| p.regex.is_match(line))
        else {
            break;
        };
        if keep[j] {
            keep[j] = false;
            marks.push(j);
            push_note(changes, rule.note.clone());
        }
    }
}

fn push_note(changes: &mut Vec<String>, note: Option<String>) {
    if let Some(note) = note {
        changes.push(note);
    }
}

/// Deduplicate change descriptions, first occurrence wins.
fn dedup_preserving_order(changes: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    changes
        .into_iter()
        .filter(|change| seen.insert(change.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::ConstructSpec;

    fn patterns() -> PatternSet {
        let mut spec = ConstructSpec::new("preview", "DrawingArea");
        spec.lookback_bindings = vec!["config_clone".into(), "theme_clone".into()];
        spec.to_patterns().unwrap()
    }

    #[test]
    fn test_lookback_removes_adjacent_binding() {
        let input = "\
    let config_clone = config.clone();
    preview.set_draw_func(move |_, ctx, w, h| {
        draw(&config_clone, ctx);
    });
    grid.attach(&label);
";
        let out = transform(input, &patterns());
        assert_eq!(out.content, "    grid.attach(&label);\n");
        assert!(out
            .changes
            .iter()
            .any(|c| c == "Removed config_clone binding"));
    }

    #[test]
    fn test_lookback_skips_blank_but_stops_at_statements() {
        let input = "\
    let config_clone = config.clone();
    let spacing = 4;
    preview.set_draw_func(move |_, ctx, w, h| {
        draw(ctx);
    });
";
        let out = transform(input, &patterns());
        // The unrelated statement blocks the scan; config_clone survives.
        assert!(out.content.contains("let config_clone = config.clone();"));
        assert!(out.content.contains("let spacing = 4;"));
    }

    #[test]
    fn test_lookback_window_bounds_scan() {
        let input = "\
    let theme_clone = theme.clone();
    let a = 1;
    let b = 2;
    let c = 3;
    preview.set_draw_func(move |_, ctx, w, h| {
        draw(ctx);
    });
";
        let out = transform(input, &patterns());
        // theme_clone sits outside the 3-line window.
        assert!(out.content.contains("let theme_clone = theme.clone();"));
    }

    #[test]
    fn test_unterminated_block_is_rolled_back() {
        let input = "\
    let config_clone = config.clone();
    preview.set_draw_func(move |_, ctx, w, h| {
        draw(&config_clone, ctx);
";
        let out = transform(input, &patterns());
        assert_eq!(out.content, input);
        assert!(out.changes.is_empty());
    }

    #[test]
    fn test_removals_before_anomaly_stand() {
        let input = "\
    let preview = DrawingArea::new();
    let unrelated = 1;
    preview.set_draw_func(move |_, ctx, w, h| {
        draw(ctx);
";
        let out = transform(input, &patterns());
        assert!(!out.content.contains("DrawingArea::new"));
        assert!(out.content.contains("preview.set_draw_func"));
        assert!(out.changes.iter().any(|c| c == "Removed preview creation"));
    }

    #[test]
    fn test_changes_deduplicated_in_order() {
        let input = "\
    preview_a.queue_draw();
    let preview = DrawingArea::new();
    preview_b.queue_draw();
";
        let out = transform(input, &patterns());
        assert_eq!(
            out.changes,
            vec![
                "Removed preview.queue_draw()".to_string(),
                "Removed preview creation".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_match_input_is_byte_identical() {
        let input = "fn main() {\n    println!(\"hello\");\n}\n";
        let out = transform(input, &patterns());
        assert_eq!(out.content, input);
        assert!(out.changes.is_empty());
    }

    #[test]
    fn test_crlf_no_match_is_byte_identical() {
        let input = "fn main() {\r\n    println!(\"hello\");\r\n}\r\n";
        let out = transform(input, &patterns());
        assert_eq!(out.content, input);
        assert!(out.changes.is_empty());
    }

    #[test]
    fn test_crlf_with_match_still_removes() {
        let input = "    let preview = DrawingArea::new();\r\n    other();\r\n";
        let out = transform(input, &patterns());
        assert_eq!(out.content, "    other();\n");
    }

    #[test]
    fn test_whitespace_only_rewrite_result_is_dropped() {
        let input = "    f(a);\n    &preview,\n    f(b);\n";
        let out = transform(input, &patterns());
        assert_eq!(out.content, "    f(a);\n    f(b);\n");
    }
}

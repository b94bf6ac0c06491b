//! Output formatting - plaintext and JSON.

use serde_json::json;

use crate::driver::FileOutcome;

fn basename(outcome: &FileOutcome) -> String {
    outcome
        .path()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| outcome.path().display().to_string())
}

/// Prints batch outcomes in plain text format, one section per file.
pub fn print_plain(outcomes: &[FileOutcome]) {
    for outcome in outcomes {
        match outcome {
            FileOutcome::Processed { report } => {
                if report.modified {
                    println!("Modified: {}", basename(outcome));
                    for change in &report.changes {
                        println!("  - {}", change);
                    }
                } else {
                    println!("No changes: {}", basename(outcome));
                }
            }
            FileOutcome::NotFound { .. } => {
                println!("File not found: {}", basename(outcome));
            }
            FileOutcome::Failed { error, .. } => {
                println!("Failed: {} ({})", basename(outcome), error);
            }
        }
    }
    println!();
    println!("Total files modified: {}", modified_count(outcomes));
}

/// Prints batch outcomes in JSON format.
///
/// Falls back to a minimal summary if serialization fails (should never
/// happen with these types, but every path must produce output).
pub fn print_json(outcomes: &[FileOutcome]) {
    let payload = json!({
        "files": outcomes,
        "modified": modified_count(outcomes),
    });
    match serde_json::to_string_pretty(&payload) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{{\"modified\": {}}}", modified_count(outcomes));
        }
    }
}

/// Number of files whose content changed.
pub fn modified_count(outcomes: &[FileOutcome]) -> usize {
    outcomes.iter().filter(|o| o.is_modified()).count()
}

//! CLI output formatting.
//!
//! Every command prints `[command] message` lines, same tags the old build
//! scripts used, so existing log grep habits keep working. Format functions
//! are pure (return `Vec<String>` or `String`) for testability; `main` does
//! the actual printing.

use crate::collections::UpdateOutcome;
use crate::sync::SyncReport;
use crate::translations::Issue;
use std::path::Path;

/// `entry` / `entries` — the one plural the status command needs.
fn entries_word(count: usize) -> &'static str {
    if count == 1 { "entry" } else { "entries" }
}

/// Lines describing a sync run.
pub fn format_sync_report(report: &SyncReport) -> Vec<String> {
    if report.source_missing {
        return vec![
            "[sync-content] Skipping copy because content directory is missing.".to_string(),
        ];
    }
    report
        .targets
        .iter()
        .map(|target| {
            if target.skipped_uploads {
                format!(
                    "[sync-content] Copied content -> {} ({} files, skipped uploads/)",
                    target.path, target.files_copied
                )
            } else {
                format!(
                    "[sync-content] Copied content -> {} ({} files)",
                    target.path, target.files_copied
                )
            }
        })
        .collect()
}

/// One line describing a bulk status edit.
pub fn format_update_outcome(collection: &str, path: &str, outcome: &UpdateOutcome) -> String {
    match outcome {
        UpdateOutcome::NoEntries => {
            format!("[set-status] No entries found in {path}.")
        }
        UpdateOutcome::NoMatches => {
            "[set-status] No entries matched the provided filters.".to_string()
        }
        UpdateOutcome::Updated(count) => format!(
            "[set-status] Updated {count} {collection} {} in {path}.",
            entries_word(*count)
        ),
    }
}

/// Lines describing translation check results.
pub fn format_translation_issues(issues: &[Issue]) -> Vec<String> {
    if issues.is_empty() {
        return vec![
            "[check-translations] All translated pages include the required metadata fields."
                .to_string(),
        ];
    }
    let mut lines = vec![format!(
        "[check-translations] Found {} translation gap{}:",
        issues.len(),
        if issues.len() == 1 { "" } else { "s" }
    )];
    for issue in issues {
        lines.push(format!("- {} -> {}: {}", issue.file, issue.key, issue.message));
    }
    lines
}

/// Lines describing a rewrite run over several files.
pub fn format_rewrite_summary(changed: &[&Path], unchanged: usize) -> Vec<String> {
    let mut lines: Vec<String> = changed
        .iter()
        .map(|path| format!("[rewrite] Rewrote {}", path.display()))
        .collect();
    lines.push(format!(
        "[rewrite] {} file{} changed, {} unchanged",
        changed.len(),
        if changed.len() == 1 { "" } else { "s" },
        unchanged
    ));
    lines
}

//! Content inventory report.
//!
//! Walks every localized page and every JSON collection and produces one
//! machine-readable report of publication state: status, scheduling window,
//! visibility, last touch. The report drives editorial dashboards and is
//! committed under `analytics/`, so its shape is stable:
//!
//! ```json
//! {
//!   "generatedAt": "2026-08-25T10:00:00.000Z",
//!   "totals": { "pages": 24, "collections": 87 },
//!   "pages": [ { "type": "page", "locale": "en", ... } ],
//!   "collections": [ { "type": "products", "id": "argan-oil", ... } ]
//! }
//! ```
//!
//! Reads are permissive: a collection file that is missing or malformed is
//! reported as a warning and skipped. The audit's job is to describe
//! imperfect content, not to refuse it.

use crate::collections;
use crate::config::ToolConfig;
use crate::frontmatter;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The full report written to `analytics/content-audit.json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub generated_at: String,
    pub totals: Totals,
    pub pages: Vec<PageRecord>,
    pub collections: Vec<CollectionRecord>,
}

#[derive(Debug, Serialize)]
pub struct Totals {
    pub pages: usize,
    pub collections: usize,
}

/// One localized Markdown page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub locale: String,
    /// Path relative to the repository root.
    pub file: String,
    pub status: String,
    pub scheduling: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    pub updated_at: String,
}

/// One record from a JSON collection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Option<String>,
    pub status: String,
    pub scheduling: Value,
}

/// Report plus the non-fatal problems hit while building it.
#[derive(Debug)]
pub struct AuditRun {
    pub report: AuditReport,
    pub warnings: Vec<String>,
}

/// Build the audit report for a site repository.
pub fn run(root: &Path, config: &ToolConfig) -> Result<AuditRun, AuditError> {
    let pages = collect_pages(root, config)?;
    let (collection_records, warnings) = collect_collections(root, config);

    let report = AuditReport {
        generated_at: rfc3339_now(),
        totals: Totals {
            pages: pages.len(),
            collections: collection_records.len(),
        },
        pages,
        collections: collection_records,
    };

    Ok(AuditRun { report, warnings })
}

/// Write the report pretty-printed to the configured output path,
/// creating the analytics directory on demand. Returns the path written.
pub fn write_report(
    root: &Path,
    config: &ToolConfig,
    report: &AuditReport,
) -> Result<PathBuf, AuditError> {
    let output = root.join(&config.audit.output);
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut formatted = serde_json::to_string_pretty(report)?;
    formatted.push('\n');
    fs::write(&output, formatted)?;
    Ok(output)
}

/// Every `.md` page under `pages.dir`, one record per locale/file pair.
fn collect_pages(root: &Path, config: &ToolConfig) -> Result<Vec<PageRecord>, AuditError> {
    let pages_dir = root.join(&config.pages.dir);
    let mut records = Vec::new();

    for locale_dir in sorted_dirs(&pages_dir)? {
        let locale = locale_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        for file in sorted_md_files(&locale_dir)? {
            let content = fs::read_to_string(&file)?;
            let front = frontmatter::parse(&content);
            let modified: DateTime<Utc> = fs::metadata(&file)?.modified()?.into();

            records.push(PageRecord {
                kind: "page",
                locale: locale.clone(),
                file: relative_display(root, &file),
                status: status_of(front.get("status")),
                scheduling: scheduling_of(front.get("scheduling")),
                visible: front.get("visible").and_then(Value::as_bool),
                updated_at: modified.to_rfc3339_opts(SecondsFormat::Millis, true),
            });
        }
    }

    Ok(records)
}

/// Every record of every configured collection. Broken files become
/// warnings, never errors.
fn collect_collections(root: &Path, config: &ToolConfig) -> (Vec<CollectionRecord>, Vec<String>) {
    let mut records = Vec::new();
    let mut warnings = Vec::new();

    for (name, spec) in &config.collections {
        let path = collections::file_path(root, spec);
        let document = match collections::load_document(&path) {
            Ok(document) => document,
            Err(e) => {
                warnings.push(format!("failed to read {}: {e}", spec.path));
                continue;
            }
        };

        for entry in collections::entries(&document, &spec.key) {
            records.push(CollectionRecord {
                kind: name.clone(),
                id: collections::entry_id(entry),
                status: status_of(entry.get("status")),
                scheduling: scheduling_of(entry.get("scheduling")),
            });
        }
    }

    (records, warnings)
}

/// `status` field with an `"unknown"` fallback for anything unusable.
fn status_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => "unknown".to_string(),
    }
}

/// `scheduling` field, normalized so absent/empty values read as null.
fn scheduling_of(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Null) | None => Value::Null,
        Some(Value::String(s)) if s.is_empty() => Value::Null,
        Some(v) => v.clone(),
    }
}

fn rfc3339_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn relative_display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

/// Direct subdirectories, sorted by name for deterministic reports.
fn sorted_dirs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// Direct `.md` files, sorted by name.
pub(crate) fn sorted_md_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
        .collect();
    files.sort();
    Ok(files)
}

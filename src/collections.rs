//! JSON collection loading and bulk status edits.
//!
//! A collection is one JSON file holding an ordered array of records under a
//! per-file key — `items` for products and articles, `courses`, `videos`,
//! `trainings` for the rest. Records are CMS documents: this module treats
//! them as opaque objects and only touches the publication fields it owns,
//! `status` and `scheduling`:
//!
//! ```json
//! {
//!   "items": [
//!     {
//!       "id": "argan-oil",
//!       "status": "published",
//!       "scheduling": { "publishAt": "2026-03-01T00:00:00Z" }
//!     }
//!   ]
//! }
//! ```
//!
//! Files are written back pretty-printed with the original key order (the
//! `preserve_order` serde_json feature), so a bulk edit shows up in review
//! as exactly the lines that changed.

use crate::config::{CollectionSpec, ToolConfig};
use serde_json::{Map, Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown collection \"{name}\". Use one of: {}", .valid.join(", "))]
    Unknown { name: String, valid: Vec<String> },
}

/// Fields a record may carry its identity under, in precedence order.
const ID_FIELDS: &[&str] = &["id", "slug", "courseTitle"];

/// Look up a collection by name in the config.
///
/// The error lists the valid names so a typo on the command line is
/// self-explaining.
pub fn resolve<'a>(
    config: &'a ToolConfig,
    name: &str,
) -> Result<&'a CollectionSpec, CollectionError> {
    config
        .collections
        .get(name)
        .ok_or_else(|| CollectionError::Unknown {
            name: name.to_string(),
            valid: config.collections.keys().cloned().collect(),
        })
}

/// Absolute path of a collection file under the repository root.
pub fn file_path(root: &Path, spec: &CollectionSpec) -> PathBuf {
    root.join(&spec.path)
}

/// Read and parse a collection file.
pub fn load_document(path: &Path) -> Result<Value, CollectionError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// The record array under the collection's key. A missing key or a
/// non-array value reads as an empty collection.
pub fn entries<'a>(document: &'a Value, key: &str) -> &'a [Value] {
    document
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// A record's identity: first of `id`, `slug`, `courseTitle` present with a
/// usable value. Numbers are stringified; records without any identity
/// field return `None` and can never match an id filter.
pub fn entry_id(entry: &Value) -> Option<String> {
    ID_FIELDS.iter().find_map(|field| match entry.get(*field) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// One bulk status edit over a collection.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    /// New `status` value for every matched record.
    pub status: String,
    /// Merged into `scheduling.publishAt` when set.
    pub publish_at: Option<String>,
    /// Merged into `scheduling.unpublishAt` when set.
    pub unpublish_at: Option<String>,
    /// Restrict the edit to records with these identities. `None` matches
    /// every record.
    pub ids: Option<Vec<String>>,
}

impl StatusUpdate {
    /// The `scheduling` keys this update writes, if any.
    fn scheduling(&self) -> Option<Map<String, Value>> {
        if self.publish_at.is_none() && self.unpublish_at.is_none() {
            return None;
        }
        let mut scheduling = Map::new();
        if let Some(publish_at) = &self.publish_at {
            scheduling.insert("publishAt".to_string(), json!(publish_at));
        }
        if let Some(unpublish_at) = &self.unpublish_at {
            scheduling.insert("unpublishAt".to_string(), json!(unpublish_at));
        }
        Some(scheduling)
    }

    fn matches(&self, entry: &Value) -> bool {
        match &self.ids {
            None => true,
            Some(ids) => entry_id(entry).is_some_and(|id| ids.contains(&id)),
        }
    }
}

/// Outcome of [`apply_update`], for CLI messaging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateOutcome {
    /// The collection file holds no records — nothing written.
    NoEntries,
    /// Records exist but none matched the id filter — nothing written.
    NoMatches,
    /// This many records were edited and the file was rewritten.
    Updated(usize),
}

/// Apply a status update to the collection file at `path`.
///
/// Matched records get `status` replaced and the update's scheduling keys
/// merged into their existing `scheduling` object; unrelated scheduling
/// keys are preserved. The file is rewritten (pretty, trailing newline)
/// only when at least one record matched.
pub fn apply_update(
    path: &Path,
    key: &str,
    update: &StatusUpdate,
) -> Result<UpdateOutcome, CollectionError> {
    let mut document = load_document(path)?;

    let Some(records) = document.get_mut(key).and_then(Value::as_array_mut) else {
        return Ok(UpdateOutcome::NoEntries);
    };
    if records.is_empty() {
        return Ok(UpdateOutcome::NoEntries);
    }

    let scheduling = update.scheduling();
    let mut updated = 0;

    for record in records.iter_mut() {
        if !update.matches(record) {
            continue;
        }
        let Some(object) = record.as_object_mut() else {
            continue;
        };
        object.insert("status".to_string(), json!(update.status));
        if let Some(scheduling) = &scheduling {
            merge_scheduling(object, scheduling);
        }
        updated += 1;
    }

    if updated == 0 {
        return Ok(UpdateOutcome::NoMatches);
    }

    write_document(path, &document)?;
    Ok(UpdateOutcome::Updated(updated))
}

/// Merge new scheduling keys into a record's existing `scheduling` object,
/// replacing it with a fresh object if it was absent or not an object.
fn merge_scheduling(record: &mut Map<String, Value>, scheduling: &Map<String, Value>) {
    let existing = record
        .entry("scheduling".to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !existing.is_object() {
        *existing = Value::Object(Map::new());
    }
    if let Some(target) = existing.as_object_mut() {
        for (key, value) in scheduling {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Write a collection document pretty-printed with a trailing newline.
pub fn write_document(path: &Path, document: &Value) -> Result<(), CollectionError> {
    let mut formatted = serde_json::to_string_pretty(document)?;
    formatted.push('\n');
    fs::write(path, formatted)?;
    Ok(())
}

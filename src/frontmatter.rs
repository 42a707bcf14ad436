//! Permissive front matter parsing for localized Markdown pages.
//!
//! Pages open with a `---` delimited metadata block:
//!
//! ```text
//! ---
//! metaTitle: "About us"
//! visible: true
//! order: 4
//! ---
//! # Body starts here
//! ```
//!
//! The audit commands need key presence and scalar values, nothing more, so
//! this is deliberately not a YAML parser: one `key: value` pair per line,
//! scalar coercion for booleans and numbers, surrounding double quotes
//! stripped. Lines without a colon (including nested YAML structure) are
//! skipped. A file without a front matter block yields an empty map — a page
//! with no metadata is a reporting concern, not a parse error.
//!
//! Values land in a [`serde_json::Map`] so audit code treats page metadata
//! and JSON collection records uniformly.

use serde_json::{Map, Value};

/// Parse the front matter block of a Markdown document.
///
/// The block must start at the first byte of the document and ends at the
/// next line beginning with `---`. Later duplicate keys win.
pub fn parse(content: &str) -> Map<String, Value> {
    let mut result = Map::new();

    let Some(block) = front_matter_block(content) else {
        return result;
    };

    for line in block.lines() {
        let Some((key, raw_value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        result.insert(key.to_string(), coerce_scalar(raw_value.trim()));
    }

    result
}

/// Extract the raw text between the opening `---` and the closing `---`
/// line. `None` when the document has no front matter.
fn front_matter_block(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("---")?;
    let end = rest.find("\n---")?;
    Some(rest[..end].trim())
}

/// Coerce a raw front matter value to a JSON scalar.
///
/// - empty → `""`
/// - `true` / `false` → boolean
/// - integer or float text → number
/// - `"quoted"` → unquoted string
/// - anything else → string as written
fn coerce_scalar(value: &str) -> Value {
    if value.is_empty() {
        return Value::String(String::new());
    }
    match value {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = value.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(f) = value.parse::<f64>() {
        if f.is_finite() {
            return Value::from(f);
        }
    }
    let mut unquoted = value;
    if let Some(stripped) = unquoted.strip_prefix('"') {
        unquoted = stripped;
    }
    if let Some(stripped) = unquoted.strip_suffix('"') {
        unquoted = stripped;
    }
    Value::String(unquoted.to_string())
}

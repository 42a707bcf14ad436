//! Translation coverage checks for localized pages.
//!
//! The reference locale's page set defines which slugs must exist, and
//! every locale's copy of each page must fill in the required front-matter
//! keys (`metaTitle`, `metaDescription` by default). Anything missing,
//! empty, or unreadable becomes an issue; any issue fails the check, so a
//! CI step can gate merges on locale parity.

use crate::audit::sorted_md_files;
use crate::config::ToolConfig;
use crate::frontmatter;
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One gap found by the check.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// `locale/slug.md` of the offending page.
    pub file: String,
    /// Front-matter key at fault, or `frontmatter` for unreadable files.
    pub key: String,
    pub message: String,
}

/// Check every locale's pages for the required front-matter keys.
///
/// Fails only when the reference locale directory cannot be listed — that
/// means there is no page set to check against. Per-file problems are
/// issues, not errors.
pub fn check(root: &Path, config: &ToolConfig) -> Result<Vec<Issue>, TranslationError> {
    let pages_dir = root.join(&config.pages.dir);
    let reference_dir = pages_dir.join(&config.pages.reference_locale);

    let slugs: Vec<String> = sorted_md_files(&reference_dir)?
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();

    let mut issues = Vec::new();

    for slug in &slugs {
        for locale in &config.pages.locales {
            let file = format!("{locale}/{slug}");
            let path = pages_dir.join(locale).join(slug);

            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    issues.push(Issue {
                        file,
                        key: "frontmatter".to_string(),
                        message: format!("Failed to read file: {e}"),
                    });
                    continue;
                }
            };

            let front = frontmatter::parse(&content);
            for key in &config.pages.required_keys {
                if is_empty_value(front.get(key)) {
                    issues.push(Issue {
                        file: file.clone(),
                        key: key.clone(),
                        message: "Missing or empty value".to_string(),
                    });
                }
            }
        }
    }

    Ok(issues)
}

/// Whether a front-matter value counts as missing: absent, null,
/// whitespace-only string, empty array or object. Booleans and numbers are
/// always present.
fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
        Some(_) => false,
    }
}

//! New page scaffolding from the content template.
//!
//! `new-page --slug argan-story` instantiates
//! `content/templates/page-default.md` into the locale's pages directory,
//! filling the `{{TITLE}}`, `{{SLUG}}` and `{{GENERATED_AT}}` placeholders.
//! Creation is exclusive: an existing page is never overwritten, since the
//! CMS may have edits the scaffold would destroy.

use crate::config::ToolConfig;
use chrono::{SecondsFormat, Utc};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("template not found at {0}")]
    TemplateMissing(PathBuf),
    #[error("page already exists at {0}")]
    PageExists(PathBuf),
}

/// Inputs for one scaffolded page.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub slug: String,
    pub locale: String,
    /// Explicit title; derived from the slug when `None`.
    pub title: Option<String>,
}

/// Derive a display title from a slug: split on dashes, capitalize each
/// segment. `argan-story` → `Argan Story`.
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Create the page file and return its path.
pub fn create_page(
    root: &Path,
    config: &ToolConfig,
    page: &NewPage,
) -> Result<PathBuf, ScaffoldError> {
    let template_path = root.join(&config.pages.template);
    let template = fs::read_to_string(&template_path)
        .map_err(|_| ScaffoldError::TemplateMissing(template_path.clone()))?;

    let title = page
        .title
        .clone()
        .unwrap_or_else(|| title_from_slug(&page.slug));
    let generated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let populated = template
        .replace("{{TITLE}}", &title)
        .replace("{{SLUG}}", &page.slug)
        .replace("{{GENERATED_AT}}", &generated_at);

    let output = root
        .join(&config.pages.dir)
        .join(&page.locale)
        .join(format!("{}.md", page.slug));
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&output)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(ScaffoldError::PageExists(output));
        }
        Err(e) => return Err(e.into()),
    };
    file.write_all(populated.as_bytes())?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{site_config, write_file};
    use tempfile::TempDir;

    const TEMPLATE: &str = "---\nmetaTitle: {{TITLE}}\nslug: {{SLUG}}\ncreated: {{GENERATED_AT}}\n---\n# {{TITLE}}\n";

    fn new_page(slug: &str) -> NewPage {
        NewPage {
            slug: slug.to_string(),
            locale: "en".to_string(),
            title: None,
        }
    }

    #[test]
    fn title_derivation() {
        assert_eq!(title_from_slug("argan-story"), "Argan Story");
        assert_eq!(title_from_slug("about"), "About");
        assert_eq!(title_from_slug("faq-2026-update"), "Faq 2026 Update");
    }

    #[test]
    fn creates_page_with_placeholders_filled() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "content/templates/page-default.md", TEMPLATE);

        let path = create_page(tmp.path(), &site_config(), &new_page("argan-story")).unwrap();
        assert_eq!(path, tmp.path().join("content/pages/en/argan-story.md"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("metaTitle: Argan Story"));
        assert!(text.contains("slug: argan-story"));
        assert!(!text.contains("{{"), "unfilled placeholder left: {text}");
    }

    #[test]
    fn explicit_title_wins() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "content/templates/page-default.md", TEMPLATE);

        let mut page = new_page("argan-story");
        page.title = Some("The Argan Story".to_string());
        let path = create_page(tmp.path(), &site_config(), &page).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("metaTitle: The Argan Story"));
    }

    #[test]
    fn locale_directory_is_created_on_demand() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "content/templates/page-default.md", TEMPLATE);

        let mut page = new_page("about");
        page.locale = "pt".to_string();
        let path = create_page(tmp.path(), &site_config(), &page).unwrap();
        assert!(path.ends_with("content/pages/pt/about.md"));
        assert!(path.is_file());
    }

    #[test]
    fn refuses_to_overwrite_existing_page() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "content/templates/page-default.md", TEMPLATE);
        write_file(tmp.path(), "content/pages/en/about.md", "precious edits");

        let err = create_page(tmp.path(), &site_config(), &new_page("about")).unwrap_err();
        assert!(matches!(err, ScaffoldError::PageExists(_)));
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("content/pages/en/about.md")).unwrap(),
            "precious edits"
        );
    }

    #[test]
    fn missing_template_is_reported() {
        let tmp = TempDir::new().unwrap();
        let err = create_page(tmp.path(), &site_config(), &new_page("about")).unwrap_err();
        assert!(matches!(err, ScaffoldError::TemplateMissing(_)));
    }
}

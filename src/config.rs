//! Tool configuration module.
//!
//! Handles loading and validating `content-ops.toml`. There is exactly one
//! config file, at the site repository root; every field has a stock default
//! so the file is optional and may be sparse.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content_root = "content"      # Source content directory
//!
//! [[sync.targets]]              # Build output mirrors of content/
//! path = "public/content"
//!
//! [[sync.targets]]
//! path = "site/content"
//! skip_uploads = true           # Exclude uploads/, leave a placeholder
//!
//! [collections.products]       # JSON collection files
//! path = "content/products/index.json"
//! key = "items"                 # Array key inside the file
//!
//! [pages]
//! dir = "content/pages"         # One subdirectory per locale
//! locales = ["en", "pt", "es"]
//! reference_locale = "en"       # Defines the expected page set
//! required_keys = ["metaTitle", "metaDescription"]
//! template = "content/templates/page-default.md"
//!
//! [serve]
//! port = 8888                   # Log/analytics endpoint port
//!
//! [audit]
//! output = "analytics/content-audit.json"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Filename of the tool config, looked up in the site repository root.
pub const CONFIG_FILENAME: &str = "content-ops.toml";

/// Tool configuration loaded from `content-ops.toml`.
///
/// All fields have stock defaults matching the site's conventional layout.
/// User config files need only specify overrides. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Source content directory, relative to the repository root.
    pub content_root: String,
    /// Content mirroring settings.
    pub sync: SyncConfig,
    /// JSON collection files, keyed by collection name.
    pub collections: BTreeMap<String, CollectionSpec>,
    /// Localized Markdown page settings.
    pub pages: PagesConfig,
    /// Log/analytics endpoint settings.
    pub serve: ServeConfig,
    /// Content audit settings.
    pub audit: AuditConfig,
}

fn default_content_root() -> String {
    "content".to_string()
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            content_root: default_content_root(),
            sync: SyncConfig::default(),
            collections: stock_collections(),
            pages: PagesConfig::default(),
            serve: ServeConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl ToolConfig {
    /// Validate config values that have no sensible fallback.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pages.locales.is_empty() {
            return Err(ConfigError::Validation(
                "pages.locales must not be empty".into(),
            ));
        }
        if !self.pages.locales.contains(&self.pages.reference_locale) {
            return Err(ConfigError::Validation(format!(
                "pages.reference_locale \"{}\" is not in pages.locales",
                self.pages.reference_locale
            )));
        }
        if self.serve.port == 0 {
            return Err(ConfigError::Validation("serve.port must be non-zero".into()));
        }
        if self.sync.targets.is_empty() {
            return Err(ConfigError::Validation(
                "sync.targets must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Content mirroring settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Directories that receive a full copy of the content tree.
    pub targets: Vec<SyncTarget>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            targets: vec![
                SyncTarget {
                    path: "public/content".to_string(),
                    skip_uploads: false,
                },
                SyncTarget {
                    path: "site/content".to_string(),
                    skip_uploads: true,
                },
            ],
        }
    }
}

/// One mirror destination for the content tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncTarget {
    /// Destination directory, relative to the repository root.
    pub path: String,
    /// Exclude the top-level `uploads/` subtree and write a placeholder
    /// README/.gitkeep pair instead. Keeps binary assets out of mirrors
    /// that land in pull requests.
    #[serde(default)]
    pub skip_uploads: bool,
}

/// Location of one JSON collection file and the key its record array
/// lives under.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionSpec {
    /// Collection file path, relative to the repository root.
    pub path: String,
    /// Top-level key holding the record array (e.g. `items`, `courses`).
    pub key: String,
}

fn stock_collections() -> BTreeMap<String, CollectionSpec> {
    let mut map = BTreeMap::new();
    let mut add = |name: &str, path: &str, key: &str| {
        map.insert(
            name.to_string(),
            CollectionSpec {
                path: path.to_string(),
                key: key.to_string(),
            },
        );
    };
    add("products", "content/products/index.json", "items");
    add("articles", "content/articles/index.json", "items");
    add("courses", "content/courses.json", "courses");
    add("videos", "content/videos.json", "videos");
    add("training", "content/training.json", "trainings");
    map
}

/// Localized Markdown page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagesConfig {
    /// Pages directory, containing one subdirectory per locale.
    pub dir: String,
    /// Locales the site publishes.
    pub locales: Vec<String>,
    /// Locale whose page set defines the expected slugs for translation
    /// checks, and the default locale for new pages.
    pub reference_locale: String,
    /// Front-matter keys every translated page must fill in.
    pub required_keys: Vec<String>,
    /// Template file for new pages.
    pub template: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            dir: "content/pages".to_string(),
            locales: vec!["en".to_string(), "pt".to_string(), "es".to_string()],
            reference_locale: "en".to_string(),
            required_keys: vec!["metaTitle".to_string(), "metaDescription".to_string()],
            template: "content/templates/page-default.md".to_string(),
        }
    }
}

/// Log/analytics endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    /// TCP port the endpoint server binds on localhost.
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self { port: 8888 }
    }
}

/// Content audit settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Report output path, relative to the repository root.
    pub output: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            output: "analytics/content-audit.json".to_string(),
        }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Load config from `content-ops.toml` in the given directory.
///
/// Stock defaults are used when the file is absent. Unknown keys are
/// rejected and the result is validated.
pub fn load_config(root: &Path) -> Result<ToolConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    let config = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        toml::from_str(&content)?
    } else {
        ToolConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `content-ops.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# content-ops configuration
# =========================
#
# Place this file at the site repository root as content-ops.toml.
# Every value below is the stock default - delete anything you don't
# need to override.

# Source content directory.
content_root = "content"

# -----------------------------------------------------------------------------
# Content mirrors - `content-ops sync` copies content/ into each target.
# -----------------------------------------------------------------------------

[[sync.targets]]
path = "public/content"

[[sync.targets]]
path = "site/content"
# Exclude the uploads/ subtree and leave a README + .gitkeep placeholder.
# Keeps binary assets out of mirrors that land in pull requests.
skip_uploads = true

# -----------------------------------------------------------------------------
# JSON collections - ordered record arrays edited by `set-status` and
# reported by `audit`. `key` names the array inside the file.
# -----------------------------------------------------------------------------

[collections.products]
path = "content/products/index.json"
key = "items"

[collections.articles]
path = "content/articles/index.json"
key = "items"

[collections.courses]
path = "content/courses.json"
key = "courses"

[collections.videos]
path = "content/videos.json"
key = "videos"

[collections.training]
path = "content/training.json"
key = "trainings"

# -----------------------------------------------------------------------------
# Localized Markdown pages.
# -----------------------------------------------------------------------------

[pages]
dir = "content/pages"
locales = ["en", "pt", "es"]
# The reference locale's page set defines the slugs every other locale
# must provide; it is also the default locale for `new-page`.
reference_locale = "en"
# Front-matter keys `check-translations` requires to be non-empty.
required_keys = ["metaTitle", "metaDescription"]
template = "content/templates/page-default.md"

# -----------------------------------------------------------------------------
# Log/analytics endpoints (`content-ops serve`).
# -----------------------------------------------------------------------------

[serve]
port = 8888

# -----------------------------------------------------------------------------
# Content audit report (`content-ops audit`).
# -----------------------------------------------------------------------------

[audit]
output = "analytics/content-audit.json"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        ToolConfig::default().validate().unwrap();
    }

    #[test]
    fn stock_collections_cover_all_five() {
        let config = ToolConfig::default();
        for name in ["products", "articles", "courses", "videos", "training"] {
            assert!(config.collections.contains_key(name), "missing {name}");
        }
        assert_eq!(config.collections["training"].key, "trainings");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.content_root, "content");
        assert_eq!(config.serve.port, 8888);
    }

    #[test]
    fn sparse_file_overrides_only_named_keys() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "content_root = \"data\"\n\n[serve]\nport = 9000\n",
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.content_root, "data");
        assert_eq!(config.serve.port, 9000);
        // untouched sections keep stock values
        assert_eq!(config.pages.reference_locale, "en");
        assert_eq!(config.sync.targets.len(), 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILENAME), "contnet_root = \"x\"\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn reference_locale_must_be_listed() {
        let mut config = ToolConfig::default();
        config.pages.reference_locale = "fr".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config = ToolConfig::default();
        config.serve.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn stock_config_toml_is_valid_and_matches_defaults() {
        let parsed: ToolConfig = toml::from_str(stock_config_toml()).unwrap();
        parsed.validate().unwrap();
        let defaults = ToolConfig::default();
        assert_eq!(parsed.content_root, defaults.content_root);
        assert_eq!(parsed.pages.locales, defaults.pages.locales);
        assert_eq!(parsed.collections.len(), defaults.collections.len());
        assert_eq!(parsed.audit.output, defaults.audit.output);
    }
}

//! Content mirroring into build output directories.
//!
//! The build serves `content/` from several places — the public asset
//! directory, the visual-editor site tree — and each must be an exact copy
//! of the source at build time. A sync is destructive on the target side:
//! remove, recreate, copy. Partial targets from an interrupted earlier run
//! can therefore never leak stale files into a build.
//!
//! Targets flagged `skip_uploads` exclude the top-level `uploads/` subtree
//! (binary assets) and get a README + `.gitkeep` placeholder instead, so the
//! mirrored tree stays lightweight in pull requests while the directory
//! remains tracked.
//!
//! A missing source directory is not an error: build steps run on checkouts
//! that may not have content yet, and the sync must not fail the build.

use crate::config::{SyncTarget, ToolConfig};
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Directory name excluded by `skip_uploads` targets.
pub const UPLOADS_DIRNAME: &str = "uploads";

const PLACEHOLDER_README: &str = "\
# Upload mirror placeholder

Binary assets are intentionally excluded from this mirror to keep pull
requests lightweight.

- Canonical files remain in content/uploads/ and are served in production.
- Leave this README (and the empty .gitkeep) in place so the folder stays
  tracked.
";

/// What one sync run did, for CLI reporting.
#[derive(Debug)]
pub struct SyncReport {
    /// Set when the source directory does not exist; no targets were
    /// written.
    pub source_missing: bool,
    /// One entry per configured target, in config order.
    pub targets: Vec<TargetReport>,
}

/// Copy statistics for a single target.
#[derive(Debug)]
pub struct TargetReport {
    /// Target directory, relative to the repository root.
    pub path: String,
    /// Number of files copied (directories excluded).
    pub files_copied: usize,
    /// Whether the uploads subtree was excluded and replaced by the
    /// placeholder.
    pub skipped_uploads: bool,
}

/// Mirror the content tree into every configured target.
pub fn sync_all(root: &Path, config: &ToolConfig) -> Result<SyncReport, SyncError> {
    let source = root.join(&config.content_root);
    if !source.is_dir() {
        return Ok(SyncReport {
            source_missing: true,
            targets: Vec::new(),
        });
    }

    let mut targets = Vec::with_capacity(config.sync.targets.len());
    for target in &config.sync.targets {
        targets.push(sync_target(&source, root, target)?);
    }

    Ok(SyncReport {
        source_missing: false,
        targets,
    })
}

/// Mirror the source tree into one target directory.
fn sync_target(source: &Path, root: &Path, target: &SyncTarget) -> Result<TargetReport, SyncError> {
    let destination = root.join(&target.path);

    remove_existing(&destination)?;
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }

    let files_copied = copy_tree(source, &destination, target.skip_uploads)?;

    if target.skip_uploads {
        write_uploads_placeholder(&destination)?;
    }

    Ok(TargetReport {
        path: target.path.clone(),
        files_copied,
        skipped_uploads: target.skip_uploads,
    })
}

fn remove_existing(destination: &Path) -> Result<(), SyncError> {
    match fs::remove_dir_all(destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Recursively copy `source` into `destination`, optionally excluding the
/// top-level uploads directory. Returns the number of files copied.
fn copy_tree(source: &Path, destination: &Path, skip_uploads: bool) -> Result<usize, SyncError> {
    let mut files_copied = 0;

    let walker = WalkDir::new(source).into_iter().filter_entry(|entry| {
        // depth 1 is a direct child of the source root
        !(skip_uploads
            && entry.depth() == 1
            && entry.file_type().is_dir()
            && entry.file_name() == OsStr::new(UPLOADS_DIRNAME))
    });

    for entry in walker {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .expect("walked path is always under source");
        let dest_path = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)?;
        } else {
            fs::copy(entry.path(), &dest_path)?;
            files_copied += 1;
        }
    }

    Ok(files_copied)
}

/// Placeholder pair keeping an excluded uploads directory tracked.
fn write_uploads_placeholder(destination: &Path) -> Result<(), SyncError> {
    let uploads_dir = destination.join(UPLOADS_DIRNAME);
    fs::create_dir_all(&uploads_dir)?;
    fs::write(uploads_dir.join("README.txt"), PLACEHOLDER_README)?;

    let gitkeep = uploads_dir.join(".gitkeep");
    if !gitkeep.exists() {
        fs::write(&gitkeep, "")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{site_config, write_file};
    use tempfile::TempDir;

    fn seed_content(root: &Path) {
        write_file(root, "content/pages/en/about.md", "---\nstatus: ok\n---\n");
        write_file(root, "content/products/index.json", "{\"items\": []}\n");
        write_file(root, "content/uploads/logo.png", "binary-ish");
        write_file(root, "content/uploads/deep/photo.jpg", "more");
    }

    #[test]
    fn mirrors_into_every_target() {
        let tmp = TempDir::new().unwrap();
        seed_content(tmp.path());

        let report = sync_all(tmp.path(), &site_config()).unwrap();
        assert!(!report.source_missing);
        assert_eq!(report.targets.len(), 2);

        // full mirror includes uploads
        assert!(tmp.path().join("public/content/pages/en/about.md").is_file());
        assert!(tmp.path().join("public/content/uploads/logo.png").is_file());

        // skip_uploads mirror drops it and writes the placeholder
        assert!(tmp.path().join("site/content/pages/en/about.md").is_file());
        assert!(!tmp.path().join("site/content/uploads/logo.png").exists());
        assert!(tmp.path().join("site/content/uploads/README.txt").is_file());
        assert!(tmp.path().join("site/content/uploads/.gitkeep").is_file());
    }

    #[test]
    fn file_counts_reflect_exclusion() {
        let tmp = TempDir::new().unwrap();
        seed_content(tmp.path());

        let report = sync_all(tmp.path(), &site_config()).unwrap();
        let full = &report.targets[0];
        let trimmed = &report.targets[1];
        assert_eq!(full.files_copied, 4);
        assert_eq!(trimmed.files_copied, 2);
        assert!(trimmed.skipped_uploads);
    }

    #[test]
    fn stale_target_files_are_removed() {
        let tmp = TempDir::new().unwrap();
        seed_content(tmp.path());
        write_file(tmp.path(), "public/content/stale.json", "{}");

        sync_all(tmp.path(), &site_config()).unwrap();
        assert!(!tmp.path().join("public/content/stale.json").exists());
    }

    #[test]
    fn missing_source_is_reported_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let report = sync_all(tmp.path(), &site_config()).unwrap();
        assert!(report.source_missing);
        assert!(report.targets.is_empty());
        assert!(!tmp.path().join("public").exists());
    }

    #[test]
    fn nested_uploads_dirs_are_not_excluded() {
        // only the top-level uploads/ is special
        let tmp = TempDir::new().unwrap();
        seed_content(tmp.path());
        write_file(tmp.path(), "content/pages/uploads/nested.md", "x");

        sync_all(tmp.path(), &site_config()).unwrap();
        assert!(tmp.path().join("site/content/pages/uploads/nested.md").is_file());
    }

    #[test]
    fn rerun_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        seed_content(tmp.path());

        sync_all(tmp.path(), &site_config()).unwrap();
        let report = sync_all(tmp.path(), &site_config()).unwrap();
        assert_eq!(report.targets[0].files_copied, 4);
        assert!(tmp.path().join("site/content/uploads/README.txt").is_file());
    }
}

//! Shared test utilities for the content-ops test suite.
//!
//! Tests build throwaway site repositories inside a `TempDir` instead of
//! sharing committed fixtures: each test writes exactly the files its
//! scenario needs, so there is no hidden coupling between test cases.

use crate::config::ToolConfig;
use std::path::{Path, PathBuf};

/// Write a file under `root`, creating parent directories. Returns the
/// full path.
pub fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

/// Stock config — the conventional site layout every test repository
/// follows.
pub fn site_config() -> ToolConfig {
    ToolConfig::default()
}

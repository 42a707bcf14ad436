//! # content-ops
//!
//! Content operations toolkit for a CMS-driven marketing site. The site's
//! editorial data lives on disk — localized Markdown pages with front matter
//! and JSON collection files — and this binary is the glue that keeps it
//! consistent: mirroring `content/` into build output directories, bulk
//! editing publication status, auditing metadata, scaffolding new pages, and
//! rewriting visual-editor field-path attributes in component source.
//!
//! # One Binary, One Subcommand Per Job
//!
//! Each job used to be an independent script invoked by a build step or a
//! developer. That property is preserved: subcommands share no state and
//! compose only through the filesystem. The pipeline ordering constraint is
//! exactly one — `sync` must run before a build that serves the mirrored
//! content.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`rewrite`] | field-path attribute rewriter — quote/brace-aware scanner |
//! | [`sync`] | mirrors `content/` into build targets, uploads exclusion |
//! | [`collections`] | JSON collection loading and bulk status/scheduling edits |
//! | [`audit`] | content inventory report over pages and collections |
//! | [`translations`] | required front-matter keys across locales |
//! | [`frontmatter`] | permissive `key: value` front matter parser |
//! | [`scaffold`] | new page creation from the content template |
//! | [`serve`] | log/analytics HTTP endpoints (tiny_http) |
//! | [`config`] | `content-ops.toml` loading, defaults, validation |
//! | [`output`] | CLI output formatting — tagged, testable report lines |
//!
//! # Design Decisions
//!
//! ## Filesystem Is the Source of Truth
//!
//! No database and no CMS API calls: the tool reads and writes the same
//! files the CMS commits to git. Every command is idempotent or refuses to
//! clobber (page scaffolding uses exclusive create), so re-running a build
//! step is always safe.
//!
//! ## Key Order Preservation
//!
//! Collection files are hand-reviewed in pull requests. `serde_json` runs
//! with `preserve_order` so a bulk status edit produces a minimal diff
//! instead of alphabetizing every record.
//!
//! ## Permissive Reads, Strict Writes
//!
//! Audit commands tolerate broken inputs (a malformed collection file is a
//! warning, not an abort) because their job is reporting on imperfect
//! content. Anything that writes — `set-status`, `sync`, `new-page`,
//! `rewrite` — fails hard on the first error rather than leaving a
//! half-edited tree.

pub mod audit;
pub mod collections;
pub mod config;
pub mod frontmatter;
pub mod output;
pub mod rewrite;
pub mod scaffold;
pub mod serve;
pub mod sync;
pub mod translations;

#[cfg(test)]
pub(crate) mod test_helpers;

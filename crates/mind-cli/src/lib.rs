//! # mind-cli — Thought Entry Validation CLI
//!
//! Provides the `mind` command-line interface used in CI to check every
//! thought entry under `thoughts/entries/` against
//! `MIND_CI_Validation/schema/thought_entry.schema.yml`.
//!
//! ```bash
//! mind validate
//! mind validate thoughts/entries/2024-03-01-caches.md
//! mind validate --naive-yaml --required-only
//! ```
//!
//! ## Output
//!
//! One line per entry on standard output (`✅ <file> valid.` or
//! `❌ <file> invalid: <message>`), preceded by a warning line for every
//! fallback engaged. Exit status is 0 when every entry is valid, 1 when
//! any entry is invalid, 2 on an operational error.

pub mod validate;

use std::path::{Path, PathBuf};

/// Entries directory, relative to the repository root.
pub const ENTRIES_RELATIVE_DIR: &str = "thoughts/entries";

/// Resolve a path that may be relative to the repository root.
///
/// Absolute paths are returned as-is. A relative path that exists under
/// `repo_root` resolves there; otherwise it is left relative to the current
/// directory.
pub fn resolve_path(path: &Path, repo_root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let repo_relative = repo_root.join(path);
    if repo_relative.exists() {
        repo_relative
    } else {
        path.to_path_buf()
    }
}

/// Walk up from `start` to the first directory containing `thoughts/entries`.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join(ENTRIES_RELATIVE_DIR).is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

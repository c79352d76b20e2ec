//! Changed-file collection for PR-scoped runs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

pub const DEFAULT_BASE_REF: &str = "origin/main";
pub const DEFAULT_HEAD_REF: &str = "HEAD";
pub const BASE_REF_ENV: &str = "PR_BASE_REF";
pub const HEAD_REF_ENV: &str = "PR_HEAD_REF";

/// Extensions a changed file needs to be a candidate
const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// A `base...head` diff range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRange {
    pub base: String,
    pub head: String,
}

impl DiffRange {
    pub fn new(base: impl Into<String>, head: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            head: head.into(),
        }
    }

    /// `PR_BASE_REF`/`PR_HEAD_REF` when set and non-empty, else `origin/main`/`HEAD`
    pub fn from_env() -> Self {
        let var = |name: &str, default: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self::new(
            var(BASE_REF_ENV, DEFAULT_BASE_REF),
            var(HEAD_REF_ENV, DEFAULT_HEAD_REF),
        )
    }
}

impl std::fmt::Display for DiffRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}...{}", self.base, self.head)
    }
}

/// Root-relative source files changed in `range` that still exist.
/// Any git failure is logged and yields an empty set.
pub fn changed_source_files(root: &Path, range: &DiffRange) -> BTreeSet<PathBuf> {
    let output = Command::new("git")
        .args(["diff", "--name-only", "--relative"])
        .arg(range.to_string())
        .current_dir(root)
        .output();

    let output = match output {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            warn!(
                "git diff {} failed: {}",
                range,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return BTreeSet::new();
        }
        Err(e) => {
            warn!("Failed to run git diff (is git installed?): {}", e);
            return BTreeSet::new();
        }
    };

    let files = filter_source_files(root, &String::from_utf8_lossy(&output.stdout));
    debug!("{} changed source files in {}", files.len(), range);
    files
}

/// Keep listed paths that are script sources and exist under `root`
pub fn filter_source_files(root: &Path, listing: &str) -> BTreeSet<PathBuf> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
        })
        .filter(|path| root.join(path).is_file())
        .collect()
}

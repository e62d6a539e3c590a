// ABOUTME: Path patterns that are never transferred to remote hosts.
// ABOUTME: Matching follows rsync/gitignore rules via the ignore crate.

use super::SyncError;
use ignore::WalkBuilder;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};

/// Patterns excluded from every deployment sync.
pub const DEPLOY_EXCLUDES: [&str; 8] = [
    ".DS_Store",
    ".git",
    "*.pyc",
    "*.example",
    "*.db",
    "local_settings.py",
    "fabfile.py",
    "bootstrap.py",
];

/// A set of exclude patterns. A pattern without a slash matches a file or
/// directory name at any depth; an excluded directory hides its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludeSet {
    patterns: Vec<String>,
}

impl Default for ExcludeSet {
    fn default() -> Self {
        Self::new(DEPLOY_EXCLUDES)
    }
}

impl ExcludeSet {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    fn matcher(&self, root: &Path) -> Result<Gitignore, SyncError> {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in &self.patterns {
            builder
                .add_line(None, pattern)
                .map_err(|e| SyncError::Pattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
        }
        builder.build().map_err(|e| SyncError::Pattern {
            pattern: self.patterns.join(" "),
            message: e.to_string(),
        })
    }

    /// Whether a path relative to the sync root would be skipped.
    ///
    /// A path inside an excluded directory counts as excluded.
    pub fn is_excluded(&self, relative: &Path, is_dir: bool) -> Result<bool, SyncError> {
        let matcher = self.matcher(Path::new(""))?;
        Ok(matcher
            .matched_path_or_any_parents(relative, is_dir)
            .is_ignore())
    }

    /// Regular files under `root` that a sync would transfer, relative to `root` and sorted.
    pub fn transfer_set(&self, root: &Path) -> Result<Vec<PathBuf>, SyncError> {
        if !root.is_dir() {
            return Err(SyncError::LocalDirMissing(root.to_path_buf()));
        }

        let matcher = self.matcher(root)?;
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                entry.depth() == 0
                    || !matcher
                        .matched(entry.path(), entry.file_type().is_some_and(|t| t.is_dir()))
                        .is_ignore()
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| SyncError::Walk(e.to_string()))?;
            // rsync without -l skips symlinks, so they are never transferred.
            if entry.file_type().is_some_and(|t| t.is_dir() || t.is_symlink()) {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(root) {
                files.push(relative.to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }
}

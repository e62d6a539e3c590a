// ABOUTME: One-way transfer of the local code tree to remote hosts.
// ABOUTME: Defines the synchronizer seam, sync requests, and the rsync implementation.

mod error;
mod exclude;
mod rsync;

pub use error::SyncError;
pub use exclude::{DEPLOY_EXCLUDES, ExcludeSet};
pub use rsync::RsyncSynchronizer;

use crate::types::RemotePath;
use async_trait::async_trait;
use std::path::PathBuf;

/// Default rsync flags: permissions, times, human-readable, recursive, verbose, compressed.
pub const DEFAULT_RSYNC_FLAGS: &str = "-pthrvz";

/// What to transfer and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    pub local_dir: PathBuf,
    pub remote_dir: RemotePath,
    pub excludes: ExcludeSet,
    /// Remove remote files that no longer exist locally.
    pub delete: bool,
    pub extra_opts: Vec<String>,
}

impl SyncRequest {
    pub fn new(local_dir: impl Into<PathBuf>, remote_dir: RemotePath) -> Self {
        Self {
            local_dir: local_dir.into(),
            remote_dir,
            excludes: ExcludeSet::default(),
            delete: false,
            extra_opts: Vec::new(),
        }
    }

    pub fn extra_opt(mut self, opt: impl Into<String>) -> Self {
        self.extra_opts.push(opt.into());
        self
    }

    /// Local source with a trailing slash so rsync copies the directory's contents.
    pub fn source_arg(&self) -> String {
        let source = self.local_dir.display().to_string();
        if source.ends_with('/') {
            source
        } else {
            format!("{source}/")
        }
    }
}

/// Transfers a local tree to every host of the selected environment.
#[async_trait]
pub trait FileSynchronizer: Send + Sync {
    async fn sync(&self, request: &SyncRequest) -> Result<(), SyncError>;
}

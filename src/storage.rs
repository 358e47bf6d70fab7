use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::config::StorageConfig;
use crate::mapping::{PropertyMapping, UploadTarget};

/// Physical file store behind the remove handler.
///
/// Deletion failure policy belongs to the backend; the handler propagates
/// whatever error it returns and never retries.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Delete the file currently referenced by `mapping` for `target`.
    async fn remove(&self, target: &dyn UploadTarget, mapping: &dyn PropertyMapping)
    -> Result<()>;
}

/// Stores uploads under a local directory tree:
/// `<upload_root>/<upload_destination>/<file_name>`.
pub struct FilesystemStorage {
    upload_root: PathBuf,
    prune_empty_dirs: bool,
}

impl FilesystemStorage {
    pub fn new(upload_root: impl Into<PathBuf>) -> Self {
        Self {
            upload_root: upload_root.into(),
            prune_empty_dirs: false,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            upload_root: config.upload_root.clone(),
            prune_empty_dirs: config.prune_empty_dirs,
        }
    }

    fn resolve_path(&self, mapping: &dyn PropertyMapping, file_name: &str) -> PathBuf {
        self.upload_root
            .join(mapping.upload_destination())
            .join(file_name)
    }
}

#[async_trait]
impl StorageBackend for FilesystemStorage {
    async fn remove(
        &self,
        target: &dyn UploadTarget,
        mapping: &dyn PropertyMapping,
    ) -> Result<()> {
        let Some(file_name) = mapping.file_name(target) else {
            return Ok(());
        };

        let path = self.resolve_path(mapping, &file_name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("🗑️  Deleted upload: {}", path.display());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // already gone; removal is idempotent
                warn!("Upload already missing: {}", path.display());
                return Ok(());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to delete upload: {}", path.display()));
            }
        }

        if self.prune_empty_dirs {
            if let Some(dir) = path.parent() {
                // remove_dir refuses non-empty directories, which is the guard we rely on
                if dir != self.upload_root && tokio::fs::remove_dir(dir).await.is_ok() {
                    debug!("Pruned empty upload directory: {}", dir.display());
                }
            }
        }

        Ok(())
    }
}

use std::env;
use std::path::PathBuf;

/// Configuration for the filesystem storage backend
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory uploads live under (default: "./uploads")
    pub upload_root: PathBuf,

    /// Remove a destination directory once its last upload is deleted
    /// (default: false)
    pub prune_empty_dirs: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_root: PathBuf::from("./uploads"),
            prune_empty_dirs: false,
        }
    }
}

impl StorageConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            upload_root: env::var("UPLOAD_ROOT")
                .map(PathBuf::from)
                .unwrap_or(default.upload_root),

            prune_empty_dirs: env::var("PRUNE_EMPTY_DIRS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(default.prune_empty_dirs),
        }
    }
}

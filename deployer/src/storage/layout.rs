//! Storage layout configuration

use std::path::PathBuf;

use crate::filesys::file::File;

/// Where settings and release handles live
#[derive(Debug, Clone)]
pub struct StorageLayout {
    /// Base directory for all storage
    pub base_dir: PathBuf,
}

impl StorageLayout {
    /// Create a new storage layout
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Get the settings file path
    pub fn settings_file(&self) -> File {
        File::new(self.base_dir.join("settings.json"))
    }

    /// Get the release handle file path
    pub fn release_file(&self) -> File {
        File::new(self.base_dir.join("release.json"))
    }
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self::new(".appdeploy")
    }
}

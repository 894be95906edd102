//! Run configuration.
//!
//! The only user-facing settings are the store path and the archive path.
//! Everything else here is a fixed constant of the Stocard store layout or
//! the Catima import format.
//!
//! # Layout
//!
//! - **Store**: `sync_db.sqlite` in the current directory unless given
//! - **Archive**: `output.zip` in the current directory unless given
//! - **Working directory**: `<system temp dir>/stocatima`, left in place
//!   after the run (including after a fatal error)

use std::path::{Path, PathBuf};

/// Store path used when no positional arguments are given.
pub const DEFAULT_STORE_PATH: &str = "sync_db.sqlite";

/// Archive path used when no positional arguments are given.
pub const DEFAULT_OUTPUT_PATH: &str = "output.zip";

/// Name of the working directory created under the system temp dir.
pub const WORK_DIR_NAME: &str = "stocatima";

/// Content type tagging loyalty card rows in `synced_resources`.
pub const LOYALTY_CARD_CONTENT_TYPE: &str = "application/x.stocard.loyaltycard+json";

/// Settings for a single migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    /// SQLite store to read from.
    pub store_path: PathBuf,
    /// ZIP archive to write.
    pub output_path: PathBuf,
    /// Directory collecting `catima.csv` and the extracted images.
    pub work_dir: PathBuf,
}

impl MigrationConfig {
    /// Build a config from optional CLI paths, falling back to the defaults.
    #[must_use]
    pub fn new(store_path: Option<&Path>, output_path: Option<&Path>) -> Self {
        Self {
            store_path: store_path
                .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), Path::to_path_buf),
            output_path: output_path
                .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH), Path::to_path_buf),
            work_dir: default_work_dir(),
        }
    }

    /// Override the working directory.
    ///
    /// Tests use this to keep runs isolated from each other.
    #[must_use]
    pub fn with_work_dir(mut self, work_dir: PathBuf) -> Self {
        self.work_dir = work_dir;
        self
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// `<system temp dir>/stocatima`.
#[must_use]
pub fn default_work_dir() -> PathBuf {
    std::env::temp_dir().join(WORK_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MigrationConfig::default();
        assert_eq!(config.store_path, PathBuf::from("sync_db.sqlite"));
        assert_eq!(config.output_path, PathBuf::from("output.zip"));
        assert!(config.work_dir.ends_with("stocatima"));
    }

    #[test]
    fn test_explicit_paths() {
        let config = MigrationConfig::new(
            Some(Path::new("/data/stocard.sqlite")),
            Some(Path::new("/tmp/catima.zip")),
        );
        assert_eq!(config.store_path, PathBuf::from("/data/stocard.sqlite"));
        assert_eq!(config.output_path, PathBuf::from("/tmp/catima.zip"));
    }

    #[test]
    fn test_with_work_dir() {
        let config = MigrationConfig::default().with_work_dir(PathBuf::from("/scratch"));
        assert_eq!(config.work_dir, PathBuf::from("/scratch"));
    }
}

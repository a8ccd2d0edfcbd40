//! Streamer configuration
//!
//! Configuration for one save folder: where files live, how many backups
//! to keep, whether files are framed and validated, and which values to
//! hand out when nothing usable is on disk.
//!
//! A config is built once, validated, and moved into the streamer. It is
//! never mutated afterwards.

use std::path::{Path, PathBuf};

use savestate_core::{Savestate, SchemaVersion};

use crate::format::MAX_FRAME_VERSION;
use crate::paths::{SavePaths, DEFAULT_FILE_STEM};

/// Default number of backup slots
pub const DEFAULT_BACKUP_COUNT: usize = 3;

/// Streamer configuration
#[derive(Debug, Clone)]
pub struct StreamerConfig<S> {
    /// Save folder
    pub folder: PathBuf,
    /// Base name of every file in the folder (default: "savestate")
    pub file_stem: String,
    /// Number of rotating backup slots (0 disables backups)
    pub backup_count: usize,
    /// Frame payloads on save and validate frames on load
    pub validate_files: bool,
    /// Write a human-readable export next to the main file on save
    pub debug_mode: bool,
    /// Returned when nothing usable can be loaded
    pub fallback: S,
    /// Returned unconditionally when `use_test_savestate` is set
    pub test_savestate: Option<S>,
    /// Bypass all I/O on load and return `test_savestate`
    pub use_test_savestate: bool,
    /// Reject frames whose header version is above this bound
    pub max_frame_version: Option<SchemaVersion>,
    /// fsync written files and the folder
    pub durable_writes: bool,
}

impl<S> StreamerConfig<S> {
    /// Create a config with defaults for everything but folder and fallback
    pub fn new(folder: impl AsRef<Path>, fallback: S) -> Self {
        StreamerConfig {
            folder: folder.as_ref().to_path_buf(),
            file_stem: DEFAULT_FILE_STEM.to_string(),
            backup_count: DEFAULT_BACKUP_COUNT,
            validate_files: true,
            debug_mode: false,
            fallback,
            test_savestate: None,
            use_test_savestate: false,
            max_frame_version: None,
            durable_writes: true,
        }
    }

    /// Create config for testing
    ///
    /// Skips fsync for faster tests.
    pub fn for_testing(folder: impl AsRef<Path>, fallback: S) -> Self {
        StreamerConfig {
            durable_writes: false,
            ..Self::new(folder, fallback)
        }
    }

    /// Set file stem
    pub fn with_file_stem(mut self, stem: impl Into<String>) -> Self {
        self.file_stem = stem.into();
        self
    }

    /// Set number of backup slots
    pub fn with_backup_count(mut self, count: usize) -> Self {
        self.backup_count = count;
        self
    }

    /// Enable or disable framing and validation
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_files = enabled;
        self
    }

    /// Enable or disable the debug export
    pub fn with_debug_mode(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    /// Set the test savestate and enable the test bypass
    pub fn with_test_savestate(mut self, state: S) -> Self {
        self.test_savestate = Some(state);
        self.use_test_savestate = true;
        self
    }

    /// Enable or disable the test bypass without changing the test value
    pub fn with_use_test_savestate(mut self, enabled: bool) -> Self {
        self.use_test_savestate = enabled;
        self
    }

    /// Set an upper bound on frame header versions
    pub fn with_max_frame_version(mut self, max: SchemaVersion) -> Self {
        self.max_frame_version = Some(max);
        self
    }

    /// Enable or disable fsync on write
    pub fn with_durable_writes(mut self, enabled: bool) -> Self {
        self.durable_writes = enabled;
        self
    }

    /// Paths of the configured save folder
    pub fn paths(&self) -> SavePaths {
        SavePaths::new(&self.folder, self.file_stem.clone())
    }
}

impl<S: Savestate> StreamerConfig<S> {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.folder.as_os_str().is_empty() {
            return Err(ConfigError::EmptyFolderPath);
        }

        if self.file_stem.is_empty()
            || self.file_stem.starts_with('.')
            || self
                .file_stem
                .chars()
                .any(|c| c == '/' || c == '\\' || c.is_control())
        {
            return Err(ConfigError::InvalidFileStem(self.file_stem.clone()));
        }

        if self.use_test_savestate && self.test_savestate.is_none() {
            return Err(ConfigError::MissingTestSavestate);
        }

        if let Some(max) = self.max_frame_version {
            if max == 0 || max > MAX_FRAME_VERSION {
                return Err(ConfigError::InvalidMaxFrameVersion(max));
            }
        }

        Ok(())
    }
}

/// Configuration errors
///
/// All of these are fatal at initialization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No serializer was supplied
    #[error("A serializer is required")]
    MissingSerializer,

    /// Folder path is empty
    #[error("Save folder path is empty")]
    EmptyFolderPath,

    /// File stem cannot be used as a file name prefix
    #[error("Invalid file stem: {0:?}")]
    InvalidFileStem(String),

    /// Test bypass enabled without a test savestate
    #[error("use_test_savestate is set but no test savestate was supplied")]
    MissingTestSavestate,

    /// Max frame version outside 1..=i32::MAX
    #[error("Invalid max frame version: {0}")]
    InvalidMaxFrameVersion(SchemaVersion),
}

//! Savestate streamer
//!
//! The streamer owns one save folder and runs the two persistence
//! pipelines against it:
//!
//! - **Load** (`load.rs`): test bypass, missing-file fallback, read,
//!   validate, deserialize, backup recovery, migration.
//! - **Save** (`save.rs`): dirty check, serialize, frame, rotate backups,
//!   crash-safe write, debug export, clear dirty.
//!
//! # Ownership
//!
//! The streamer owns its config, frame handling and backup ring. The
//! serializer and migrator are shared (`Arc`) and may serve several
//! streamers.
//!
//! # Concurrency
//!
//! All operations are synchronous and blocking. One streamer (one process)
//! must own a save folder at a time; nothing here coordinates concurrent
//! writers.

mod error;
mod inspect;
mod load;
mod save;

pub use error::{SaveError, SlotError};
pub use inspect::{SlotReport, SlotStatus};
pub use load::{FallbackReason, LoadOutcome, LoadReport};
pub use save::SaveOutcome;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use savestate_core::{Migrator, Savestate, Serializer};
use tracing::{debug, info};

use crate::backup::{BackupError, BackupRing};
use crate::config::{ConfigError, StreamerConfig};
use crate::format::frame;
use crate::paths::SavePaths;
use crate::writer::SaveWriter;

/// A file in the save folder that can hold a savestate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotSource {
    /// The main save file
    Main,
    /// A backup slot (0 = newest)
    Backup(usize),
}

impl fmt::Display for SlotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotSource::Main => write!(f, "main"),
            SlotSource::Backup(slot) => write!(f, "backup {}", slot),
        }
    }
}

/// Persistence engine for one save folder
pub struct SaveStreamer<S> {
    config: StreamerConfig<S>,
    paths: SavePaths,
    ring: BackupRing,
    writer: SaveWriter,
    serializer: Arc<dyn Serializer<S>>,
    migrator: Option<Arc<dyn Migrator<S>>>,
}

/// Builder for [`SaveStreamer`]
pub struct SaveStreamerBuilder<S> {
    config: StreamerConfig<S>,
    serializer: Option<Arc<dyn Serializer<S>>>,
    migrator: Option<Arc<dyn Migrator<S>>>,
}

impl<S: Savestate + Clone> SaveStreamerBuilder<S> {
    /// Set the serializer (required)
    pub fn serializer(mut self, serializer: Arc<dyn Serializer<S>>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    /// Set the migrator (optional)
    pub fn migrator(mut self, migrator: Arc<dyn Migrator<S>>) -> Self {
        self.migrator = Some(migrator);
        self
    }

    /// Validate the configuration and create the streamer
    pub fn build(self) -> Result<SaveStreamer<S>, ConfigError> {
        let serializer = self.serializer.ok_or(ConfigError::MissingSerializer)?;
        SaveStreamer::initialize(self.config, serializer, self.migrator)
    }
}

impl<S: Savestate + Clone> SaveStreamer<S> {
    /// Start building a streamer for `config`
    pub fn builder(config: StreamerConfig<S>) -> SaveStreamerBuilder<S> {
        SaveStreamerBuilder {
            config,
            serializer: None,
            migrator: None,
        }
    }

    /// Validate `config` and create a streamer
    ///
    /// No I/O happens here; the save folder is created by the first save.
    pub fn initialize(
        config: StreamerConfig<S>,
        serializer: Arc<dyn Serializer<S>>,
        migrator: Option<Arc<dyn Migrator<S>>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let paths = config.paths();
        let ring = BackupRing::new(paths.clone(), config.backup_count);
        let writer = SaveWriter::new(paths.clone(), config.durable_writes);

        debug!(
            target: "savestate::streamer",
            folder = %paths.root().display(),
            format = serializer.format_id(),
            backups = config.backup_count,
            validate = config.validate_files,
            migrator = migrator.is_some(),
            "Initialized save streamer"
        );

        Ok(SaveStreamer {
            config,
            paths,
            ring,
            writer,
            serializer,
            migrator,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &StreamerConfig<S> {
        &self.config
    }

    /// Get the save folder paths
    pub fn paths(&self) -> &SavePaths {
        &self.paths
    }

    /// Get the serializer
    pub fn serializer(&self) -> &dyn Serializer<S> {
        self.serializer.as_ref()
    }

    /// Get the migrator, if any
    pub fn migrator(&self) -> Option<&dyn Migrator<S>> {
        self.migrator.as_deref()
    }

    /// Get the backup ring
    pub fn backups(&self) -> &BackupRing {
        &self.ring
    }

    /// Copy the current main file into backup slot 0, rotating older slots
    ///
    /// Returns `false` if nothing was copied (backups disabled or no main
    /// file).
    pub fn create_backup(&self) -> Result<bool, BackupError> {
        let copied = self.ring.rotate()?;
        if copied {
            info!(target: "savestate::backup", folder = %self.paths.root().display(), "Backup created");
        }
        Ok(copied)
    }

    /// Delete the main file, every backup slot, the debug export and any
    /// stale temp file
    ///
    /// Backup files beyond the configured count are removed too. Returns
    /// the number of files deleted; a missing folder deletes nothing.
    pub fn delete_all_saves(&self) -> io::Result<usize> {
        let mut targets = vec![self.paths.main(), self.paths.debug(), self.paths.temp()];
        for slot in self.paths.list_backup_slots()? {
            targets.push(self.paths.backup(slot));
        }

        let mut removed = 0;
        for path in targets {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }

        info!(target: "savestate::streamer", removed, folder = %self.paths.root().display(), "Deleted all saves");
        Ok(removed)
    }

    /// Remove a temp file left behind by an interrupted save
    pub fn cleanup_temp_files(&self) -> io::Result<usize> {
        self.writer.cleanup_temp_files()
    }

    /// Read a slot and render its payload with the serializer's debug text
    pub fn debug_text(&self, slot: SlotSource) -> Result<String, SlotError> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Err(SlotError::Missing { slot });
        }
        let payload = self.read_payload(&path)?;
        Ok(self.serializer.to_debug_text(&payload)?)
    }

    /// Path of a slot
    pub fn slot_path(&self, slot: SlotSource) -> PathBuf {
        match slot {
            SlotSource::Main => self.paths.main(),
            SlotSource::Backup(n) => self.paths.backup(n),
        }
    }

    /// Read a file and extract its payload
    ///
    /// With validation on, the frame is validated and unwrapped; otherwise
    /// the whole file is the payload.
    fn read_payload(&self, path: &Path) -> Result<Vec<u8>, SlotError> {
        let bytes = std::fs::read(path).map_err(|source| SlotError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if !self.config.validate_files {
            return Ok(bytes);
        }

        frame::validate_with_max(&bytes, self.config.max_frame_version)?;
        Ok(frame::unwrap(&bytes).to_vec())
    }

    /// Read, validate and deserialize one file
    fn read_slot(&self, path: &Path) -> Result<S, SlotError> {
        let payload = self.read_payload(path)?;
        Ok(self.serializer.deserialize(&payload)?)
    }
}

impl<S> fmt::Debug for SaveStreamer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveStreamer")
            .field("paths", &self.paths)
            .field("backup_count", &self.config.backup_count)
            .field("validate_files", &self.config.validate_files)
            .field("format", &self.serializer.format_id())
            .field("migrator", &self.migrator.is_some())
            .finish()
    }
}

//! Rotating backup ring
//!
//! Keeps up to `count` historical copies of the main save file in slots
//! `0..count`, slot 0 being the newest. A rotation shifts every slot one
//! position older, evicting the oldest, then copies the current main file
//! into slot 0.
//!
//! Rotation runs *before* a new main file is written, so after a save
//! slot 0 holds the previous main file, not the one just written.
//!
//! # Gaps
//!
//! Missing slots are tolerated: a slot that does not exist is skipped
//! during the shift, and recovery simply tries the next candidate.

use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::paths::SavePaths;

/// Backup slot ring for one save folder
#[derive(Debug, Clone)]
pub struct BackupRing {
    paths: SavePaths,
    count: usize,
}

impl BackupRing {
    /// Create a ring with `count` slots (0 disables backups)
    pub fn new(paths: SavePaths, count: usize) -> Self {
        BackupRing { paths, count }
    }

    /// Number of slots
    pub fn count(&self) -> usize {
        self.count
    }

    /// Check if backups are enabled
    pub fn is_enabled(&self) -> bool {
        self.count > 0
    }

    /// Path of slot `slot`
    pub fn slot_path(&self, slot: usize) -> PathBuf {
        self.paths.backup(slot)
    }

    /// Rotate the ring and capture the current main file in slot 0.
    ///
    /// 1. Delete slot `count-1` if present
    /// 2. Move slot `i` to slot `i+1`, for `i` from `count-2` down to 0
    /// 3. Copy the main file (if present) into slot 0
    ///
    /// Returns `true` if the main file was copied. The first I/O error
    /// aborts the rotation; slots already shifted stay shifted.
    pub fn rotate(&self) -> Result<bool, BackupError> {
        if self.count == 0 {
            return Ok(false);
        }

        let oldest = self.count - 1;
        let oldest_path = self.paths.backup(oldest);
        if oldest_path.exists() {
            std::fs::remove_file(&oldest_path).map_err(|source| BackupError::Evict {
                slot: oldest,
                path: oldest_path.clone(),
                source,
            })?;
            debug!(target: "savestate::backup", slot = oldest, "Evicted oldest backup");
        }

        for slot in (0..oldest).rev() {
            let from = self.paths.backup(slot);
            if !from.exists() {
                continue;
            }
            let to = self.paths.backup(slot + 1);
            std::fs::rename(&from, &to).map_err(|source| BackupError::Shift {
                from: slot,
                to: slot + 1,
                source,
            })?;
        }

        let main = self.paths.main();
        if !main.exists() {
            return Ok(false);
        }

        let slot0 = self.paths.backup(0);
        std::fs::copy(&main, &slot0).map_err(|source| BackupError::Capture {
            path: slot0.clone(),
            source,
        })?;
        debug!(target: "savestate::backup", path = %slot0.display(), "Captured main file in slot 0");

        Ok(true)
    }

    /// Slots to try during recovery, newest first
    pub fn restore_candidates(&self) -> impl Iterator<Item = usize> {
        0..self.count
    }

    /// Candidate slots that currently exist on disk, newest first
    pub fn existing_slots(&self) -> Vec<usize> {
        self.restore_candidates()
            .filter(|&slot| self.paths.backup(slot).exists())
            .collect()
    }
}

/// Backup rotation errors
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    /// Deleting the oldest slot failed
    #[error("Failed to evict backup slot {slot} at {path}: {source}")]
    Evict {
        /// Slot being evicted
        slot: usize,
        /// Path of the slot
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Moving a slot one position older failed
    #[error("Failed to shift backup slot {from} to {to}: {source}")]
    Shift {
        /// Source slot
        from: usize,
        /// Destination slot
        to: usize,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Copying the main file into slot 0 failed
    #[error("Failed to copy main save into {path}: {source}")]
    Capture {
        /// Path of slot 0
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}

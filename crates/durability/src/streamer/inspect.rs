//! Save folder inspection
//!
//! Reports the state of every file the load pipeline would consult,
//! without deserializing anything and without touching the files.

use std::path::PathBuf;

use savestate_core::Savestate;

use super::{SaveStreamer, SlotSource};
use crate::format::{frame, FrameHeader};

/// State of one slot file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotStatus {
    /// No file at the slot path
    Missing,
    /// File passes frame validation (or validation is off)
    Valid {
        /// Frame header; `None` when validation is off
        header: Option<FrameHeader>,
        /// File size in bytes
        size: u64,
    },
    /// File fails frame validation
    Invalid {
        /// Short failure reason
        reason: &'static str,
        /// File size in bytes
        size: u64,
    },
    /// File exists but could not be read
    Unreadable {
        /// Error message
        error: String,
    },
}

impl SlotStatus {
    /// Check if the slot passed validation
    pub fn is_valid(&self) -> bool {
        matches!(self, SlotStatus::Valid { .. })
    }
}

/// Inspection result for one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotReport {
    /// Which slot
    pub source: SlotSource,
    /// Path of the slot file
    pub path: PathBuf,
    /// What was found there
    pub status: SlotStatus,
}

impl<S: Savestate + Clone> SaveStreamer<S> {
    /// Inspect the main file and every configured backup slot
    ///
    /// Slots are listed in load order: main first, then backups newest
    /// first.
    pub fn inspect(&self) -> Vec<SlotReport> {
        std::iter::once(SlotSource::Main)
            .chain(self.ring.restore_candidates().map(SlotSource::Backup))
            .map(|source| {
                let path = self.slot_path(source);
                let status = self.slot_status(&path);
                SlotReport {
                    source,
                    path,
                    status,
                }
            })
            .collect()
    }

    fn slot_status(&self, path: &std::path::Path) -> SlotStatus {
        if !path.exists() {
            return SlotStatus::Missing;
        }

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                return SlotStatus::Unreadable {
                    error: e.to_string(),
                }
            }
        };
        let size = bytes.len() as u64;

        if !self.config.validate_files {
            return SlotStatus::Valid { header: None, size };
        }

        match frame::validate_with_max(&bytes, self.config.max_frame_version) {
            Ok(header) => SlotStatus::Valid {
                header: Some(header),
                size,
            },
            Err(e) => SlotStatus::Invalid {
                reason: e.reason(),
                size,
            },
        }
    }
}

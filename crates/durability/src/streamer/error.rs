//! Streamer error types

use std::io;
use std::path::PathBuf;

use savestate_core::{SchemaVersion, SerializeError};

use crate::format::{FrameError, MAX_FRAME_VERSION};

use super::SlotSource;

/// Why a single slot could not be turned into a savestate
///
/// Never escapes `load()`: every variant sends the load pipeline to the
/// next backup slot.
#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    /// Slot file does not exist
    #[error("No file in {slot} slot")]
    Missing {
        /// Slot that was requested
        slot: SlotSource,
    },

    /// Reading the slot file failed
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path of the slot file
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Frame validation failed
    #[error("Invalid frame ({}): {0}", .0.reason())]
    Frame(#[from] FrameError),

    /// Serializer rejected the payload
    #[error(transparent)]
    Serializer(#[from] SerializeError),
}

/// Errors surfaced by `save()`
///
/// When `save()` returns an error the dirty flag is unchanged and the
/// previous main file is intact, so retrying is safe.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Serializer failed to encode the savestate
    #[error("Failed to serialize savestate: {0}")]
    Serialize(#[from] SerializeError),

    /// Version cannot be stored in a frame header
    #[error("Savestate version {0} cannot be framed (expected 1..={})", MAX_FRAME_VERSION)]
    InvalidVersion(SchemaVersion),

    /// Writing the main file failed
    #[error("Failed to write {path}: {source}")]
    Io {
        /// Path being written
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}

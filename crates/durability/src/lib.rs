//! Durability layer for savestates
//!
//! This crate handles everything that touches disk:
//!
//! - Frame format: `SAVE` magic, version header, payload
//! - Save folder layout: main file, numbered backups, debug export
//! - Backup ring rotation and recovery order
//! - Crash-safe main file replacement (write, fsync, rename)
//! - The save streamer: load with recovery and migration, dirty-gated save

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backup; // Rotating backup slots
pub mod config; // Streamer configuration and validation
pub mod format; // Frame wrap/unwrap/validate
pub mod paths; // Save folder layout
pub mod streamer; // Load and save pipelines
pub mod writer; // Crash-safe main file writer

// === Re-exports ===
pub use backup::{BackupError, BackupRing};
pub use config::{ConfigError, StreamerConfig, DEFAULT_BACKUP_COUNT};
pub use format::{FrameError, FrameHeader, FRAME_HEADER_SIZE, FRAME_MAGIC, MAX_FRAME_VERSION};
pub use paths::{SavePaths, DEFAULT_FILE_STEM, SAVE_EXTENSION};
pub use streamer::{
    FallbackReason, LoadOutcome, LoadReport, SaveError, SaveOutcome, SaveStreamer,
    SaveStreamerBuilder, SlotError, SlotReport, SlotSource, SlotStatus,
};
pub use writer::SaveWriter;

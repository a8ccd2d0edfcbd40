//! Shared test utilities for the integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's
//! main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{Seek, SeekFrom, Write as IoWrite};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use savestate::format::frame;
pub use savestate::{
    ChainMigrator, FallbackReason, JsonSerializer, LoadOutcome, MigrationError, Migrator,
    MsgpackSerializer, SaveError, SaveOutcome, SaveStreamer, Savestate, SchemaVersion, Serializer,
    SlotSource, SlotStatus, StreamerConfig,
};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

// ============================================================================
// Test savestate
// ============================================================================

/// Application-style savestate with its own dirty tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub version: SchemaVersion,
    pub name: String,
    pub level: u32,
    #[serde(default)]
    pub history: Vec<String>,
    #[serde(skip)]
    pub dirty: bool,
}

impl Profile {
    /// A dirty profile, as if freshly edited.
    pub fn new(version: SchemaVersion, name: &str, level: u32) -> Self {
        Profile {
            version,
            name: name.to_string(),
            level,
            history: Vec::new(),
            dirty: true,
        }
    }

    /// A clean profile, as if just loaded.
    pub fn clean(version: SchemaVersion, name: &str, level: u32) -> Self {
        Profile {
            dirty: false,
            ..Profile::new(version, name, level)
        }
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level;
        self.dirty = true;
    }
}

impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.name == other.name
            && self.level == other.level
            && self.history == other.history
    }
}

impl Savestate for Profile {
    fn version(&self) -> SchemaVersion {
        self.version
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

/// The fallback every test streamer is configured with.
pub fn fallback_profile() -> Profile {
    Profile::clean(1, "fallback", 0)
}

/// Migrator that bumps the version by one per step and records the step.
pub fn history_migrator(current: SchemaVersion) -> Arc<dyn Migrator<Profile>> {
    Arc::new(ChainMigrator::new(current, |mut p: Profile| {
        p.history.push(format!("v{}->v{}", p.version, p.version + 1));
        p.version += 1;
        Ok::<_, MigrationError>(p)
    }))
}

// ============================================================================
// TestSaves - save folder wrapper
// ============================================================================

/// A temporary save folder with a streamer over it.
pub struct TestSaves {
    pub dir: TempDir,
    pub streamer: SaveStreamer<Profile>,
    migrator: Option<Arc<dyn Migrator<Profile>>>,
}

impl TestSaves {
    /// Folder with default settings (3 backups, framing on).
    pub fn new() -> Self {
        Self::with_config(|c| c)
    }

    /// Folder with a customised config.
    pub fn with_config(
        customize: impl FnOnce(StreamerConfig<Profile>) -> StreamerConfig<Profile>,
    ) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = customize(StreamerConfig::for_testing(dir.path(), fallback_profile()));
        let streamer = SaveStreamer::initialize(config, Arc::new(JsonSerializer::new()), None)
            .expect("Failed to initialize streamer");
        TestSaves {
            dir,
            streamer,
            migrator: None,
        }
    }

    /// Replace the streamer with one using `migrator`, keeping the folder.
    pub fn with_migrator(mut self, migrator: Arc<dyn Migrator<Profile>>) -> Self {
        self.migrator = Some(migrator);
        self.reopen();
        self
    }

    /// Rebuild the streamer over the same folder, as a restarted process would.
    pub fn reopen(&mut self) {
        let config = self.streamer.config().clone();
        self.streamer = SaveStreamer::initialize(
            config,
            Arc::new(JsonSerializer::new()),
            self.migrator.clone(),
        )
        .expect("Failed to reinitialize streamer");
    }

    pub fn main_path(&self) -> PathBuf {
        self.streamer.paths().main()
    }

    pub fn backup_path(&self, slot: usize) -> PathBuf {
        self.streamer.paths().backup(slot)
    }

    /// Save a dirty profile and return it.
    pub fn save(&self, version: SchemaVersion, name: &str, level: u32) -> Profile {
        let mut profile = Profile::new(version, name, level);
        self.streamer
            .save(&mut profile)
            .expect("Failed to save profile");
        profile
    }

    /// Write a framed profile straight into a file, bypassing the streamer.
    pub fn plant(&self, path: &Path, version: SchemaVersion, name: &str, level: u32) {
        let payload = serde_json::to_vec(&Profile::new(version, name, level))
            .expect("Failed to encode profile");
        fs::create_dir_all(self.dir.path()).expect("Failed to create folder");
        fs::write(path, frame::wrap(&payload, version)).expect("Failed to plant file");
    }

    /// Every file in the folder with its contents.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        folder_snapshot(self.dir.path())
    }
}

// ============================================================================
// File helpers
// ============================================================================

/// Map of file name to contents for every regular file in `dir`.
pub fn folder_snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut files = BTreeMap::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return files;
    };
    for entry in entries {
        let entry = entry.expect("Failed to read dir entry");
        let path = entry.path();
        if path.is_file() {
            let name = entry.file_name().to_string_lossy().to_string();
            files.insert(name, fs::read(&path).expect("Failed to read file"));
        }
    }
    files
}

/// Overwrite bytes at `offset`.
pub fn corrupt_file_at_offset(path: &Path, offset: u64, bytes: &[u8]) {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .expect("Failed to open file for corruption");
    file.seek(SeekFrom::Start(offset)).expect("Failed to seek in file");
    file.write_all(bytes).expect("Failed to write corruption bytes");
}

/// Truncate a file to `new_size` bytes.
pub fn truncate_file(path: &Path, new_size: u64) {
    let file = OpenOptions::new()
        .write(true)
        .open(path)
        .expect("Failed to open file for truncation");
    file.set_len(new_size).expect("Failed to truncate file");
}

/// Get file size (0 if not found).
pub fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Decode the profile stored in a framed file.
pub fn read_framed(path: &Path) -> Profile {
    let bytes = fs::read(path).expect("Failed to read file");
    frame::validate(&bytes).expect("File is not a valid frame");
    serde_json::from_slice(frame::unwrap(&bytes)).expect("Payload is not a profile")
}

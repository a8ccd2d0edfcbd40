//! Crash-safe save writer
//!
//! Uses write-fsync-rename pattern for replacing the main save file.
//!
//! # Crash Safety
//!
//! The main file is replaced in four steps:
//! 1. Write to temporary file (.savestate.sav.tmp)
//! 2. fsync the temporary file
//! 3. Atomic rename over the main file
//! 4. fsync the parent directory
//!
//! Either the complete new file is visible or the previous main file is
//! still intact; a failed write never leaves a truncated main file.
//! With durable writes off, the two fsync steps are skipped.
//!
//! A failure in steps 1-3 removes the temporary file and is returned.
//! Once the rename has happened the new main file is in place, so a
//! failed directory fsync is logged and the write still succeeds.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tracing::warn;

use crate::paths::SavePaths;

/// Main file writer with crash-safe semantics
#[derive(Debug, Clone)]
pub struct SaveWriter {
    paths: SavePaths,
    durable: bool,
}

impl SaveWriter {
    /// Create a new writer for a save folder
    pub fn new(paths: SavePaths, durable: bool) -> Self {
        SaveWriter { paths, durable }
    }

    /// Replace the main save file with `bytes`
    ///
    /// Creates the save folder if it doesn't exist.
    pub fn write_main(&self, bytes: &[u8]) -> io::Result<()> {
        self.paths.create_directories()?;

        let final_path = self.paths.main();
        let temp_path = self.paths.temp();

        // Steps 1-2: write and fsync the temporary file
        if let Err(e) = self.write_temp(&temp_path, bytes) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e);
        }

        // Step 3: Atomic rename
        if let Err(e) = std::fs::rename(&temp_path, &final_path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e);
        }

        // Step 4: fsync parent directory
        if self.durable {
            if let Err(e) = sync_dir(self.paths.root()) {
                warn!(
                    target: "savestate::save",
                    path = %self.paths.root().display(),
                    error = %e,
                    "Save folder fsync failed after rename"
                );
            }
        }

        Ok(())
    }

    fn write_temp(&self, temp_path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(temp_path)?;
        file.write_all(bytes)?;
        if self.durable {
            file.sync_all()?;
        }
        Ok(())
    }

    /// Write the debug export
    ///
    /// Plain overwrite; the debug file is never read back.
    pub fn write_debug(&self, text: &str) -> io::Result<()> {
        self.paths.create_directories()?;
        std::fs::write(self.paths.debug(), text)
    }

    /// Clean up an incomplete temporary file
    ///
    /// Returns the number of files removed (0 or 1).
    pub fn cleanup_temp_files(&self) -> io::Result<usize> {
        let temp_path = self.paths.temp();
        if !temp_path.exists() {
            return Ok(0);
        }
        std::fs::remove_file(&temp_path)?;
        Ok(1)
    }

    /// Check if a temporary file exists
    pub fn temp_file_exists(&self) -> bool {
        self.paths.temp().exists()
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

// Directories cannot be opened as files on Windows.
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

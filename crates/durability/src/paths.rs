//! Save folder layout
//!
//! All files of one savestate live in a single folder:
//!
//! ```text
//! <folder>/
//! ├── savestate.sav            # Main save file
//! ├── savestate.backup0.sav    # Newest backup
//! ├── savestate.backup1.sav
//! ├── ...                      # Up to backup{N-1}, the oldest retained
//! ├── savestate_debug.json     # Debug export (debug mode only, never read)
//! └── .savestate.sav.tmp       # In-flight write, only visible after a crash
//! ```
//!
//! `savestate` is the configurable file stem.

use std::path::{Path, PathBuf};

/// Default file stem
pub const DEFAULT_FILE_STEM: &str = "savestate";

/// Extension of the main file and backups
pub const SAVE_EXTENSION: &str = "sav";

/// Save folder paths
///
/// Provides access to all paths within a save folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePaths {
    root: PathBuf,
    stem: String,
}

impl SavePaths {
    /// Create paths for `stem` inside `root`
    pub fn new(root: impl AsRef<Path>, stem: impl Into<String>) -> Self {
        SavePaths {
            root: root.as_ref().to_path_buf(),
            stem: stem.into(),
        }
    }

    /// Create paths with the default file stem
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        Self::new(root, DEFAULT_FILE_STEM)
    }

    /// Get the save folder
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the file stem
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Get the main save file path
    pub fn main(&self) -> PathBuf {
        self.root.join(format!("{}.{}", self.stem, SAVE_EXTENSION))
    }

    /// Get the path of backup slot `slot` (0 = newest)
    pub fn backup(&self, slot: usize) -> PathBuf {
        self.root.join(format!("{}.backup{}.{}", self.stem, slot, SAVE_EXTENSION))
    }

    /// Get the debug export path
    pub fn debug(&self) -> PathBuf {
        self.root.join(format!("{}_debug.json", self.stem))
    }

    /// Get the temporary path used while writing the main file
    pub fn temp(&self) -> PathBuf {
        self.root.join(format!(".{}.{}.tmp", self.stem, SAVE_EXTENSION))
    }

    /// Check if a main save file exists
    pub fn exists(&self) -> bool {
        self.main().exists()
    }

    /// Create the save folder
    pub fn create_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)
    }

    /// Parse the backup slot from a file name
    ///
    /// Returns `None` if the name is not a backup file of this stem.
    pub fn parse_backup_slot(&self, file_name: &str) -> Option<usize> {
        let rest = file_name.strip_prefix(self.stem.as_str())?;
        let rest = rest.strip_prefix(".backup")?;
        let digits = rest.strip_suffix(&format!(".{}", SAVE_EXTENSION))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// List backup slots present in the folder, sorted ascending
    ///
    /// Includes slots beyond any configured backup count. A missing folder
    /// has no slots.
    pub fn list_backup_slots(&self) -> std::io::Result<Vec<usize>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut slots = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(slot) = self.parse_backup_slot(&name) {
                slots.push(slot);
            }
        }

        slots.sort_unstable();
        Ok(slots)
    }
}

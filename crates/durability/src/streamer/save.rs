//! Save pipeline
//!
//! A clean savestate is never written. A dirty one is serialized, framed
//! (when validation is on), the backup ring is rotated, and the main file
//! is replaced crash-safely. The dirty flag is cleared only after the main
//! file is in place.

use savestate_core::Savestate;
use tracing::{debug, info, warn};

use super::{SaveError, SaveStreamer};
use crate::format::{frame, MAX_FRAME_VERSION};

/// How a save ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Savestate was clean; nothing was written
    Skipped,
    /// Main file was replaced
    Written {
        /// Size of the main file in bytes
        bytes: usize,
    },
}

impl SaveOutcome {
    /// Check if anything was written
    pub fn is_written(&self) -> bool {
        matches!(self, SaveOutcome::Written { .. })
    }
}

impl<S: Savestate + Clone> SaveStreamer<S> {
    /// Persist the savestate if it is dirty
    ///
    /// On success the dirty flag is cleared. On error it is left set and
    /// the previous main file is untouched.
    pub fn save(&self, state: &mut S) -> Result<SaveOutcome, SaveError> {
        if !state.is_dirty() {
            debug!(target: "savestate::save", "Savestate clean, skipping save");
            return Ok(SaveOutcome::Skipped);
        }

        let version = state.version();
        let payload = self.serializer.serialize(state)?;

        let file = if self.config.validate_files {
            if version == 0 || version > MAX_FRAME_VERSION {
                return Err(SaveError::InvalidVersion(version));
            }
            frame::wrap(&payload, version)
        } else {
            payload.clone()
        };

        if self.ring.is_enabled() {
            if let Err(e) = self.ring.rotate() {
                warn!(target: "savestate::save", error = %e, "Backup rotation failed, saving anyway");
            }
        }

        let main = self.paths.main();
        self.writer
            .write_main(&file)
            .map_err(|source| SaveError::Io {
                path: main.clone(),
                source,
            })?;

        if self.config.debug_mode {
            self.write_debug_export(&payload);
        }

        state.clear_dirty();
        info!(
            target: "savestate::save",
            path = %main.display(),
            version,
            bytes = file.len(),
            "Savestate saved"
        );

        Ok(SaveOutcome::Written { bytes: file.len() })
    }

    fn write_debug_export(&self, payload: &[u8]) {
        let text = match self.serializer.to_debug_text(payload) {
            Ok(text) => text,
            Err(e) => {
                warn!(target: "savestate::save", error = %e, "Debug export could not be rendered");
                return;
            }
        };

        if let Err(e) = self.writer.write_debug(&text) {
            warn!(target: "savestate::save", path = %self.paths.debug().display(), error = %e, "Debug export could not be written");
        }
    }
}

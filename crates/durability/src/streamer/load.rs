//! Load pipeline
//!
//! Every call ends in exactly one of four states:
//!
//! ```text
//! test bypass ──────────────────────────────────────────► TestValue
//! main missing ─────────────────────────────────────────► Fallback
//! main ok ──┐
//!           ├─► migrator? ── at current ──────────────► Loaded
//! backup ok ┘              └─ migrate ok ─► auto-save ─► Migrated
//!                          └─ migrate err ─────────────► Fallback
//! main bad, no backup ok ───────────────────────────────► Fallback
//! ```
//!
//! Load never fails: every problem it can classify ends in the fallback.

use savestate_core::{Savestate, SchemaVersion};
use tracing::{debug, info, warn};

use super::{SaveStreamer, SlotSource};

/// Why the fallback savestate was returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No main save file exists
    MissingFile,
    /// Neither the main file nor any backup could be loaded
    Unrecoverable,
    /// Loaded state could not be migrated to the current version
    MigrationFailed,
}

/// How a load ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Test savestate returned without I/O
    TestValue,
    /// Fallback savestate returned
    Fallback(FallbackReason),
    /// Persisted state returned as stored
    Loaded {
        /// File the state was read from
        source: SlotSource,
    },
    /// Persisted state migrated to the current version
    Migrated {
        /// File the state was read from
        source: SlotSource,
        /// Version before migration
        from: SchemaVersion,
        /// Version after migration
        to: SchemaVersion,
    },
}

impl LoadOutcome {
    /// Check if the state came from disk (loaded or migrated)
    pub fn is_persisted(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. } | LoadOutcome::Migrated { .. })
    }

    /// Check if the state was recovered from a backup slot
    pub fn is_recovered(&self) -> bool {
        matches!(
            self,
            LoadOutcome::Loaded {
                source: SlotSource::Backup(_)
            } | LoadOutcome::Migrated {
                source: SlotSource::Backup(_),
                ..
            }
        )
    }
}

/// Result of a load: the state plus how it was obtained
#[derive(Debug, Clone)]
pub struct LoadReport<S> {
    /// The loaded, migrated, fallback or test savestate
    pub state: S,
    /// How the state was obtained
    pub outcome: LoadOutcome,
}

impl<S: Savestate + Clone> SaveStreamer<S> {
    /// Load the savestate
    ///
    /// Always returns a usable value: loaded, migrated, fallback or test.
    pub fn load(&self) -> S {
        self.load_report().state
    }

    /// Load the savestate and report how it was obtained
    pub fn load_report(&self) -> LoadReport<S> {
        if self.config.use_test_savestate {
            if let Some(test) = &self.config.test_savestate {
                debug!(target: "savestate::load", "Returning test savestate");
                return LoadReport {
                    state: test.clone(),
                    outcome: LoadOutcome::TestValue,
                };
            }
        }

        let main = self.paths.main();
        if !main.exists() {
            info!(target: "savestate::load", path = %main.display(), "No save file, using fallback");
            return self.fallback(FallbackReason::MissingFile);
        }

        let (state, source) = match self.read_slot(&main) {
            Ok(state) => (state, SlotSource::Main),
            Err(e) => {
                warn!(target: "savestate::load", path = %main.display(), error = %e, "Main save unusable, trying backups");
                match self.recover_from_backups() {
                    Some(found) => found,
                    None => {
                        warn!(target: "savestate::load", "No usable backup, using fallback");
                        return self.fallback(FallbackReason::Unrecoverable);
                    }
                }
            }
        };

        debug!(target: "savestate::load", %source, version = state.version(), "Savestate read");
        self.migrate_loaded(state, source)
    }

    /// Try backup slots newest first; the first slot that loads wins
    fn recover_from_backups(&self) -> Option<(S, SlotSource)> {
        for slot in self.ring.restore_candidates() {
            let path = self.paths.backup(slot);
            if !path.exists() {
                continue;
            }

            match self.read_slot(&path) {
                Ok(state) => {
                    info!(target: "savestate::load", slot, version = state.version(), "Recovered savestate from backup");
                    return Some((state, SlotSource::Backup(slot)));
                }
                Err(e) => {
                    warn!(target: "savestate::load", slot, error = %e, "Backup slot unusable");
                }
            }
        }

        None
    }

    fn migrate_loaded(&self, state: S, source: SlotSource) -> LoadReport<S> {
        let Some(migrator) = &self.migrator else {
            return LoadReport {
                state,
                outcome: LoadOutcome::Loaded { source },
            };
        };

        let from = state.version();
        let current = migrator.current_version();
        if from == current {
            return LoadReport {
                state,
                outcome: LoadOutcome::Loaded { source },
            };
        }

        // Keep the pre-migration main file around whatever happens next.
        // A state recovered from a backup is already in the ring; rotating
        // would push the corrupt main over it.
        if source == SlotSource::Main && self.ring.is_enabled() {
            if let Err(e) = self.ring.rotate() {
                warn!(target: "savestate::migrate", error = %e, "Pre-migration backup failed");
            }
        }

        match migrator.try_migrate(state) {
            Ok(mut migrated) => {
                let to = migrated.version();
                info!(target: "savestate::migrate", from, to, %source, "Savestate migrated");

                migrated.mark_dirty();
                if let Err(e) = self.save(&mut migrated) {
                    warn!(target: "savestate::migrate", error = %e, "Auto-save after migration failed");
                }

                LoadReport {
                    state: migrated,
                    outcome: LoadOutcome::Migrated { source, from, to },
                }
            }
            Err(e) => {
                warn!(target: "savestate::migrate", from, current, error = %e, "Migration failed, using fallback");
                self.fallback(FallbackReason::MigrationFailed)
            }
        }
    }

    fn fallback(&self, reason: FallbackReason) -> LoadReport<S> {
        LoadReport {
            state: self.config.fallback.clone(),
            outcome: LoadOutcome::Fallback(reason),
        }
    }
}

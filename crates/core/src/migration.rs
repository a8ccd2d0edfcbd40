//! Savestate migration
//!
//! A [`Migrator`] brings a savestate written by an older schema up to the
//! current schema. Most migrators are built from single-step transitions
//! (version N to version N+1) run by [`migrate_chain`]:
//!
//! - a state already at the current version is returned unchanged
//! - a state from a newer schema is rejected, there is no downgrade
//! - every step must strictly increase the version, otherwise the chain
//!   aborts instead of looping forever on a misconfigured step
//! - any step error aborts the whole chain; partial results are dropped
//!
//! Two ready-made migrators wrap the chain: [`ChainMigrator`] (one step
//! closure for every version) and [`MigrationSteps`] (a table of step
//! closures keyed by source version).

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use crate::state::{Savestate, SchemaVersion};

/// Brings old savestates up to the current schema version.
///
/// Implementations must be `Send + Sync` so one migrator can be shared by
/// several streamers.
pub trait Migrator<S>: Send + Sync {
    /// The schema version loaded savestates are migrated to.
    fn current_version(&self) -> SchemaVersion;

    /// Migrate `old` to [`current_version`](Self::current_version).
    ///
    /// On error the caller must discard both the input and any partial
    /// result.
    fn try_migrate(&self, old: S) -> Result<S, MigrationError>;
}

/// Migration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// Savestate was written by a newer schema.
    #[error("Cannot migrate from future version {found} (current is {current})")]
    FromFuture {
        /// Version found in the savestate
        found: SchemaVersion,
        /// Current schema version
        current: SchemaVersion,
    },

    /// A step did not increase the version.
    #[error("Migration stalled: step from version {from} produced version {produced}")]
    Stalled {
        /// Version before the step
        from: SchemaVersion,
        /// Version the step produced
        produced: SchemaVersion,
    },

    /// A step jumped past the current version.
    #[error("Migration overshot: produced version {produced}, current is {current}")]
    Overshot {
        /// Version the chain ended on
        produced: SchemaVersion,
        /// Current schema version
        current: SchemaVersion,
    },

    /// A step reported failure.
    #[error("Migration step from version {from} failed: {detail}")]
    StepFailed {
        /// Version the failing step started from
        from: SchemaVersion,
        /// Human-readable error description
        detail: String,
    },

    /// No step is registered for a version.
    #[error("No migration step registered for version {0}")]
    MissingStep(SchemaVersion),
}

impl MigrationError {
    /// Create a step failure.
    pub fn step(from: SchemaVersion, detail: impl Into<String>) -> Self {
        MigrationError::StepFailed {
            from,
            detail: detail.into(),
        }
    }
}

/// Run single-step migrations until `old` reaches `current`.
///
/// `step` receives a state at version N and returns the state at a version
/// greater than N (normally N+1).
pub fn migrate_chain<S, F>(old: S, current: SchemaVersion, mut step: F) -> Result<S, MigrationError>
where
    S: Savestate,
    F: FnMut(S) -> Result<S, MigrationError>,
{
    let start = old.version();
    if start == current {
        return Ok(old);
    }
    if start > current {
        return Err(MigrationError::FromFuture {
            found: start,
            current,
        });
    }

    let mut state = old;
    while state.version() < current {
        let from = state.version();
        let next = step(state)?;
        let produced = next.version();

        if produced <= from {
            warn!(target: "savestate::migrate", from, produced, "Migration step did not advance version, aborting");
            return Err(MigrationError::Stalled { from, produced });
        }

        debug!(target: "savestate::migrate", from, to = produced, "Migration step applied");
        state = next;
    }

    if state.version() != current {
        return Err(MigrationError::Overshot {
            produced: state.version(),
            current,
        });
    }

    Ok(state)
}

/// A [`Migrator`] driven by one step closure.
///
/// The closure is called once per version between the loaded version and
/// the current version.
pub struct ChainMigrator<F> {
    current: SchemaVersion,
    step: F,
}

impl<F> ChainMigrator<F> {
    /// Create a chain migrator targeting `current`.
    pub fn new(current: SchemaVersion, step: F) -> Self {
        ChainMigrator { current, step }
    }
}

impl<S, F> Migrator<S> for ChainMigrator<F>
where
    S: Savestate,
    F: Fn(S) -> Result<S, MigrationError> + Send + Sync,
{
    fn current_version(&self) -> SchemaVersion {
        self.current
    }

    fn try_migrate(&self, old: S) -> Result<S, MigrationError> {
        migrate_chain(old, self.current, &self.step)
    }
}

impl<F> fmt::Debug for ChainMigrator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainMigrator")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

type StepFn<S> = Box<dyn Fn(S) -> Result<S, MigrationError> + Send + Sync>;

/// A [`Migrator`] built from per-version steps.
///
/// # Example
///
/// ```ignore
/// let migrator = MigrationSteps::new(3)
///     .step(1, |s: VersionedState<Data>| Ok(upgrade_v1(s)))
///     .step(2, |s: VersionedState<Data>| Ok(upgrade_v2(s)));
/// ```
pub struct MigrationSteps<S> {
    current: SchemaVersion,
    steps: BTreeMap<SchemaVersion, StepFn<S>>,
}

impl<S> MigrationSteps<S> {
    /// Create an empty step table targeting `current`.
    pub fn new(current: SchemaVersion) -> Self {
        MigrationSteps {
            current,
            steps: BTreeMap::new(),
        }
    }

    /// Register the step that migrates a state at version `from`.
    ///
    /// Registering the same version twice replaces the earlier step.
    pub fn step<F>(mut self, from: SchemaVersion, f: F) -> Self
    where
        F: Fn(S) -> Result<S, MigrationError> + Send + Sync + 'static,
    {
        self.steps.insert(from, Box::new(f));
        self
    }

    /// Check whether a step is registered for `from`.
    pub fn has_step(&self, from: SchemaVersion) -> bool {
        self.steps.contains_key(&from)
    }
}

impl<S: Savestate> Migrator<S> for MigrationSteps<S> {
    fn current_version(&self) -> SchemaVersion {
        self.current
    }

    fn try_migrate(&self, old: S) -> Result<S, MigrationError> {
        migrate_chain(old, self.current, |state| {
            let from = state.version();
            match self.steps.get(&from) {
                Some(step) => step(state),
                None => Err(MigrationError::MissingStep(from)),
            }
        })
    }
}

impl<S> fmt::Debug for MigrationSteps<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationSteps")
            .field("current", &self.current)
            .field("steps", &self.steps.keys().collect::<Vec<_>>())
            .finish()
    }
}

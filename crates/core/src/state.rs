//! Savestate types
//!
//! A savestate is the single application state object that the durability
//! layer persists. The layer only needs three things from it:
//!
//! - its schema **version** (written into the frame header)
//! - a **dirty** flag (saves of clean states are skipped)
//! - a way to clear that flag once the state is on disk
//!
//! Field-level content is owned by the application and opaque here.

use serde::{Deserialize, Serialize};

/// Schema revision of a savestate. Valid versions start at 1.
pub type SchemaVersion = u32;

/// Behavior the persistence pipelines require from an application state.
///
/// The version is set by the application or by a successful migration
/// step. Nothing in the durability layer invents a version.
pub trait Savestate {
    /// Schema revision of this value.
    fn version(&self) -> SchemaVersion;

    /// True if the in-memory state has changes not yet written to disk.
    fn is_dirty(&self) -> bool;

    /// Mark the state as persisted.
    fn clear_dirty(&mut self);

    /// Mark the state as changed.
    fn mark_dirty(&mut self);
}

/// A generic savestate: a version number plus arbitrary serde data.
///
/// The dirty flag is runtime-only and never serialized; a freshly
/// deserialized value is clean, a freshly constructed one is dirty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionedState<T> {
    version: SchemaVersion,
    data: T,
    #[serde(skip)]
    dirty: bool,
}

impl<T> VersionedState<T> {
    /// Create a new, dirty state at `version`.
    pub fn new(version: SchemaVersion, data: T) -> Self {
        VersionedState {
            version,
            data,
            dirty: true,
        }
    }

    /// Create a clean state, as if it had just been loaded.
    pub fn clean(version: SchemaVersion, data: T) -> Self {
        VersionedState {
            version,
            data,
            dirty: false,
        }
    }

    /// Borrow the payload data.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Mutably borrow the payload data. Marks the state dirty.
    pub fn data_mut(&mut self) -> &mut T {
        self.dirty = true;
        &mut self.data
    }

    /// Replace the payload data. Marks the state dirty.
    pub fn set_data(&mut self, data: T) {
        self.data = data;
        self.dirty = true;
    }

    /// Move to another schema version, keeping the data.
    ///
    /// Used by migration steps; the result is dirty.
    pub fn with_version(mut self, version: SchemaVersion) -> Self {
        self.version = version;
        self.dirty = true;
        self
    }

    /// Map the data into a new type, keeping version and dirty flag.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> VersionedState<U> {
        VersionedState {
            version: self.version,
            data: f(self.data),
            dirty: self.dirty,
        }
    }

    /// Consume the state and return its data.
    pub fn into_data(self) -> T {
        self.data
    }
}

impl<T> Savestate for VersionedState<T> {
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

// Equality is about persisted content only; the dirty flag is runtime state.
impl<T: PartialEq> PartialEq for VersionedState<T> {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.data == other.data
    }
}

impl<T: Eq> Eq for VersionedState<T> {}

impl<T: Default> Default for VersionedState<T> {
    fn default() -> Self {
        VersionedState::new(1, T::default())
    }
}

//! Core types and traits for savestate persistence
//!
//! This crate defines what the durability layer consumes:
//! - Savestate: the versioned, dirty-trackable state trait
//! - VersionedState: a generic serde savestate
//! - Serializer: savestate <-> payload bytes, with JSON, MessagePack and bincode strategies
//! - Migrator: schema upgrades, plus the version-by-version migration chain

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod migration; // Migrator trait and migration chain
pub mod serializer; // Serializer trait and serde strategies
pub mod state; // Savestate trait and VersionedState

pub use migration::{migrate_chain, ChainMigrator, MigrationError, MigrationSteps, Migrator};
pub use serializer::{
    serializer_for, BincodeSerializer, JsonSerializer, MsgpackSerializer, SerializeError,
    Serializer, BINCODE_FORMAT, JSON_FORMAT, MSGPACK_FORMAT,
};
pub use state::{Savestate, SchemaVersion, VersionedState};

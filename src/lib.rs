//! Savestate - versioned, crash-tolerant persistence for a single state value
//!
//! A savestate is one application value with a schema version and a dirty
//! flag. The streamer saves it to a folder with a small binary frame,
//! keeps rotating backups, recovers from corrupt files, and migrates old
//! versions forward on load.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use savestate::{JsonSerializer, SaveStreamer, StreamerConfig, VersionedState};
//!
//! let config = StreamerConfig::new("saves", VersionedState::clean(1, Settings::default()));
//! let streamer = SaveStreamer::builder(config)
//!     .serializer(Arc::new(JsonSerializer::new()))
//!     .build()?;
//!
//! let mut state = streamer.load();
//! state.data_mut().volume = 7;
//! streamer.save(&mut state)?;
//! ```
//!
//! # Architecture
//!
//! - [`savestate_core`]: the savestate model, serializers and migration chain
//! - [`savestate_durability`]: frames, backups, crash-safe writes and the
//!   load/save pipelines

pub use savestate_core::*;
pub use savestate_durability::*;

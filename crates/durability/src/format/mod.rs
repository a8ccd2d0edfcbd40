//! On-disk byte formats.
//!
//! Keeping serialization separate from operational logic (how saves and
//! backups are managed) makes format evolution easier to manage.
//!
//! # Module Structure
//!
//! - `frame`: integrity header wrapped around every validated save file

pub mod frame;

pub use frame::{
    unwrap, validate, validate_with_max, wrap, FrameError, FrameHeader, FRAME_HEADER_SIZE,
    FRAME_MAGIC, MAX_FRAME_VERSION,
};

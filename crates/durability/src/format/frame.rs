//! Savestate frame format
//!
//! When file validation is on, every save file is a frame:
//!
//! ```text
//! offset 0  len 4   ASCII "SAVE"            magic
//! offset 4  len 4   u32 little-endian       savestate version (>= 1)
//! offset 8  len N   serializer payload      opaque bytes
//! ```
//!
//! The header carries no length or checksum; the payload is everything
//! after byte 8. An empty payload is structurally valid.
//!
//! The version is validated as a signed 32-bit integer, so header values
//! with the top bit set are rejected along with 0.

use savestate_core::SchemaVersion;

/// Frame magic bytes
pub const FRAME_MAGIC: [u8; 4] = *b"SAVE";

/// Header size: Magic(4) + Version(4)
pub const FRAME_HEADER_SIZE: usize = 8;

/// Largest version a frame header can carry
pub const MAX_FRAME_VERSION: SchemaVersion = i32::MAX as SchemaVersion;

/// Parsed frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Savestate version recorded by the writer
    pub version: SchemaVersion,
    /// Number of payload bytes after the header
    pub payload_len: usize,
}

/// Frame a payload.
///
/// Produces `magic || version || payload`. Always succeeds; callers that
/// need the frame to validate must pass a version in
/// `1..=MAX_FRAME_VERSION`.
pub fn wrap(payload: &[u8], version: SchemaVersion) -> Vec<u8> {
    let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
    frame.extend_from_slice(&FRAME_MAGIC);
    frame.extend_from_slice(&version.to_le_bytes());
    frame.extend_from_slice(payload);
    frame
}

/// Return the payload of a frame.
///
/// The frame must have passed [`validate`]. A buffer shorter than the
/// header yields an empty payload.
pub fn unwrap(frame: &[u8]) -> &[u8] {
    frame.get(FRAME_HEADER_SIZE..).unwrap_or(&[])
}

/// Validate the structure of a frame.
///
/// Checks size, magic and that the version is at least 1. Any version up
/// to `i32::MAX` is structurally valid; an upper bound is a caller policy,
/// see [`validate_with_max`].
pub fn validate(frame: &[u8]) -> Result<FrameHeader, FrameError> {
    if frame.len() < FRAME_HEADER_SIZE {
        return Err(FrameError::TooSmall { size: frame.len() });
    }

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&frame[0..4]);
    if magic != FRAME_MAGIC {
        return Err(FrameError::BadMagic { found: magic });
    }

    let raw = i32::from_le_bytes([frame[4], frame[5], frame[6], frame[7]]);
    if raw < 1 {
        return Err(FrameError::BadVersion(raw));
    }

    Ok(FrameHeader {
        version: raw as SchemaVersion,
        payload_len: frame.len() - FRAME_HEADER_SIZE,
    })
}

/// Validate a frame and reject versions above `max_version`.
pub fn validate_with_max(
    frame: &[u8],
    max_version: Option<SchemaVersion>,
) -> Result<FrameHeader, FrameError> {
    let header = validate(frame)?;
    match max_version {
        Some(max) if header.version > max => Err(FrameError::VersionTooNew {
            found: header.version,
            max,
        }),
        _ => Ok(header),
    }
}

/// Frame validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Buffer shorter than the header
    #[error("Frame too small: {size} bytes, need at least {}", FRAME_HEADER_SIZE)]
    TooSmall {
        /// Actual buffer size
        size: usize,
    },

    /// Magic bytes do not match
    #[error("Bad frame magic: expected {:?}, found {found:?}", FRAME_MAGIC)]
    BadMagic {
        /// Bytes found at the magic offset
        found: [u8; 4],
    },

    /// Version field below 1
    #[error("Bad frame version: {0}")]
    BadVersion(i32),

    /// Version above the configured maximum
    #[error("Frame version {found} is newer than the maximum {max}")]
    VersionTooNew {
        /// Version found in the header
        found: SchemaVersion,
        /// Configured maximum
        max: SchemaVersion,
    },
}

impl FrameError {
    /// Short reason string for reports and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            FrameError::TooSmall { .. } => "too small",
            FrameError::BadMagic { .. } => "bad magic",
            FrameError::BadVersion(_) => "bad version",
            FrameError::VersionTooNew { .. } => "version too new",
        }
    }
}

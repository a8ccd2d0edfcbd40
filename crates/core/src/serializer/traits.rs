//! Serializer trait definitions.

/// Savestate serializer.
///
/// Converts a savestate to and from the opaque payload bytes that the
/// durability layer frames and writes. The durability layer never looks
/// inside a payload; everything format-specific lives behind this trait.
///
/// # Thread Safety
///
/// Serializers must be `Send + Sync` so one instance can be shared by
/// several streamers.
///
/// # Format Identity
///
/// Each serializer reports a short format identifier (`"json"`,
/// `"msgpack"`, ...). It is used to pick a serializer by name and shows up
/// in diagnostics.
pub trait Serializer<S>: Send + Sync {
    /// Encode a savestate into payload bytes.
    fn serialize(&self, state: &S) -> Result<Vec<u8>, SerializeError>;

    /// Decode payload bytes into a savestate.
    ///
    /// Returns an error if the bytes are not a valid encoding of `S`. The
    /// load pipeline treats that error like a corrupt frame.
    fn deserialize(&self, payload: &[u8]) -> Result<S, SerializeError>;

    /// Render payload bytes as human-readable text.
    ///
    /// Used for the debug export written next to the main save file.
    fn to_debug_text(&self, payload: &[u8]) -> Result<String, SerializeError>;

    /// Unique format identifier.
    fn format_id(&self) -> &str;
}

/// Serializer errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializeError {
    /// Encoding a savestate failed.
    #[error("Encode error (format={format_id}): {detail}")]
    Encode {
        /// Human-readable error description
        detail: String,
        /// Format that attempted the encode
        format_id: String,
    },

    /// Decoding payload bytes failed.
    ///
    /// Carries the format identity and payload length so callers can
    /// distinguish a wrong-format error from data corruption.
    #[error("Decode error (format={format_id}, data_len={data_len}): {detail}")]
    Decode {
        /// Human-readable error description
        detail: String,
        /// Format that attempted the decode
        format_id: String,
        /// Length of the payload that failed to decode
        data_len: usize,
    },

    /// Rendering the debug text failed.
    #[error("Debug render error (format={format_id}): {detail}")]
    DebugRender {
        /// Human-readable error description
        detail: String,
        /// Format that attempted the render
        format_id: String,
    },

    /// Unknown format identifier.
    #[error("Unknown serializer format: {0}")]
    UnknownFormat(String),
}

impl SerializeError {
    /// Create an encode error.
    pub fn encode(detail: impl Into<String>, format_id: impl Into<String>) -> Self {
        SerializeError::Encode {
            detail: detail.into(),
            format_id: format_id.into(),
        }
    }

    /// Create a decode error with full diagnostic context.
    pub fn decode(
        detail: impl Into<String>,
        format_id: impl Into<String>,
        data_len: usize,
    ) -> Self {
        SerializeError::Decode {
            detail: detail.into(),
            format_id: format_id.into(),
            data_len,
        }
    }

    /// Create a debug render error.
    pub fn debug_render(detail: impl Into<String>, format_id: impl Into<String>) -> Self {
        SerializeError::DebugRender {
            detail: detail.into(),
            format_id: format_id.into(),
        }
    }
}

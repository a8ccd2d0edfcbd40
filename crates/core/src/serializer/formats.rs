//! Serde-backed serializer strategies.
//!
//! Three interchangeable payload encodings:
//!
//! - [`JsonSerializer`]: `serde_json`, human-readable on disk
//! - [`MsgpackSerializer`]: `rmp-serde` with named fields, compact and self-describing
//! - [`BincodeSerializer`]: `bincode`, compact but not self-describing
//!
//! All of them render debug text as pretty-printed JSON.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::traits::{SerializeError, Serializer};

/// Format identifier of [`JsonSerializer`]
pub const JSON_FORMAT: &str = "json";
/// Format identifier of [`MsgpackSerializer`]
pub const MSGPACK_FORMAT: &str = "msgpack";
/// Format identifier of [`BincodeSerializer`]
pub const BINCODE_FORMAT: &str = "bincode";

macro_rules! serializer_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<S> {
            _marker: PhantomData<fn() -> S>,
        }

        impl<S> $name<S> {
            /// Create a new serializer
            pub fn new() -> Self {
                $name {
                    _marker: PhantomData,
                }
            }
        }

        impl<S> Default for $name<S> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<S> Clone for $name<S> {
            fn clone(&self) -> Self {
                Self::new()
            }
        }

        impl<S> fmt::Debug for $name<S> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(stringify!($name))
            }
        }
    };
}

serializer_type!(
    /// JSON payloads via `serde_json`.
    JsonSerializer
);

serializer_type!(
    /// MessagePack payloads via `rmp-serde`.
    ///
    /// Structs are written as maps with field names so that payloads stay
    /// readable in debug dumps and tolerate field reordering.
    MsgpackSerializer
);

serializer_type!(
    /// Bincode payloads.
    BincodeSerializer
);

impl<S> Serializer<S> for JsonSerializer<S>
where
    S: Serialize + DeserializeOwned,
{
    fn serialize(&self, state: &S) -> Result<Vec<u8>, SerializeError> {
        serde_json::to_vec(state).map_err(|e| SerializeError::encode(e.to_string(), JSON_FORMAT))
    }

    fn deserialize(&self, payload: &[u8]) -> Result<S, SerializeError> {
        serde_json::from_slice(payload)
            .map_err(|e| SerializeError::decode(e.to_string(), JSON_FORMAT, payload.len()))
    }

    fn to_debug_text(&self, payload: &[u8]) -> Result<String, SerializeError> {
        let value: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|e| SerializeError::debug_render(e.to_string(), JSON_FORMAT))?;
        serde_json::to_string_pretty(&value)
            .map_err(|e| SerializeError::debug_render(e.to_string(), JSON_FORMAT))
    }

    fn format_id(&self) -> &str {
        JSON_FORMAT
    }
}

impl<S> Serializer<S> for MsgpackSerializer<S>
where
    S: Serialize + DeserializeOwned,
{
    fn serialize(&self, state: &S) -> Result<Vec<u8>, SerializeError> {
        rmp_serde::to_vec_named(state)
            .map_err(|e| SerializeError::encode(e.to_string(), MSGPACK_FORMAT))
    }

    fn deserialize(&self, payload: &[u8]) -> Result<S, SerializeError> {
        rmp_serde::from_slice(payload)
            .map_err(|e| SerializeError::decode(e.to_string(), MSGPACK_FORMAT, payload.len()))
    }

    fn to_debug_text(&self, payload: &[u8]) -> Result<String, SerializeError> {
        let value: serde_json::Value = rmp_serde::from_slice(payload)
            .map_err(|e| SerializeError::debug_render(e.to_string(), MSGPACK_FORMAT))?;
        serde_json::to_string_pretty(&value)
            .map_err(|e| SerializeError::debug_render(e.to_string(), MSGPACK_FORMAT))
    }

    fn format_id(&self) -> &str {
        MSGPACK_FORMAT
    }
}

impl<S> Serializer<S> for BincodeSerializer<S>
where
    S: Serialize + DeserializeOwned,
{
    fn serialize(&self, state: &S) -> Result<Vec<u8>, SerializeError> {
        bincode::serialize(state).map_err(|e| SerializeError::encode(e.to_string(), BINCODE_FORMAT))
    }

    fn deserialize(&self, payload: &[u8]) -> Result<S, SerializeError> {
        bincode::deserialize(payload)
            .map_err(|e| SerializeError::decode(e.to_string(), BINCODE_FORMAT, payload.len()))
    }

    // Bincode is not self-describing, so the payload has to go through `S`.
    fn to_debug_text(&self, payload: &[u8]) -> Result<String, SerializeError> {
        let state: S = bincode::deserialize(payload)
            .map_err(|e| SerializeError::debug_render(e.to_string(), BINCODE_FORMAT))?;
        serde_json::to_string_pretty(&state)
            .map_err(|e| SerializeError::debug_render(e.to_string(), BINCODE_FORMAT))
    }

    fn format_id(&self) -> &str {
        BINCODE_FORMAT
    }
}

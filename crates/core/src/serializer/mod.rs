//! Serializer abstraction
//!
//! The durability layer treats savestate payloads as opaque bytes. This
//! module defines the seam through which a savestate becomes bytes and
//! back, plus the stock serde-based strategies.

mod formats;
mod traits;

pub use formats::{
    BincodeSerializer, JsonSerializer, MsgpackSerializer, BINCODE_FORMAT, JSON_FORMAT,
    MSGPACK_FORMAT,
};
pub use traits::{SerializeError, Serializer};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Get a serializer by format identifier.
///
/// Known identifiers: `"json"`, `"msgpack"`, `"bincode"`.
pub fn serializer_for<S>(format_id: &str) -> Result<Box<dyn Serializer<S>>, SerializeError>
where
    S: Serialize + DeserializeOwned + 'static,
{
    match format_id {
        JSON_FORMAT => Ok(Box::new(JsonSerializer::new())),
        MSGPACK_FORMAT => Ok(Box::new(MsgpackSerializer::new())),
        BINCODE_FORMAT => Ok(Box::new(BincodeSerializer::new())),
        other => Err(SerializeError::UnknownFormat(other.to_string())),
    }
}

//! Structured records.
//!
//! A [`Message`] is a type the writer can serialize into a record and the
//! reader can parse back. The raw-record path never touches this trait.
//!
//! Serde types get a CBOR encoding in two lines:
//!
//! ```
//! use extentlog_core::message::{from_cbor, to_cbor};
//! use extentlog_core::{CoreResult, Message};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Event {
//!     id: u64,
//!     name: String,
//! }
//!
//! impl Message for Event {
//!     fn encode(&self) -> CoreResult<Vec<u8>> {
//!         to_cbor(self)
//!     }
//!
//!     fn decode(bytes: &[u8]) -> CoreResult<Self> {
//!         from_cbor(bytes)
//!     }
//!
//!     fn is_valid(&self) -> bool {
//!         !self.name.is_empty()
//!     }
//! }
//! ```

use crate::error::{CoreError, CoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Cursor;

/// A structured record.
pub trait Message: Sized {
    /// Serializes the message into record bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be serialized.
    fn encode(&self) -> CoreResult<Vec<u8>>;

    /// Parses record bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is not an encoding of this type.
    fn decode(bytes: &[u8]) -> CoreResult<Self>;

    /// Structural validation, such as required fields being present.
    ///
    /// Invalid messages are never written, and parsed records that fail this
    /// check are skipped by the reader.
    fn is_valid(&self) -> bool {
        true
    }
}

/// Serializes a value to CBOR.
///
/// # Errors
///
/// Returns a `Message` error if serialization fails.
pub fn to_cbor<T: Serialize + ?Sized>(value: &T) -> CoreResult<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf)
        .map_err(|e| CoreError::message(format!("failed to encode CBOR: {e}")))?;
    Ok(buf)
}

/// Deserializes a value from CBOR occupying all of `bytes`.
///
/// # Errors
///
/// Returns a `Message` error if `bytes` does not hold exactly one CBOR
/// value of type `T`.
pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> CoreResult<T> {
    let mut cursor = Cursor::new(bytes);
    let value = ciborium::from_reader(&mut cursor)
        .map_err(|e| CoreError::message(format!("failed to decode CBOR: {e}")))?;
    let consumed = cursor.position();
    if consumed != bytes.len() as u64 {
        return Err(CoreError::message(format!(
            "{} trailing bytes after CBOR value",
            bytes.len() as u64 - consumed
        )));
    }
    Ok(value)
}

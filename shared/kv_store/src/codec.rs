//! Value codecs
//!
//! A codec turns a value into the bytes stored in the value attribute and
//! back. JSON is the default; CBOR is available for a more compact binary
//! encoding.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors produced by a codec
#[derive(Error, Debug)]
pub enum CodecError {
    /// JSON serialization or deserialization failed
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// CBOR serialization failed
    #[error("CBOR encoding error: {0}")]
    CborEncode(String),

    /// CBOR deserialization failed
    #[error("CBOR decoding error: {0}")]
    CborDecode(String),
}

/// Encodes values to bytes and decodes them back
pub trait Codec: Send + Sync {
    /// Encodes `value` into bytes
    ///
    /// # Errors
    ///
    /// Returns `CodecError` if the value cannot be represented in this format
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    /// Decodes `data` into a value of type `T`
    ///
    /// # Errors
    ///
    /// Returns `CodecError` if `data` is not a valid encoding of `T`
    fn unmarshal<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError>;
}

/// JSON codec backed by `serde_json`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn unmarshal<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// CBOR codec backed by `ciborium`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CborCodec;

impl Codec for CborCodec {
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| CodecError::CborEncode(e.to_string()))?;
        Ok(buf)
    }

    fn unmarshal<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        ciborium::from_reader(data).map_err(|e| CodecError::CborDecode(e.to_string()))
    }
}

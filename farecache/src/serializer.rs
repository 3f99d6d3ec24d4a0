//! Binary encoding of offer lists for cache storage.
//!
//! The collection is flattened to a `Vec<Trip>` on the way in and the
//! dedup rule is re-applied on the way out, so a payload written by an
//! older build with looser dedup still decodes into a consistent
//! collection.

use aggregator::{Trip, Trips};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("encode failed: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("decode failed: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("trailing bytes after payload")]
    TrailingBytes,
}

pub fn encode(trips: &Trips) -> Result<Vec<u8>, SerializeError> {
    if trips.is_empty() {
        return Ok(Vec::new());
    }
    let flat = trips.to_vec();
    Ok(bincode::serde::encode_to_vec(
        &flat,
        bincode::config::standard(),
    )?)
}

pub fn decode(bytes: &[u8]) -> Result<Trips, SerializeError> {
    if bytes.is_empty() {
        return Ok(Trips::new());
    }
    let (flat, consumed): (Vec<Trip>, usize) =
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
    if consumed != bytes.len() {
        return Err(SerializeError::TrailingBytes);
    }
    Ok(Trips::from(flat))
}

//! Error type for remote list service calls.
//!
//! # Design
//! Every failure the store can observe is a `NetworkError`: the transport
//! could not complete the round-trip, the service answered with a non-2xx
//! status, or the body did not decode. `NotFound` keeps its own variant so
//! callers can tell "the record is gone" apart from a server fault.
//!
//! The type is `Clone + PartialEq` because the store keeps the last error
//! as state and hands out references to it.

use thiserror::Error;

/// Failure of a single remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The service returned 404 for the addressed todo.
    #[error("todo not found")]
    NotFound,

    /// The service returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The request payload could not be encoded to JSON.
    #[error("request encoding failed: {0}")]
    Encode(String),
}

//! Error types for the RocketReach client.
//!
//! # Design
//! Failures come in two tiers. Transport-level failures (`Transport`, `Http`,
//! `Deserialization`) mean the round-trip itself did not produce a usable
//! body; they are passed through composed operations untouched. `NotAvailable`
//! means the call succeeded but the body does not carry the requested fact,
//! so callers can tell "the API call failed" from "this company has no data".

use thiserror::Error;

/// Errors returned by `RocketReachClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport could not complete the request (DNS, TLS, IO, timeout).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be parsed as JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The client could not be constructed from the supplied settings.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The response was well-formed but lacks the requested field.
    #[error("{0}")]
    NotAvailable(&'static str),
}

impl ApiError {
    /// `true` for the shape-mismatch tier, `false` for transport failures.
    pub fn is_not_available(&self) -> bool {
        matches!(self, ApiError::NotAvailable(_))
    }
}

//! Error types for the identification client.

use thiserror::Error;

/// Errors that can occur when talking to the identification service.
///
/// A call either fully succeeds with a typed result or fully fails with
/// one of these values; there is no partial-success state.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ClientError {
    /// Connectivity or transport failure before a status was received.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Service answered with a status outside 200-299.
    #[error("Unexpected HTTP status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// Response body does not match the expected schema, or a request
    /// payload could not be serialized.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

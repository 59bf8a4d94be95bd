//! Error types for netcad-origin.

use thiserror::Error;

/// Failures talking to an origin.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport, TLS, timeout, or body decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The origin answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Errors that abort a sync call as a whole.
///
/// Per-key failures are never reported here; they are recorded in the
/// [`SyncReport`](crate::pipeline::SyncReport).
#[derive(Debug, Error)]
pub enum SyncError {
    /// No keys were supplied.
    #[error("sync requires at least one key")]
    EmptyBatch,

    /// The origin client could not be constructed.
    #[error("origin client error: {0}")]
    Client(#[from] ClientError),
}

//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the simulation.
///
/// There is no recoverable path inside the core: once a lock primitive fails
/// or a task cannot be joined, the event log is unreliable and the run must
/// abort with a non-zero status.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid simulation parameters, rejected before any task starts.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A lock primitive failed (poisoned state lock). Fatal.
    #[error("resource acquisition failed: {0}")]
    ResourceAcquisition(String),

    /// A philosopher task could not be awaited during cleanup. Fatal.
    #[error("task join failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

// Convenience constructors
impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn resource_acquisition(msg: impl Into<String>) -> Self {
        Self::ResourceAcquisition(msg.into())
    }
}

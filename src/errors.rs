//! Index-Lifecycle Sidecar Error Hierarchy
//!
//! Defines error types for the lifecycle reconciler and its collaborators,
//! categorized by operational concern. The reconciler never panics on an
//! operational path: every failure mode below maps onto one branch of the
//! tick taxonomy (transient, per-entry, or permanent).

use std::time::Duration;

use chrono::NaiveDate;
use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Infrastructure-level failures (network, serialization, process)
    #[error(transparent)]
    System(#[from] SystemError),

    /// Sidecar configuration validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Index-lifecycle domain failures (descriptors, dates, acknowledgements)
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Unrecoverable failures requiring process termination
    #[error("Fatal error: {0}")]
    Fatal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    // Network layer
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    // Serialization
    #[error("Serialization error")]
    Serialization(#[from] SerializationError),

    // Basic process operations
    #[error("Sidecar failed to start: {0}")]
    NodeStartFailed(String),

    #[error("{0}")]
    SignalSenderClosed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Endpoint reachable but refusing service (HTTP 503 equivalent)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Engine communication timeout
    #[error("Request to {endpoint} timed out after {duration:?}")]
    Timeout { endpoint: String, duration: Duration },

    /// Malformed engine addresses
    #[error("Invalid URI format: {0}")]
    InvalidUri(String),

    /// Leader probe returned a line the positional parser cannot use
    #[error("Malformed cluster status line: {0:?}")]
    MalformedStatusLine(String),

    /// Engine answered with a status the client does not expect
    #[error("Unexpected status {status} from {endpoint}")]
    UnexpectedStatus { endpoint: String, status: u16 },

    /// HTTP transport layer errors
    #[error(transparent)]
    Http(#[from] Box<reqwest::Error>),
}

// Serialization is classified separately (it crosses the network and
// configuration layers)
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// Operator-supplied descriptor list did not parse
    #[error("Malformed index descriptor list: {0}")]
    Descriptors(#[source] serde_json::Error),

    /// Descriptor parsed but violates a naming invariant
    #[error("Invalid index name {name:?}: {reason}")]
    InvalidIndexName { name: String, reason: &'static str },

    /// An index name matched the pattern filter but its suffix did not parse
    #[error("Index name {name:?} does not carry a parsable date suffix")]
    UnparsableDateSuffix { name: String },

    /// Calendar arithmetic left chrono's representable range
    #[error("Calendar arithmetic out of range: {periods} {unit} step from {date}")]
    CalendarOverflow {
        date: NaiveDate,
        periods: u32,
        unit: &'static str,
    },

    /// The cluster accepted but did not acknowledge a deletion
    #[error("Deletion of index {index:?} was not acknowledged by the cluster")]
    DeleteNotAcknowledged { index: String },
}

// ============== Conversion Implementations ============== //
impl From<NetworkError> for Error {
    fn from(e: NetworkError) -> Self {
        Error::System(SystemError::Network(e))
    }
}

impl From<SerializationError> for Error {
    fn from(e: SerializationError) -> Self {
        Error::System(SystemError::Serialization(e))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::System(SystemError::Io(e))
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        NetworkError::Http(Box::new(err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        NetworkError::Http(Box::new(err)).into()
    }
}

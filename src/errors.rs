//! Error types for membership store operations

use thiserror::Error;

/// Errors that can occur while talking to the membership store
///
/// These are infrastructure failures, distinct from admission refusals
/// (`AlreadyMember`, `CapacityExceeded`, ...) which are normal, typed
/// outcomes of contention and never surface as `Err`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// NATS connection error
    #[error("NATS connection error: {0}")]
    NatsConnection(String),

    /// Key-value bucket operation error
    #[error("Key-value operation error: {0}")]
    KeyValue(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Membership record already exists for this event
    #[error("Membership record already exists for event: {0}")]
    AlreadyExists(String),

    /// Concurrent writers kept the record changing for the whole bounded
    /// compare-and-swap budget. Transient; safe for the caller to retry.
    #[error("Exhausted {attempts} compare-and-swap attempts: {context}")]
    Contention { attempts: u32, context: String },

    /// Event publish error
    #[error("Publish error: {0}")]
    Publish(String),
}

/// Result type for membership store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<async_nats::Error> for StoreError {
    fn from(err: async_nats::Error) -> Self {
        StoreError::NatsConnection(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

//! Error types and result handling for log-producer.
//!
//! This module defines the main error type [`Error`] and a convenience
//! [`Result`] type alias used throughout the crate.
//!
//! Only startup can fail: an unreachable broker endpoint or an exhausted
//! connection retry budget. Per-record delivery failures are not errors at
//! this level, they are reported as
//! [`DeliveryOutcome::Dropped`](crate::kafka::DeliveryOutcome::Dropped).
//!
//! # Example
//!
//! ```rust
//! use log_producer::{Error, Result};
//!
//! fn open_session() -> Result<()> {
//!     Err(Error::NoBrokersAvailable("metadata fetch timed out".to_string()))
//! }
//!
//! match open_session() {
//!     Ok(()) => println!("Connected"),
//!     Err(e) if e.is_retryable() => eprintln!("Will retry: {}", e),
//!     Err(e) => eprintln!("Fatal: {}", e),
//! }
//! ```

use std::time::Duration;
use thiserror::Error;

/// The main error type for log-producer operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error from defaults, environment variables or flags.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Kafka client or producer error.
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    /// JSON serialization error when encoding records.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The broker endpoint never accepted a TCP connection within the
    /// probe timeout.
    #[error("Broker unavailable at {host}:{port} after {elapsed:?}")]
    BrokerUnavailable {
        host: String,
        port: u16,
        elapsed: Duration,
    },

    /// A producer session was created but no broker answered.
    ///
    /// This is the only error the connection retry loop retries on.
    #[error("No brokers available: {0}")]
    NoBrokersAvailable(String),

    /// Every connection attempt failed with [`Error::NoBrokersAvailable`].
    #[error("Unable to connect to the broker after {attempts} attempts")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
    },

    /// The record catalog cannot be sampled from (no applications, an empty
    /// message pool, or unusable weights).
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Generic connection error not covered by specific types.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Operation timeout.
    #[error("Timeout error: {message}")]
    Timeout {
        /// Description of what timed out
        message: String,
    },
}

impl Error {
    /// Whether the connection manager should back off and try again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::NoBrokersAvailable(_))
    }

    /// Process exit status for a fatal startup error.
    ///
    /// Retry exhaustion exits with `1`, a probe timeout with `2`. Anything
    /// else that reaches `main` is also reported as `1`.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::BrokerUnavailable { .. } => 2,
            _ => 1,
        }
    }
}

/// A convenient Result type alias for log-producer operations.
///
/// This is equivalent to `std::result::Result<T, log_producer::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

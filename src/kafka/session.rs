//! Producer session lifecycle.
//!
//! [`connect`] opens a [`Session`] through a [`Connector`] with a bounded,
//! fixed-delay retry, and wraps it in a [`Connection`] that releases the
//! session exactly once.

use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Broker acknowledgment for one published record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub partition: i32,
    pub offset: i64,
}

/// An open producer session.
///
/// `publish` resolves only once the broker has acknowledged the record (or
/// refused it). Calls are made sequentially from a single task.
#[async_trait]
pub trait Session: Send + Sync {
    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<Delivery>;

    /// Blocks until every outstanding send is acknowledged or `timeout`
    /// elapses.
    fn flush(&self, timeout: Duration) -> Result<()>;
}

/// Opens producer sessions.
///
/// Return [`Error::NoBrokersAvailable`] for "nothing answered, try again";
/// any other error aborts [`connect`] immediately.
#[async_trait]
pub trait Connector: Send + Sync {
    type Session: Session;

    async fn open(&self) -> Result<Self::Session>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// Opens a session, retrying up to `policy.max_retries` times while no
/// broker is reachable.
///
/// # Errors
///
/// - [`Error::RetriesExhausted`] when every attempt failed with a retryable
///   error.
/// - The connector's own error when it is not retryable.
pub async fn connect<C: Connector>(
    connector: &C,
    policy: RetryPolicy,
    flush_timeout: Duration,
) -> Result<Connection<C::Session>> {
    for attempt in 1..=policy.max_retries {
        info!(attempt, max_retries = policy.max_retries, "Connecting to broker");

        match connector.open().await {
            Ok(session) => {
                info!(attempt, "Connected to broker");
                return Ok(Connection::new(session, flush_timeout));
            }
            Err(e) if e.is_retryable() => {
                if attempt < policy.max_retries {
                    warn!(
                        attempt,
                        "{}. Retrying in {:?}", e, policy.retry_delay
                    );
                    sleep(policy.retry_delay).await;
                } else {
                    warn!(attempt, "{}", e);
                }
            }
            Err(e) => {
                error!(attempt, "Connection attempt failed: {}", e);
                return Err(e);
            }
        }
    }

    error!(
        attempts = policy.max_retries,
        "Unable to connect to the broker, giving up"
    );
    Err(Error::RetriesExhausted {
        attempts: policy.max_retries,
    })
}

/// Owns a [`Session`] for the lifetime of the process.
///
/// [`close`](Connection::close) consumes the connection, so it can run at
/// most once. A connection dropped without being closed flushes in `Drop`.
pub struct Connection<S: Session> {
    session: S,
    flush_timeout: Duration,
    closed: bool,
}

impl<S: Session> Connection<S> {
    pub fn new(session: S, flush_timeout: Duration) -> Self {
        Self {
            session,
            flush_timeout,
            closed: false,
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Flushes outstanding sends and releases the session.
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        info!(timeout = ?self.flush_timeout, "Flushing producer and closing session");
        self.session.flush(self.flush_timeout)
    }
}

impl<S: Session> Drop for Connection<S> {
    fn drop(&mut self) {
        if !self.closed {
            warn!("Connection dropped without close");
            if let Err(e) = self.release() {
                error!("Failed to flush producer on drop: {}", e);
            }
        }
    }
}

//! Broker availability gating.
//!
//! Before a producer session is created the process waits for the broker's
//! TCP endpoint to accept connections. Containerised brokers often take a
//! while to come up, and rdkafka would otherwise spend the connection retry
//! budget on a port that is not even listening yet.

use crate::{Error, Result};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, instrument};

/// Polling parameters for [`wait_ready`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Give up once this much time has elapsed since the first attempt.
    pub timeout: Duration,
    /// Pause between failed attempts.
    pub interval: Duration,
    /// Upper bound for a single TCP connect.
    pub attempt_timeout: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            interval: Duration::from_secs(2),
            attempt_timeout: Duration::from_secs(2),
        }
    }
}

/// Blocks until `host:port` accepts a TCP connection.
///
/// # Errors
///
/// Returns [`Error::BrokerUnavailable`] once `settings.timeout` has elapsed
/// without a successful connect. The error carries the elapsed time so the
/// operator can tell a slow broker from a missing one.
#[instrument(skip(settings), fields(timeout = ?settings.timeout))]
pub async fn wait_ready(host: &str, port: u16, settings: ProbeSettings) -> Result<()> {
    info!(
        "Waiting for broker at {}:{} (timeout {:?})",
        host, port, settings.timeout
    );

    let start = Instant::now();
    let mut attempts = 0u32;

    while start.elapsed() < settings.timeout {
        attempts += 1;

        match timeout(settings.attempt_timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(_stream)) => {
                info!(attempts, elapsed = ?start.elapsed(), "Broker is accepting connections");
                return Ok(());
            }
            Ok(Err(e)) => {
                debug!(attempt = attempts, "Broker not reachable yet: {}", e);
            }
            Err(_) => {
                debug!(attempt = attempts, "Connect attempt timed out");
            }
        }

        sleep(settings.interval).await;
    }

    Err(Error::BrokerUnavailable {
        host: host.to_string(),
        port,
        elapsed: start.elapsed(),
    })
}

#![allow(dead_code)]

use async_trait::async_trait;
use log_producer::config::Config;
use log_producer::kafka::{Connector, Delivery, Session};
use log_producer::{Error, Result};
use std::env;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Get test configuration from environment variables
pub fn get_test_config() -> Config {
    let mut config = Config::default();

    let brokers = env::var("TEST_KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string());
    let (host, port) = brokers.split_once(':').unwrap_or((brokers.as_str(), "9092"));
    config.broker.host = host.to_string();
    config.broker.port = port.parse().unwrap_or(9092);
    config.broker.message_timeout_ms = 5_000;

    config.startup.wait_timeout_secs = 10;
    config.startup.probe_interval_ms = 200;
    config.startup.max_retries = 3;
    config.startup.retry_delay_ms = 100;

    config.producer.topic_prefix = format!("test_{}", std::process::id());
    config.producer.interval_ms = 50;

    config
}

/// A published record as seen by [`MemorySession`].
#[derive(Debug, Clone)]
pub struct Published {
    pub topic: String,
    pub key: String,
    pub payload: Vec<u8>,
}

/// In-memory session that records every publish and counts flushes.
#[derive(Clone, Default)]
pub struct MemorySession {
    pub published: Arc<Mutex<Vec<Published>>>,
    pub flushes: Arc<AtomicU32>,
    pub failing: Arc<AtomicBool>,
    /// Fail only every n-th publish (1-based) when non-zero.
    pub fail_every: usize,
    calls: Arc<AtomicUsize>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let session = Self::default();
        session.failing.store(true, Ordering::SeqCst);
        session
    }

    pub fn failing_every(n: usize) -> Self {
        Self {
            fail_every: n,
            ..Self::default()
        }
    }

    pub fn published(&self) -> Vec<Published> {
        self.published.lock().unwrap().clone()
    }

    pub fn flush_count(&self) -> u32 {
        self.flushes.load(Ordering::SeqCst)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Session for MemorySession {
    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<Delivery> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if self.failing.load(Ordering::SeqCst) || (self.fail_every > 0 && call % self.fail_every == 0) {
            return Err(Error::Connection("simulated broker failure".to_string()));
        }

        let mut published = self.published.lock().unwrap();
        published.push(Published {
            topic: topic.to_string(),
            key: key.to_string(),
            payload: payload.to_vec(),
        });

        Ok(Delivery {
            partition: 0,
            offset: published.len() as i64 - 1,
        })
    }

    fn flush(&self, _timeout: Duration) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Connector that reports "no brokers" for the first `rejections` attempts.
pub struct RejectingConnector {
    pub rejections: u32,
    pub attempts: AtomicU32,
    pub session: MemorySession,
}

impl RejectingConnector {
    pub fn new(rejections: u32) -> Self {
        Self {
            rejections,
            attempts: AtomicU32::new(0),
            session: MemorySession::new(),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for RejectingConnector {
    type Session = MemorySession;

    async fn open(&self) -> Result<MemorySession> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.rejections {
            Err(Error::NoBrokersAvailable(format!("attempt {} rejected", attempt)))
        } else {
            Ok(self.session.clone())
        }
    }
}

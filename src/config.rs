use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::kafka::RetryPolicy;
use crate::probe::ProbeSettings;
use crate::runner::RunSettings;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub broker: BrokerConfig,
    #[serde(default)]
    pub startup: StartupConfig,
    #[serde(default)]
    pub producer: ProducerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrokerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_acks")]
    pub acks: String,
    #[serde(default = "default_message_timeout_ms")]
    pub message_timeout_ms: u64,
    #[serde(default = "default_metadata_timeout_secs")]
    pub metadata_timeout_secs: u64,
    #[serde(default = "default_flush_timeout_secs")]
    pub flush_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StartupConfig {
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,
    #[serde(default = "default_probe_attempt_timeout_ms")]
    pub probe_attempt_timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProducerConfig {
    #[serde(default = "default_topic_prefix")]
    pub topic_prefix: String,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_ack_timeout_secs")]
    pub ack_timeout_secs: u64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub max_batches: Option<u64>,
}

impl Config {
    /// Builds the configuration from built-in defaults overlaid with
    /// `LOG_PRODUCER__<SECTION>__<KEY>` environment variables.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Config::default())?)
            .add_source(
                config::Environment::with_prefix("LOG_PRODUCER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn bootstrap_servers(&self) -> String {
        format!("{}:{}", self.broker.host, self.broker.port)
    }

    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            timeout: Duration::from_secs(self.startup.wait_timeout_secs),
            interval: Duration::from_millis(self.startup.probe_interval_ms),
            attempt_timeout: Duration::from_millis(self.startup.probe_attempt_timeout_ms),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.startup.max_retries,
            retry_delay: Duration::from_millis(self.startup.retry_delay_ms),
        }
    }

    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            interval: Duration::from_millis(self.producer.interval_ms),
            max_batches: self.producer.max_batches,
        }
    }

    pub fn ack_timeout(&self) -> Duration {
        Duration::from_secs(self.producer.ack_timeout_secs)
    }

    pub fn flush_timeout(&self) -> Duration {
        Duration::from_secs(self.broker.flush_timeout_secs)
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            compression: default_compression(),
            acks: default_acks(),
            message_timeout_ms: default_message_timeout_ms(),
            metadata_timeout_secs: default_metadata_timeout_secs(),
            flush_timeout_secs: default_flush_timeout_secs(),
        }
    }
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            wait_timeout_secs: default_wait_timeout_secs(),
            probe_interval_ms: default_probe_interval_ms(),
            probe_attempt_timeout_ms: default_probe_attempt_timeout_ms(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            topic_prefix: default_topic_prefix(),
            interval_ms: default_interval_ms(),
            ack_timeout_secs: default_ack_timeout_secs(),
            seed: None,
            max_batches: None,
        }
    }
}

fn default_host() -> String {
    "redpanda".to_string()
}

fn default_port() -> u16 {
    9092
}

fn default_compression() -> String {
    "gzip".to_string()
}

fn default_acks() -> String {
    "all".to_string()
}

fn default_message_timeout_ms() -> u64 {
    30_000
}

fn default_metadata_timeout_secs() -> u64 {
    5
}

fn default_flush_timeout_secs() -> u64 {
    10
}

fn default_wait_timeout_secs() -> u64 {
    60
}

fn default_probe_interval_ms() -> u64 {
    2_000
}

fn default_probe_attempt_timeout_ms() -> u64 {
    2_000
}

fn default_max_retries() -> u32 {
    10
}

fn default_retry_delay_ms() -> u64 {
    5_000
}

fn default_topic_prefix() -> String {
    "logs".to_string()
}

fn default_interval_ms() -> u64 {
    2_000
}

fn default_ack_timeout_secs() -> u64 {
    30
}

use crate::kafka::session::{Connector, Delivery, Session};
use crate::{Config, Error, Result};
use async_trait::async_trait;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use rdkafka::ClientConfig;
use std::time::Duration;
use tracing::debug;

/// Creates rdkafka producers and checks that a broker answers before
/// handing them out.
#[derive(Debug, Clone)]
pub struct KafkaConnector {
    bootstrap_servers: String,
    compression: String,
    acks: String,
    message_timeout_ms: u64,
    metadata_timeout: Duration,
}

impl KafkaConnector {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bootstrap_servers: config.bootstrap_servers(),
            compression: config.broker.compression.clone(),
            acks: config.broker.acks.clone(),
            message_timeout_ms: config.broker.message_timeout_ms,
            metadata_timeout: Duration::from_secs(config.broker.metadata_timeout_secs),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut client_config = ClientConfig::new();
        client_config
            .set("bootstrap.servers", &self.bootstrap_servers)
            .set("acks", &self.acks)
            .set("compression.type", &self.compression)
            .set("message.timeout.ms", self.message_timeout_ms.to_string());
        client_config
    }
}

#[async_trait]
impl Connector for KafkaConnector {
    type Session = KafkaSession;

    async fn open(&self) -> Result<KafkaSession> {
        let producer: FutureProducer = self.client_config().create()?;

        // librdkafka connects lazily, so creating the producer proves nothing.
        let client = producer.clone();
        let metadata_timeout = self.metadata_timeout;
        let brokers = tokio::task::spawn_blocking(move || {
            client
                .client()
                .fetch_metadata(None, metadata_timeout)
                .map(|metadata| metadata.brokers().len())
        })
        .await
        .map_err(|e| Error::Connection(format!("Metadata fetch task failed: {}", e)))?;

        match brokers {
            Ok(0) => Err(Error::NoBrokersAvailable(
                "cluster metadata lists no brokers".to_string(),
            )),
            Ok(count) => {
                debug!(brokers = count, servers = %self.bootstrap_servers, "Fetched cluster metadata");
                Ok(KafkaSession {
                    producer,
                    queue_timeout: Duration::from_millis(self.message_timeout_ms),
                })
            }
            Err(e) => Err(Error::NoBrokersAvailable(e.to_string())),
        }
    }
}

/// A live rdkafka producer.
pub struct KafkaSession {
    producer: FutureProducer,
    queue_timeout: Duration,
}

#[async_trait]
impl Session for KafkaSession {
    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<Delivery> {
        let record = FutureRecord::to(topic).key(key).payload(payload);

        let (partition, offset) = self
            .producer
            .send(record, Timeout::After(self.queue_timeout))
            .await
            .map_err(|(e, _)| Error::Kafka(e))?;

        Ok(Delivery { partition, offset })
    }

    fn flush(&self, timeout: Duration) -> Result<()> {
        self.producer
            .flush(Timeout::After(timeout))
            .map_err(Error::Kafka)
    }
}

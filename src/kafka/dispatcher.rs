use crate::kafka::router::Route;
use crate::kafka::serializer::JsonSerializer;
use crate::kafka::session::{Delivery, Session};
use crate::record::LogRecord;
use crate::Error;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

/// Result of handing one record to the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered(Delivery),
    /// The record was lost. Synthetic traffic is not retried.
    Dropped { reason: String },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered(_))
    }
}

/// Publishes records one at a time and waits for each acknowledgment.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    ack_timeout: Duration,
}

impl Dispatcher {
    pub fn new(ack_timeout: Duration) -> Self {
        Self { ack_timeout }
    }

    /// Sends `record` to `route`. Never fails: errors become
    /// [`DeliveryOutcome::Dropped`].
    pub async fn send<S: Session + ?Sized>(
        &self,
        session: &S,
        route: &Route,
        record: &LogRecord,
    ) -> DeliveryOutcome {
        let payload = match JsonSerializer::serialize(record) {
            Ok(payload) => payload,
            Err(e) => return dropped(route, record, e),
        };

        let result = match timeout(
            self.ack_timeout,
            session.publish(&route.topic, &route.key, &payload),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                message: format!("no acknowledgment within {:?}", self.ack_timeout),
            }),
        };

        match result {
            Ok(delivery) => {
                info!(
                    partition = delivery.partition,
                    offset = delivery.offset,
                    "[{}] {:15} -> {:25} | {}",
                    record.level,
                    record.application.name,
                    route.topic,
                    record.message
                );
                DeliveryOutcome::Delivered(delivery)
            }
            Err(e) => dropped(route, record, e),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

fn dropped(route: &Route, record: &LogRecord, error: Error) -> DeliveryOutcome {
    warn!(
        level = %record.level,
        application = %record.application.name,
        topic = %route.topic,
        message = %record.message,
        "Dropping record: {}",
        error
    );
    DeliveryOutcome::Dropped {
        reason: error.to_string(),
    }
}

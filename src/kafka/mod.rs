pub mod dispatcher;
pub mod producer;
pub mod router;
pub mod serializer;
pub mod session;


pub use dispatcher::{DeliveryOutcome, Dispatcher};
pub use producer::{KafkaConnector, KafkaSession};
pub use router::{partition_key, Route, Router};
pub use serializer::JsonSerializer;
pub use session::{connect, Connection, Connector, Delivery, RetryPolicy, Session};

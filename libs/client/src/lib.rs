pub mod config;
pub mod error;
mod consumer;
mod producer;

pub use config::RelayConfig;
pub use consumer::KafkaPoller;
pub use error::ClientError;
pub use producer::{DeliveryContext, KafkaSender};

/// Плоская карта librdkafka-свойств, передаётся клиенту как есть.
pub use rdkafka::config::ClientConfig;

use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{BaseConsumer, Consumer};
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::message::{BorrowedMessage, Message};

use relay_api::{ConsumedRecord, PollError, PollOutcome, RecordPoller};

use crate::error::ClientError;

/// Consumer, подписанный на один topic в рамках consumer group из конфига.
///
/// Offset'ы коммитит сам librdkafka (auto-commit), отписка — при drop.
pub struct KafkaPoller {
    consumer: BaseConsumer,
    topic: String,
}

impl KafkaPoller {
    pub fn subscribe(config: &ClientConfig, topic: &str) -> Result<Self, ClientError> {
        let consumer: BaseConsumer = config
            .create()
            .map_err(|source| ClientError::Create { role: "consumer", source })?;
        consumer
            .subscribe(&[topic])
            .map_err(|source| ClientError::Subscribe { topic: topic.to_string(), source })?;
        tracing::debug!(topic = %topic, "subscribed");
        Ok(Self {
            consumer,
            topic: topic.to_string(),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl RecordPoller for KafkaPoller {
    fn poll(&self, timeout: Duration) -> PollOutcome {
        match self.consumer.poll(timeout) {
            None => PollOutcome::Timeout,
            Some(Ok(msg)) => PollOutcome::Record(to_consumed(&msg)),
            Some(Err(e)) => classify_error(e),
        }
    }
}

fn to_consumed(msg: &BorrowedMessage<'_>) -> ConsumedRecord {
    ConsumedRecord {
        topic: msg.topic().to_string(),
        partition: msg.partition(),
        offset: msg.offset(),
        key: msg.key().map(<[u8]>::to_vec),
        timestamp_ms: msg.timestamp().to_millis(),
        payload: msg.payload().map(<[u8]>::to_vec).unwrap_or_default(),
    }
}

/// Локальный таймаут librdkafka — тот же `Timeout`, а не ошибка.
fn classify_error(err: KafkaError) -> PollOutcome {
    match err.rdkafka_error_code() {
        Some(RDKafkaErrorCode::OperationTimedOut) => PollOutcome::Timeout,
        _ => PollOutcome::Error(PollError(err.to_string())),
    }
}

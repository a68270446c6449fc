//! Producer поверх `ThreadedProducer`.
//!
//! librdkafka вызывает delivery callback'и из своего фонового потока;
//! `DeliveryContext` перекладывает их в unbounded канал, который разгребает
//! отдельная задача. Канал закрывается, когда producer (а с ним и контекст)
//! уничтожен.

use std::time::Duration;

use rdkafka::client::ClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::message::Message;
use rdkafka::producer::{BaseRecord, DeliveryResult, Producer, ProducerContext, ThreadedProducer};
use tokio::sync::mpsc;

use relay_api::{DeliveryReport, FlushError, ProducerEvent, RecordSender, SendError};

use crate::error::ClientError;

// ═══════════════════════════════════════════════════════════════
//  DeliveryContext — rdkafka callbacks → channel
// ═══════════════════════════════════════════════════════════════

pub struct DeliveryContext {
    events: mpsc::UnboundedSender<ProducerEvent>,
}

impl DeliveryContext {
    pub fn new(events: mpsc::UnboundedSender<ProducerEvent>) -> Self {
        Self { events }
    }

    fn emit(&self, event: ProducerEvent) {
        // Receiver ушёл — события больше никому не нужны.
        let _ = self.events.send(event);
    }
}

impl ClientContext for DeliveryContext {
    fn error(&self, error: KafkaError, reason: &str) {
        self.emit(ProducerEvent::ClientError(format!("{error}: {reason}")));
    }

    fn stats_raw(&self, _statistics: &[u8]) {
        self.emit(ProducerEvent::Other("statistics"));
    }
}

impl ProducerContext for DeliveryContext {
    type DeliveryOpaque = ();

    fn delivery(&self, delivery_result: &DeliveryResult<'_>, _: Self::DeliveryOpaque) {
        let report = match delivery_result {
            Ok(msg) => DeliveryReport::delivered(msg.topic(), msg.partition(), msg.offset()),
            Err((err, msg)) => DeliveryReport::failed(msg.topic(), msg.partition(), err.to_string()),
        };
        self.emit(ProducerEvent::Delivery(report));
    }
}

// ═══════════════════════════════════════════════════════════════
//  KafkaSender
// ═══════════════════════════════════════════════════════════════

pub struct KafkaSender {
    producer: ThreadedProducer<DeliveryContext>,
}

impl KafkaSender {
    /// Создать producer. Вторым значением — поток событий доставки.
    pub fn create(
        config: &ClientConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ProducerEvent>), ClientError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let producer: ThreadedProducer<DeliveryContext> = config
            .create_with_context(DeliveryContext::new(tx))
            .map_err(|source| ClientError::Create { role: "producer", source })?;
        Ok((Self { producer }, rx))
    }
}

impl RecordSender for KafkaSender {
    fn send(&self, topic: &str, payload: &[u8]) -> Result<(), SendError> {
        let record = BaseRecord::<(), [u8]>::to(topic).payload(payload);
        self.producer.send(record).map_err(|(err, _)| SendError {
            topic: topic.to_string(),
            message: err.to_string(),
        })
    }

    fn flush(&self, timeout: Duration) -> Result<(), FlushError> {
        self.producer.flush(timeout).map_err(|e| flush_error(e, timeout))
    }
}

fn flush_error(err: KafkaError, timeout: Duration) -> FlushError {
    match err.rdkafka_error_code() {
        Some(RDKafkaErrorCode::OperationTimedOut) => FlushError::Timeout(timeout),
        _ => FlushError::Other(err.to_string()),
    }
}

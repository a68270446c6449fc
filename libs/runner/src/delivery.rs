use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use relay_api::{DeliveryReport, ProducerEvent};

/// Итог разбора событий доставки за время жизни соединения.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryStats {
    pub delivered: u64,
    pub failed: u64,
    pub client_errors: u64,
}

impl DeliveryStats {
    fn observe(&mut self, event: ProducerEvent) {
        match event {
            ProducerEvent::Delivery(DeliveryReport { topic, partition, outcome: Err(error) }) => {
                self.failed += 1;
                tracing::error!(topic = %topic, partition, error = %error, "delivery failed");
            }
            ProducerEvent::Delivery(DeliveryReport { topic, partition, outcome: Ok(offset) }) => {
                self.delivered += 1;
                tracing::info!(topic = %topic, partition, offset, "delivered");
            }
            ProducerEvent::ClientError(error) => {
                self.client_errors += 1;
                tracing::error!(error = %error, "kafka client error");
            }
            ProducerEvent::Other(kind) => {
                tracing::trace!(kind, "ignored producer event");
            }
        }
    }
}

/// Запустить фоновую задачу, разгребающую события producer'а.
///
/// Задача завершается, когда канал закрыт (т.е. соединение уничтожено),
/// и возвращает накопленную статистику.
pub fn spawn_delivery_drain(events: mpsc::UnboundedReceiver<ProducerEvent>) -> JoinHandle<DeliveryStats> {
    tokio::spawn(drain_delivery_events(events))
}

/// События обрабатываются в порядке, в котором их отдал клиент
/// (порядок подтверждений, не порядок отправки).
pub async fn drain_delivery_events(mut events: mpsc::UnboundedReceiver<ProducerEvent>) -> DeliveryStats {
    let mut stats = DeliveryStats::default();
    while let Some(event) = events.recv().await {
        stats.observe(event);
    }
    tracing::debug!(
        delivered = stats.delivered,
        failed = stats.failed,
        client_errors = stats.client_errors,
        "delivery event stream closed"
    );
    stats
}

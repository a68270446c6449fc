use std::sync::Arc;
use std::time::Duration;

use relay_api::{DEFAULT_PRODUCER, FlushError, Record, RecordSender, encode};

/// Сколько ждать подтверждений после последней отправки.
pub const FLUSH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SendSummary {
    /// Отправки, принятые клиентом (не подтверждённые брокером).
    pub sent: u64,
    /// Ошибки сериализации и синхронные отказы клиента.
    pub errors: u64,
}

// ═══════════════════════════════════════════════════════════════
//  SendLoop
// ═══════════════════════════════════════════════════════════════

/// Ограниченная серия отправок с паузой между ними.
///
/// Ошибки отдельных отправок логируются и считаются, цикл не прерывается
/// и ничего не повторяет.
pub struct SendLoop<S> {
    sender: Arc<S>,
    producer: String,
    flush_timeout: Duration,
}

impl<S: RecordSender> SendLoop<S> {
    pub fn new(sender: Arc<S>) -> Self {
        Self {
            sender,
            producer: DEFAULT_PRODUCER.to_string(),
            flush_timeout: FLUSH_TIMEOUT,
        }
    }

    /// Значение поля `producer` в отправляемых записях.
    pub fn producer_name(mut self, name: impl Into<String>) -> Self {
        self.producer = name.into();
        self
    }

    pub fn flush_timeout(mut self, timeout: Duration) -> Self {
        self.flush_timeout = timeout;
        self
    }

    pub async fn run(&self, count: u64, interval: Duration, topic: &str) -> SendSummary {
        let mut summary = SendSummary::default();

        for i in 0..count {
            let record = Record::for_sequence(i, count, &self.producer);
            tracing::info!(id = record.id, count, topic = %topic, "sending record");

            if self.send_one(&record, topic) {
                summary.sent += 1;
            } else {
                summary.errors += 1;
            }

            if i + 1 < count && !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }
        }

        self.flush().await;

        tracing::info!(sent = summary.sent, errors = summary.errors, "send loop finished");
        summary
    }

    fn send_one(&self, record: &Record, topic: &str) -> bool {
        let payload = match encode(record) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(id = record.id, error = %e, "encode failed");
                return false;
            }
        };
        match self.sender.send(topic, &payload) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(id = record.id, error = %e, "send failed");
                false
            }
        }
    }

    /// Flush блокирующий, поэтому уходит на blocking pool: задача разбора
    /// событий доставки продолжает работать.
    async fn flush(&self) {
        tracing::info!(timeout = ?self.flush_timeout, "waiting for outstanding deliveries");
        let sender = Arc::clone(&self.sender);
        let timeout = self.flush_timeout;
        match tokio::task::spawn_blocking(move || sender.flush(timeout)).await {
            Ok(Ok(())) => tracing::info!("all deliveries acknowledged"),
            Ok(Err(FlushError::Timeout(t))) => {
                tracing::warn!(timeout = ?t, "flush timed out, unacknowledged sends abandoned")
            }
            Ok(Err(e)) => tracing::warn!(error = %e, "flush failed"),
            Err(e) => tracing::error!(error = ?e, "flush task failed"),
        }
    }
}

use std::time::Duration;

use crate::error::{FlushError, SendError};
use crate::event::PollOutcome;

/// Отправляющая сторона соединения с брокером.
///
/// `send` возвращается после постановки в локальную очередь клиента,
/// подтверждение приходит позже отдельным `ProducerEvent::Delivery`.
pub trait RecordSender: Send + Sync + 'static {
    /// Отправить payload в topic, партицию выбирает клиент.
    fn send(&self, topic: &str, payload: &[u8]) -> Result<(), SendError>;

    /// Блокироваться, пока все отправки не подтверждены или не истёк `timeout`.
    fn flush(&self, timeout: Duration) -> Result<(), FlushError>;
}

/// Читающая сторона: блокирующий poll, ограниченный `timeout`.
pub trait RecordPoller {
    fn poll(&self, timeout: Duration) -> PollOutcome;
}

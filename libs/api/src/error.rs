use std::time::Duration;

/// Ошибка MessageCodec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("encode: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("decode: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Синхронный отказ при постановке сообщения в очередь клиента
/// (например, локальная очередь переполнена).
#[derive(Debug, Clone, thiserror::Error)]
#[error("send to '{topic}': {message}")]
pub struct SendError {
    pub topic: String,
    pub message: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum FlushError {
    /// Не все отправки подтверждены за отведённое время.
    #[error("flush timed out after {0:?}")]
    Timeout(Duration),

    #[error("flush: {0}")]
    Other(String),
}

/// Ошибка poll, не являющаяся таймаутом.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("poll: {0}")]
pub struct PollError(pub String);
